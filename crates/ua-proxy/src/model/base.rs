// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Roots of the type hierarchy.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::facade::NodeTypeDefinition;
use crate::types::{ids, NodeClass};

/// `BaseObjectType`.
pub static BASE_OBJECT_TYPE: Lazy<Arc<NodeTypeDefinition>> = Lazy::new(|| {
    NodeTypeDefinition::root(
        "BaseObjectType",
        ids::BASE_OBJECT_TYPE,
        NodeClass::Object,
        Vec::new(),
    )
    .shared()
});

/// `BaseVariableType`.
pub static BASE_VARIABLE_TYPE: Lazy<Arc<NodeTypeDefinition>> = Lazy::new(|| {
    NodeTypeDefinition::root(
        "BaseVariableType",
        ids::BASE_VARIABLE_TYPE,
        NodeClass::Variable,
        Vec::new(),
    )
    .shared()
});

/// `BaseDataVariableType`.
pub static BASE_DATA_VARIABLE_TYPE: Lazy<Arc<NodeTypeDefinition>> = Lazy::new(|| {
    NodeTypeDefinition::derive(
        &BASE_VARIABLE_TYPE,
        "BaseDataVariableType",
        ids::BASE_DATA_VARIABLE_TYPE,
        Vec::new(),
    )
    .shared()
});

/// `PropertyType`.
pub static PROPERTY_TYPE: Lazy<Arc<NodeTypeDefinition>> = Lazy::new(|| {
    NodeTypeDefinition::derive(
        &BASE_VARIABLE_TYPE,
        "PropertyType",
        ids::PROPERTY_TYPE,
        Vec::new(),
    )
    .shared()
});

/// `FolderType`.
pub static FOLDER_TYPE: Lazy<Arc<NodeTypeDefinition>> = Lazy::new(|| {
    NodeTypeDefinition::derive(&BASE_OBJECT_TYPE, "FolderType", ids::FOLDER_TYPE, Vec::new())
        .shared()
});

crate::typed_node! {
    /// Any object. Members are reached by browse name.
    pub struct BaseObjectTypeNode => BASE_OBJECT_TYPE;
}

crate::typed_node! {
    /// A data variable. Its value is read through
    /// [`read_value`](crate::facade::TypedNodeFacade::read_value).
    pub struct BaseDataVariableTypeNode => BASE_DATA_VARIABLE_TYPE;
}

crate::typed_node! {
    /// A property of some other node.
    pub struct PropertyTypeNode => PROPERTY_TYPE;
}

crate::typed_node! {
    /// An organizing folder.
    pub struct FolderTypeNode => FOLDER_TYPE;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_hierarchy() {
        assert!(PROPERTY_TYPE.is_subtype_of(&ids::BASE_VARIABLE_TYPE));
        assert!(!PROPERTY_TYPE.is_subtype_of(&ids::BASE_DATA_VARIABLE_TYPE));
        assert_eq!(BASE_DATA_VARIABLE_TYPE.node_class, NodeClass::Variable);
        assert_eq!(FOLDER_TYPE.supertypes, vec![ids::BASE_OBJECT_TYPE]);
    }
}
