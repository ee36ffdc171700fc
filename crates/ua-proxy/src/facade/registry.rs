// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Type definition lookup for materializing facades.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::descriptor::NodeTypeDefinition;
use crate::types::{ids, NodeClass, NodeId};

/// Maps type definition ids to member tables.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<NodeId, Arc<NodeTypeDefinition>>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in model.
    pub fn standard() -> Self {
        let registry = Self::new();
        crate::model::register_standard_types(&registry);
        registry
    }

    /// Registers a definition, replacing any with the same id.
    pub fn register(&self, definition: Arc<NodeTypeDefinition>) {
        debug!(type_name = definition.browse_name, type_id = %definition.type_id, "Registering node type");
        self.types
            .write()
            .insert(definition.type_id.clone(), definition);
    }

    /// Returns the definition for `type_id`.
    pub fn get(&self, type_id: &NodeId) -> Option<Arc<NodeTypeDefinition>> {
        self.types.read().get(type_id).cloned()
    }

    /// Returns the number of registered types.
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Returns `true` if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Picks the definition for a node.
    ///
    /// Tries the node's own type definition, then the type the caller
    /// expected, then the base type for the node class.
    pub fn resolve(
        &self,
        actual: &NodeId,
        expected: Option<&NodeId>,
        node_class: NodeClass,
    ) -> Arc<NodeTypeDefinition> {
        if let Some(definition) = self.get(actual) {
            return definition;
        }
        if let Some(definition) = expected.and_then(|id| self.get(id)) {
            debug!(actual = %actual, expected = %definition.type_id, "Unknown type definition, using expected type");
            return definition;
        }
        self.base_for(node_class)
    }

    fn base_for(&self, node_class: NodeClass) -> Arc<NodeTypeDefinition> {
        let (name, id) = match node_class {
            NodeClass::Variable => ("BaseDataVariableType", ids::BASE_DATA_VARIABLE_TYPE),
            _ => ("BaseObjectType", ids::BASE_OBJECT_TYPE),
        };
        self.get(&id).unwrap_or_else(|| {
            Arc::new(NodeTypeDefinition::root(name, id, node_class, Vec::new()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_fallbacks() {
        let registry = TypeRegistry::new();
        let custom = NodeTypeDefinition::root(
            "PumpType",
            NodeId::numeric(2, 100),
            NodeClass::Object,
            Vec::new(),
        )
        .shared();
        registry.register(custom);

        let found = registry.resolve(&NodeId::numeric(2, 100), None, NodeClass::Object);
        assert_eq!(found.browse_name, "PumpType");

        let expected = registry.resolve(
            &NodeId::numeric(2, 999),
            Some(&NodeId::numeric(2, 100)),
            NodeClass::Object,
        );
        assert_eq!(expected.browse_name, "PumpType");

        let variable = registry.resolve(&NodeId::numeric(2, 999), None, NodeClass::Variable);
        assert_eq!(variable.type_id, ids::BASE_DATA_VARIABLE_TYPE);
    }

    #[test]
    fn test_standard_registry() {
        let registry = TypeRegistry::standard();
        assert!(registry.get(&ids::PROPERTY_TYPE).is_some());
        assert!(registry.get(&ids::BASE_OBJECT_TYPE).is_some());
        assert!(registry.len() >= 3);
    }
}
