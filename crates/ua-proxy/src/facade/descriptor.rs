// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Static member tables.
//!
//! A node type is a list of [`MemberDescriptor`]s. Subtypes are built by
//! concatenating the parent's list with their own, so the standard type
//! hierarchy needs no trait inheritance.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::cache::CacheKey;
use crate::client::MemberQuery;
use crate::types::{ids, NodeClass, NodeId};

/// Value rank constants.
pub mod value_rank {
    /// Scalar or one dimensional array.
    pub const SCALAR_OR_ONE_DIMENSION: i32 = -3;
    /// Any rank.
    pub const ANY: i32 = -2;
    /// Scalar.
    pub const SCALAR: i32 = -1;
    /// Array with one or more dimensions.
    pub const ONE_OR_MORE_DIMENSIONS: i32 = 0;
    /// One dimensional array.
    pub const ONE_DIMENSION: i32 = 1;

    /// Returns `true` if a Rust type of rank `actual` can hold a member declared with `declared`.
    pub fn compatible(declared: i32, actual: i32) -> bool {
        if actual == ANY {
            return true;
        }
        match declared {
            ANY => true,
            SCALAR_OR_ONE_DIMENSION => actual == SCALAR || actual == ONE_DIMENSION,
            ONE_OR_MORE_DIMENSIONS => actual >= ONE_DIMENSION,
            declared => declared == actual,
        }
    }
}

// =============================================================================
// MemberDescriptor
// =============================================================================

/// How a member hangs off its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// `HasProperty` to a `PropertyType` variable.
    Property,
    /// `HasComponent` to a data variable.
    Variable,
    /// `HasComponent` to an object.
    Object,
}

impl MemberKind {
    /// Node class of the member.
    pub const fn node_class(&self) -> NodeClass {
        match self {
            Self::Property | Self::Variable => NodeClass::Variable,
            Self::Object => NodeClass::Object,
        }
    }

    /// Returns `true` if the member carries a value.
    pub const fn has_value(&self) -> bool {
        !matches!(self, Self::Object)
    }
}

/// Static metadata for one member of a node type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    /// Namespace URI of the browse name.
    pub namespace_uri: &'static str,
    /// Browse name.
    pub browse_name: &'static str,
    /// Member kind.
    pub kind: MemberKind,
    /// Reference type from parent to member.
    pub reference_type: NodeId,
    /// Expected type definition of the member.
    pub type_definition: NodeId,
    /// Declared data type; null for objects.
    pub data_type: NodeId,
    /// Declared value rank.
    pub value_rank: i32,
}

impl MemberDescriptor {
    /// Describes a property.
    pub const fn property(
        namespace_uri: &'static str,
        browse_name: &'static str,
        data_type: NodeId,
        value_rank: i32,
    ) -> Self {
        Self {
            namespace_uri,
            browse_name,
            kind: MemberKind::Property,
            reference_type: ids::HAS_PROPERTY,
            type_definition: ids::PROPERTY_TYPE,
            data_type,
            value_rank,
        }
    }

    /// Describes a data variable component.
    pub const fn variable(
        namespace_uri: &'static str,
        browse_name: &'static str,
        type_definition: NodeId,
        data_type: NodeId,
        value_rank: i32,
    ) -> Self {
        Self {
            namespace_uri,
            browse_name,
            kind: MemberKind::Variable,
            reference_type: ids::HAS_COMPONENT,
            type_definition,
            data_type,
            value_rank,
        }
    }

    /// Describes an object component.
    pub const fn object(
        namespace_uri: &'static str,
        browse_name: &'static str,
        type_definition: NodeId,
    ) -> Self {
        Self {
            namespace_uri,
            browse_name,
            kind: MemberKind::Object,
            reference_type: ids::HAS_COMPONENT,
            type_definition,
            data_type: NodeId::null(),
            value_rank: value_rank::SCALAR,
        }
    }

    /// Builds the lookup sent to the client.
    pub fn query(&self) -> MemberQuery {
        MemberQuery::new(self.namespace_uri, self.browse_name)
            .with_reference_type(self.reference_type.clone())
            .with_node_class(self.kind.node_class())
            .with_type_definition(self.type_definition.clone())
    }

    /// Returns the cache key of this member.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.namespace_uri, self.browse_name)
    }
}

// =============================================================================
// Typed member handles
// =============================================================================

/// A value member whose value is `T` and whose node is wrapped as `N`.
pub struct Property<T, N> {
    descriptor: MemberDescriptor,
    _marker: PhantomData<fn() -> (T, N)>,
}

impl<T, N> Property<T, N> {
    /// Binds a descriptor to its value and node types.
    pub const fn new(descriptor: MemberDescriptor) -> Self {
        Self {
            descriptor,
            _marker: PhantomData,
        }
    }

    /// Returns the descriptor.
    pub const fn descriptor(&self) -> &MemberDescriptor {
        &self.descriptor
    }
}

/// A member reached only as a node, wrapped as `N`.
pub struct Component<N> {
    descriptor: MemberDescriptor,
    _marker: PhantomData<fn() -> N>,
}

impl<N> Component<N> {
    /// Binds a descriptor to its node type.
    pub const fn new(descriptor: MemberDescriptor) -> Self {
        Self {
            descriptor,
            _marker: PhantomData,
        }
    }

    /// Returns the descriptor.
    pub const fn descriptor(&self) -> &MemberDescriptor {
        &self.descriptor
    }
}

// =============================================================================
// NodeTypeDefinition
// =============================================================================

/// The member table of one node type.
#[derive(Debug, Clone)]
pub struct NodeTypeDefinition {
    /// Browse name of the type.
    pub browse_name: &'static str,
    /// Type definition id.
    pub type_id: NodeId,
    /// Class of the instances.
    pub node_class: NodeClass,
    /// Supertype ids, nearest first.
    pub supertypes: Vec<NodeId>,
    /// Inherited members followed by the type's own.
    pub members: Vec<&'static MemberDescriptor>,
}

impl NodeTypeDefinition {
    /// Creates a type with no supertype.
    pub fn root(
        browse_name: &'static str,
        type_id: NodeId,
        node_class: NodeClass,
        members: Vec<&'static MemberDescriptor>,
    ) -> Self {
        Self {
            browse_name,
            type_id,
            node_class,
            supertypes: Vec::new(),
            members,
        }
    }

    /// Creates a subtype of `parent`.
    pub fn derive(
        parent: &NodeTypeDefinition,
        browse_name: &'static str,
        type_id: NodeId,
        own: Vec<&'static MemberDescriptor>,
    ) -> Self {
        let supertypes = std::iter::once(parent.type_id.clone())
            .chain(parent.supertypes.iter().cloned())
            .collect();
        let members = parent.members.iter().copied().chain(own).collect();

        Self {
            browse_name,
            type_id,
            node_class: parent.node_class,
            supertypes,
            members,
        }
    }

    /// Wraps the definition for sharing.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Looks a member up by browse name. Later entries shadow inherited ones.
    pub fn member(&self, browse_name: &str) -> Option<&'static MemberDescriptor> {
        self.members
            .iter()
            .rev()
            .find(|m| m.browse_name == browse_name)
            .copied()
    }

    /// Returns `true` if this type is `type_id` or derives from it.
    pub fn is_subtype_of(&self, type_id: &NodeId) -> bool {
        self.type_id == *type_id || self.supertypes.contains(type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OPC_UA_NAMESPACE_URI;

    static NAME: MemberDescriptor =
        MemberDescriptor::property(OPC_UA_NAMESPACE_URI, "Name", ids::STRING, value_rank::SCALAR);
    static TAGS: MemberDescriptor = MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "Tags",
        ids::STRING,
        value_rank::ONE_DIMENSION,
    );
    static NAME_OVERRIDE: MemberDescriptor =
        MemberDescriptor::property("urn:vendor", "Name", ids::LOCALIZED_TEXT, value_rank::SCALAR);

    #[test]
    fn test_value_rank_compatibility() {
        use value_rank::*;
        assert!(compatible(SCALAR, SCALAR));
        assert!(!compatible(SCALAR, ONE_DIMENSION));
        assert!(!compatible(ONE_DIMENSION, SCALAR));
        assert!(compatible(ANY, ONE_DIMENSION));
        assert!(compatible(SCALAR_OR_ONE_DIMENSION, SCALAR));
        assert!(compatible(ONE_OR_MORE_DIMENSIONS, ONE_DIMENSION));
        assert!(compatible(ONE_DIMENSION, ANY));
    }

    #[test]
    fn test_query_from_descriptor() {
        let query = TAGS.query();
        assert_eq!(query.browse_name, "Tags");
        assert_eq!(query.reference_type, ids::HAS_PROPERTY);
        assert_eq!(query.node_class, Some(NodeClass::Variable));
        assert_eq!(query.type_definition, Some(ids::PROPERTY_TYPE));
        assert_eq!(TAGS.cache_key(), CacheKey::new(OPC_UA_NAMESPACE_URI, "Tags"));
    }

    #[test]
    fn test_derive_concatenates_members() {
        let base = NodeTypeDefinition::root(
            "BaseThing",
            NodeId::numeric(2, 1),
            NodeClass::Object,
            vec![&NAME],
        );
        let derived =
            NodeTypeDefinition::derive(&base, "TaggedThing", NodeId::numeric(2, 2), vec![&TAGS]);
        let leaf = NodeTypeDefinition::derive(
            &derived,
            "VendorThing",
            NodeId::numeric(2, 3),
            vec![&NAME_OVERRIDE],
        );

        assert_eq!(derived.members.len(), 2);
        assert_eq!(derived.supertypes, vec![NodeId::numeric(2, 1)]);
        assert_eq!(
            leaf.supertypes,
            vec![NodeId::numeric(2, 2), NodeId::numeric(2, 1)]
        );
        assert!(leaf.is_subtype_of(&NodeId::numeric(2, 1)));
        assert!(!base.is_subtype_of(&NodeId::numeric(2, 2)));
        assert_eq!(leaf.member("Name").map(|m| m.namespace_uri), Some("urn:vendor"));
        assert!(leaf.member("Missing").is_none());
    }
}
