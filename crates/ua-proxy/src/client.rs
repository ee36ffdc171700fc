// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Address space client abstraction.
//!
//! The proxy layer never talks to a server directly. Sessions, secure
//! channels and the browse services live behind [`AddressSpaceClient`], which
//! offers exactly what typed facades need: resolve a named child, read an
//! attribute, write an attribute, and the serialization context for
//! structured values.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::codec::SerializationContext;
use crate::error::ProxyResult;
use crate::status::StatusCode;
use crate::types::{ids, AttributeId, NodeClass, NodeId, QualifiedName};
use crate::value::DataValue;

// =============================================================================
// NodeHandle
// =============================================================================

/// A resolved node in the remote address space.
///
/// Handles are immutable. Clones share the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    node_id: NodeId,
    node_class: NodeClass,
    browse_name: QualifiedName,
    type_definition: NodeId,
}

impl NodeHandle {
    /// Creates a handle.
    pub fn new(
        node_id: NodeId,
        node_class: NodeClass,
        browse_name: QualifiedName,
        type_definition: NodeId,
    ) -> Self {
        Self {
            node_id,
            node_class,
            browse_name,
            type_definition,
        }
    }

    /// Creates a handle for an object node.
    pub fn object(node_id: NodeId, browse_name: QualifiedName, type_definition: NodeId) -> Self {
        Self::new(node_id, NodeClass::Object, browse_name, type_definition)
    }

    /// Creates a handle for a variable node.
    pub fn variable(node_id: NodeId, browse_name: QualifiedName, type_definition: NodeId) -> Self {
        Self::new(node_id, NodeClass::Variable, browse_name, type_definition)
    }

    /// Returns the node id.
    #[inline]
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Returns the node class.
    #[inline]
    pub fn node_class(&self) -> NodeClass {
        self.node_class
    }

    /// Returns the browse name.
    #[inline]
    pub fn browse_name(&self) -> &QualifiedName {
        &self.browse_name
    }

    /// Returns the type definition id.
    #[inline]
    pub fn type_definition(&self) -> &NodeId {
        &self.type_definition
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.browse_name, self.node_id)
    }
}

// =============================================================================
// MemberQuery
// =============================================================================

/// Describes the child a facade is looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberQuery {
    /// Namespace URI of the browse name.
    pub namespace_uri: String,
    /// Browse name.
    pub browse_name: String,
    /// Reference type connecting parent and child (subtypes included).
    pub reference_type: NodeId,
    /// Required node class of the target.
    pub node_class: Option<NodeClass>,
    /// Required type definition of the target.
    pub type_definition: Option<NodeId>,
}

impl MemberQuery {
    /// Creates a query that follows `HasComponent` with no further constraint.
    pub fn new(namespace_uri: impl Into<String>, browse_name: impl Into<String>) -> Self {
        Self {
            namespace_uri: namespace_uri.into(),
            browse_name: browse_name.into(),
            reference_type: ids::HAS_COMPONENT,
            node_class: None,
            type_definition: None,
        }
    }

    /// Sets the reference type.
    pub fn with_reference_type(mut self, reference_type: NodeId) -> Self {
        self.reference_type = reference_type;
        self
    }

    /// Requires a node class.
    pub fn with_node_class(mut self, node_class: NodeClass) -> Self {
        self.node_class = Some(node_class);
        self
    }

    /// Requires a type definition.
    pub fn with_type_definition(mut self, type_definition: NodeId) -> Self {
        self.type_definition = Some(type_definition);
        self
    }
}

// =============================================================================
// AddressSpaceClient Trait
// =============================================================================

/// The services a typed facade consumes.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one client is shared by every
/// facade created from it.
#[async_trait]
pub trait AddressSpaceClient: Send + Sync {
    /// Resolves a child of `parent`.
    ///
    /// Returns `Ok(None)` when no matching child exists. Errors are reserved
    /// for service failures.
    async fn resolve_member(
        &self,
        parent: &NodeHandle,
        query: &MemberQuery,
    ) -> ProxyResult<Option<NodeHandle>>;

    /// Reads one attribute.
    ///
    /// A bad status in the returned value is not an error at this level.
    async fn read_attribute(&self, node_id: &NodeId, attribute: AttributeId)
        -> ProxyResult<DataValue>;

    /// Writes one attribute and returns the server's status for it.
    async fn write_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
        value: DataValue,
    ) -> ProxyResult<StatusCode>;

    /// Returns the context used to encode and decode structured values.
    fn serialization_context(&self) -> Arc<dyn SerializationContext>;

    /// Returns the client display name for logging.
    fn display_name(&self) -> String {
        "AddressSpaceClient".to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
