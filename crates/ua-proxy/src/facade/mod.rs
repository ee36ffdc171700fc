// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed node proxies.
//!
//! A [`TypedNodeFacade`] wraps one server node. It keeps a local copy of the
//! node's own value (the shadow) and a cache of resolved children. Member
//! operations come in four flavours:
//!
//! | Operation | Network | Shadow |
//! |-----------|---------|--------|
//! | `get`     | only to resolve an unseen child | reads the child's shadow |
//! | `set`     | only to resolve an unseen child | replaces the child's shadow |
//! | `read`    | resolve + one attribute read    | replaced on success |
//! | `write`   | resolve + one attribute write   | replaced on success |
//!
//! Every blocking operation has an `_async` counterpart returning a future;
//! the blocking form drives it through the context's [`SyncBridge`].
//!
//! Node types are tables of [`MemberDescriptor`]s ([`NodeTypeDefinition`]).
//! Generated wrappers such as
//! [`KeyCredentialConfigurationTypeNode`](crate::model::KeyCredentialConfigurationTypeNode)
//! add one named method per member on top of the generic operations here.

mod context;
mod descriptor;
mod macros;
mod registry;

pub use context::{ProxyContext, ProxyContextBuilder};
pub use descriptor::{
    value_rank, Component, MemberDescriptor, MemberKind, NodeTypeDefinition, Property,
};
pub use registry::TypeRegistry;

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::bridge::SyncBridge;
use crate::cache::{CacheStatistics, NodeCache};
use crate::client::NodeHandle;
use crate::codec::{TypeCodec, UaType};
use crate::error::{
    ConversionError, ProxyError, ProxyErrorContext, ProxyResult, ResolutionError,
};
use crate::status::StatusCode;
use crate::types::{AttributeId, NodeId, QualifiedName};
use crate::value::{DataValue, Variant};

// =============================================================================
// Traits
// =============================================================================

/// A typed wrapper over a [`TypedNodeFacade`].
pub trait TypedNode: Clone + Send + Sync + 'static {
    /// Wraps a facade.
    fn from_facade(facade: TypedNodeFacade) -> Self;

    /// Returns the wrapped facade.
    fn facade(&self) -> &TypedNodeFacade;
}

/// A typed wrapper bound to a node type definition.
pub trait NodeType: TypedNode {
    /// The member table of the type.
    fn definition() -> Arc<NodeTypeDefinition>;
}

impl TypedNode for TypedNodeFacade {
    fn from_facade(facade: TypedNodeFacade) -> Self {
        facade
    }

    fn facade(&self) -> &TypedNodeFacade {
        self
    }
}

// =============================================================================
// TypedNodeFacade
// =============================================================================

struct Inner {
    handle: NodeHandle,
    definition: Arc<NodeTypeDefinition>,
    context: Arc<ProxyContext>,
    children: NodeCache<TypedNodeFacade>,
    shadow: RwLock<Option<DataValue>>,
}

/// Proxy for one node of the server's address space.
///
/// Cloning is cheap and clones share the shadow and the child cache.
#[derive(Clone)]
pub struct TypedNodeFacade {
    inner: Arc<Inner>,
    bridge: SyncBridge,
}

impl TypedNodeFacade {
    /// Wraps `handle` with the given member table.
    pub fn new(
        context: Arc<ProxyContext>,
        handle: NodeHandle,
        definition: Arc<NodeTypeDefinition>,
    ) -> Self {
        let bridge = context.bridge().clone();
        Self::with_bridge(context, handle, definition, bridge)
    }

    fn with_bridge(
        context: Arc<ProxyContext>,
        handle: NodeHandle,
        definition: Arc<NodeTypeDefinition>,
        bridge: SyncBridge,
    ) -> Self {
        let children = NodeCache::new(context.config().cache.negative_caching);
        Self {
            inner: Arc::new(Inner {
                handle,
                definition,
                context,
                children,
                shadow: RwLock::new(None),
            }),
            bridge,
        }
    }

    /// Returns a view whose blocking calls are interrupted when `cancel` fires.
    ///
    /// The view shares the shadow and the child cache with `self`.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            bridge: self.bridge.with_cancellation(cancel),
        }
    }

    fn rebind(self, bridge: &SyncBridge) -> Self {
        Self {
            inner: self.inner,
            bridge: bridge.clone(),
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Returns the node handle.
    pub fn handle(&self) -> &NodeHandle {
        &self.inner.handle
    }

    /// Returns the node id.
    pub fn node_id(&self) -> &NodeId {
        self.inner.handle.node_id()
    }

    /// Returns the browse name.
    pub fn browse_name(&self) -> &QualifiedName {
        self.inner.handle.browse_name()
    }

    /// Returns the member table this facade was materialized with.
    pub fn definition(&self) -> &Arc<NodeTypeDefinition> {
        &self.inner.definition
    }

    /// Returns the shared context.
    pub fn context(&self) -> &Arc<ProxyContext> {
        &self.inner.context
    }

    /// Returns `true` if the member table is `type_id` or one of its subtypes.
    pub fn is_instance_of(&self, type_id: &NodeId) -> bool {
        self.inner.definition.is_subtype_of(type_id)
    }

    /// Returns `true` if both facades proxy the same cached node instance.
    pub fn same_node(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns the child cache statistics.
    pub fn cache_statistics(&self) -> &CacheStatistics {
        self.inner.children.statistics()
    }

    fn codec(&self) -> &TypeCodec {
        self.inner.context.codec()
    }

    // =========================================================================
    // Own value
    // =========================================================================

    /// Returns the shadow envelope, if any.
    pub fn data_value(&self) -> Option<DataValue> {
        self.inner.shadow.read().clone()
    }

    /// Replaces the shadow envelope. No network access.
    pub fn set_data_value(&self, value: DataValue) {
        *self.inner.shadow.write() = Some(value);
    }

    /// Decodes the shadow value. `None` if nothing was read or set yet, or
    /// the value is null.
    pub fn get_value<T: UaType>(&self) -> ProxyResult<Option<T>> {
        let shadow = self.inner.shadow.read().clone();
        match shadow {
            Some(value) => Ok(self.codec().decode::<T>(&value.value)?),
            None => Ok(None),
        }
    }

    /// Encodes `value` into the shadow. No network access.
    pub fn set_value<T: UaType>(&self, value: T) -> ProxyResult<()> {
        let encoded = self.codec().encode(&value)?;
        *self.inner.shadow.write() = Some(DataValue::value_only(encoded));
        Ok(())
    }

    /// Reads the node's value from the server and refreshes the shadow.
    pub async fn read_value_async<T: UaType>(&self) -> ProxyResult<Option<T>> {
        let value = self
            .inner
            .context
            .accessor()
            .read_checked(self.node_id(), AttributeId::Value)
            .await?;
        let decoded = self.codec().decode::<T>(&value.value)?;
        *self.inner.shadow.write() = Some(value);
        Ok(decoded)
    }

    /// Blocking form of [`read_value_async`](Self::read_value_async).
    pub fn read_value<T: UaType>(&self) -> ProxyResult<Option<T>> {
        let this = self.clone();
        self.bridge
            .block_on("read_value", async move { this.read_value_async::<T>().await })
    }

    /// Writes `value` to the server. The shadow is replaced only on success.
    pub async fn write_value_async<T: UaType>(&self, value: T) -> ProxyResult<StatusCode> {
        let encoded = self.codec().encode(&value)?;
        let status = self
            .inner
            .context
            .accessor()
            .write_checked(self.node_id(), AttributeId::Value, encoded.clone())
            .await?;
        *self.inner.shadow.write() = Some(DataValue::value_only(encoded));
        Ok(status)
    }

    /// Blocking form of [`write_value_async`](Self::write_value_async).
    pub fn write_value<T: UaType>(&self, value: T) -> ProxyResult<StatusCode> {
        let this = self.clone();
        self.bridge
            .block_on("write_value", async move { this.write_value_async(value).await })
    }

    /// Reads any attribute of the node. The shadow is not touched.
    pub async fn read_attribute_async(&self, attribute: AttributeId) -> ProxyResult<DataValue> {
        self.inner
            .context
            .accessor()
            .read_attribute(self.node_id(), attribute)
            .await
    }

    /// Blocking form of [`read_attribute_async`](Self::read_attribute_async).
    pub fn read_attribute(&self, attribute: AttributeId) -> ProxyResult<DataValue> {
        let this = self.clone();
        self.bridge.block_on("read_attribute", async move {
            this.read_attribute_async(attribute).await
        })
    }

    /// Writes any attribute of the node. The shadow is not touched, even
    /// for the Value attribute.
    pub async fn write_attribute_async(
        &self,
        attribute: AttributeId,
        value: Variant,
    ) -> ProxyResult<StatusCode> {
        self.inner
            .context
            .accessor()
            .write_checked(self.node_id(), attribute, value)
            .await
            .with_node(&self.node_id().to_string())
    }

    /// Blocking form of [`write_attribute_async`](Self::write_attribute_async).
    pub fn write_attribute(&self, attribute: AttributeId, value: Variant) -> ProxyResult<StatusCode> {
        let this = self.clone();
        self.bridge.block_on("write_attribute", async move {
            this.write_attribute_async(attribute, value).await
        })
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// Resolves the member node described by `descriptor`, once per facade.
    pub async fn child_async(
        &self,
        descriptor: &'static MemberDescriptor,
    ) -> ProxyResult<Option<TypedNodeFacade>> {
        let key = descriptor.cache_key();
        let child = self
            .inner
            .children
            .get_or_resolve(&key, || async move {
                let query = descriptor.query();
                let resolved = self
                    .inner
                    .context
                    .client()
                    .resolve_member(&self.inner.handle, &query)
                    .await
                    .with_operation("resolve_member")?;
                resolved
                    .map(|handle| self.materialize(handle, descriptor))
                    .transpose()
            })
            .await?;
        Ok(child.map(|child| child.rebind(&self.bridge)))
    }

    /// Blocking form of [`child_async`](Self::child_async). Served from the
    /// cache without blocking when the child was resolved before.
    pub fn child(
        &self,
        descriptor: &'static MemberDescriptor,
    ) -> ProxyResult<Option<TypedNodeFacade>> {
        if let Some(cached) = self.inner.children.peek(&descriptor.cache_key()) {
            return Ok(cached.map(|child| child.rebind(&self.bridge)));
        }
        let this = self.clone();
        self.bridge
            .block_on("resolve_child", async move { this.child_async(descriptor).await })
    }

    /// Builds the child facade. A registered type definition that is neither
    /// the declared one nor a subtype of it is a model mismatch.
    fn materialize(
        &self,
        handle: NodeHandle,
        descriptor: &MemberDescriptor,
    ) -> ProxyResult<TypedNodeFacade> {
        let context = &self.inner.context;
        if let Some(actual) = context.types().get(handle.type_definition()) {
            if !actual.is_subtype_of(&descriptor.type_definition) {
                return Err(ResolutionError::type_definition_mismatch(
                    handle.node_id().to_string(),
                    descriptor.type_definition.to_string(),
                    actual.browse_name,
                )
                .into());
            }
        }

        let definition = context.types().resolve(
            handle.type_definition(),
            Some(&descriptor.type_definition),
            handle.node_class(),
        );
        debug!(
            parent = %self.node_id(),
            child = %handle,
            type_name = definition.browse_name,
            "Materialized child"
        );
        Ok(Self::with_bridge(
            Arc::clone(context),
            handle,
            definition,
            self.bridge.clone(),
        ))
    }

    fn missing(&self, descriptor: &MemberDescriptor) -> ProxyError {
        ProxyError::not_found(
            self.node_id().to_string(),
            descriptor.namespace_uri,
            descriptor.browse_name,
        )
    }

    async fn value_child_async<T: UaType>(
        &self,
        descriptor: &'static MemberDescriptor,
    ) -> ProxyResult<TypedNodeFacade> {
        check_value_member::<T>(self.codec(), descriptor)?;
        match self.child_async(descriptor).await? {
            Some(child) => Ok(child),
            None => Err(self.missing(descriptor)),
        }
    }

    fn value_child<T: UaType>(
        &self,
        descriptor: &'static MemberDescriptor,
    ) -> ProxyResult<TypedNodeFacade> {
        check_value_member::<T>(self.codec(), descriptor)?;
        match self.child(descriptor)? {
            Some(child) => Ok(child),
            None => Err(self.missing(descriptor)),
        }
    }

    // =========================================================================
    // Typed members
    // =========================================================================

    /// Returns the member's shadow value.
    pub fn get<T: UaType, N: 'static>(
        &self,
        property: &'static Property<T, N>,
    ) -> ProxyResult<Option<T>> {
        self.value_child::<T>(property.descriptor())?.get_value::<T>()
    }

    /// Replaces the member's shadow value.
    pub fn set<T: UaType, N: 'static>(
        &self,
        property: &'static Property<T, N>,
        value: T,
    ) -> ProxyResult<()> {
        self.value_child::<T>(property.descriptor())?.set_value(value)
    }

    /// Reads the member's value from the server.
    pub async fn read_async<T: UaType, N: 'static>(
        &self,
        property: &'static Property<T, N>,
    ) -> ProxyResult<Option<T>> {
        let result = async {
            let child = self.value_child_async::<T>(property.descriptor()).await?;
            child.read_value_async::<T>().await
        }
        .await;
        result.map_err(|e| {
            e.log(property.descriptor().browse_name);
            e
        })
    }

    /// Blocking form of [`read_async`](Self::read_async).
    pub fn read<T: UaType, N: 'static>(
        &self,
        property: &'static Property<T, N>,
    ) -> ProxyResult<Option<T>> {
        let this = self.clone();
        self.bridge
            .block_on("read", async move { this.read_async(property).await })
    }

    /// Writes the member's value to the server.
    pub async fn write_async<T: UaType, N: 'static>(
        &self,
        property: &'static Property<T, N>,
        value: T,
    ) -> ProxyResult<StatusCode> {
        let result = async {
            let child = self.value_child_async::<T>(property.descriptor()).await?;
            child.write_value_async(value).await
        }
        .await;
        result.map_err(|e| {
            e.log(property.descriptor().browse_name);
            e
        })
    }

    /// Blocking form of [`write_async`](Self::write_async).
    pub fn write<T: UaType, N: 'static>(
        &self,
        property: &'static Property<T, N>,
        value: T,
    ) -> ProxyResult<StatusCode> {
        let this = self.clone();
        self.bridge
            .block_on("write", async move { this.write_async(property, value).await })
    }

    /// Returns the member's node, or `None` if the server has no such child.
    pub async fn node_async<T: 'static, N: TypedNode>(
        &self,
        property: &'static Property<T, N>,
    ) -> ProxyResult<Option<N>> {
        Ok(self
            .child_async(property.descriptor())
            .await?
            .map(N::from_facade))
    }

    /// Blocking form of [`node_async`](Self::node_async).
    pub fn node<T: 'static, N: TypedNode>(
        &self,
        property: &'static Property<T, N>,
    ) -> ProxyResult<Option<N>> {
        Ok(self.child(property.descriptor())?.map(N::from_facade))
    }

    /// Returns the component node, or `None` if the server has no such child.
    pub async fn component_async<N: TypedNode>(
        &self,
        component: &'static Component<N>,
    ) -> ProxyResult<Option<N>> {
        Ok(self
            .child_async(component.descriptor())
            .await?
            .map(N::from_facade))
    }

    /// Blocking form of [`component_async`](Self::component_async).
    pub fn component<N: TypedNode>(
        &self,
        component: &'static Component<N>,
    ) -> ProxyResult<Option<N>> {
        Ok(self.child(component.descriptor())?.map(N::from_facade))
    }

    // =========================================================================
    // Members by browse name
    // =========================================================================

    /// Looks a member of this node's type up by browse name.
    pub fn member(&self, browse_name: &str) -> ProxyResult<&'static MemberDescriptor> {
        self.inner.definition.member(browse_name).ok_or_else(|| {
            ResolutionError::unknown_member(self.inner.definition.browse_name, browse_name).into()
        })
    }

    /// Resolves a member node by browse name.
    pub async fn member_node_async(&self, browse_name: &str) -> ProxyResult<Option<TypedNodeFacade>> {
        let descriptor = self.member(browse_name)?;
        self.child_async(descriptor).await
    }

    /// Blocking form of [`member_node_async`](Self::member_node_async).
    pub fn member_node(&self, browse_name: &str) -> ProxyResult<Option<TypedNodeFacade>> {
        let descriptor = self.member(browse_name)?;
        self.child(descriptor)
    }

    /// Returns a member's shadow value without decoding it.
    pub fn get_member_value(&self, browse_name: &str) -> ProxyResult<Option<Variant>> {
        let descriptor = self.member(browse_name)?;
        self.value_child::<Variant>(descriptor)?.get_value::<Variant>()
    }

    /// Reads a member's value from the server without decoding it.
    pub async fn read_member_value_async(&self, browse_name: &str) -> ProxyResult<Option<Variant>> {
        let descriptor = self.member(browse_name)?;
        let child = self.value_child_async::<Variant>(descriptor).await?;
        child.read_value_async::<Variant>().await
    }

    /// Blocking form of [`read_member_value_async`](Self::read_member_value_async).
    pub fn read_member_value(&self, browse_name: &str) -> ProxyResult<Option<Variant>> {
        let descriptor = self.member(browse_name)?;
        let this = self.clone();
        self.bridge.block_on("read_member_value", async move {
            let child = this.value_child_async::<Variant>(descriptor).await?;
            child.read_value_async::<Variant>().await
        })
    }
}

fn check_value_member<T: UaType>(
    codec: &TypeCodec,
    descriptor: &MemberDescriptor,
) -> Result<(), ConversionError> {
    if !descriptor.kind.has_value() {
        return Err(ConversionError::descriptor_mismatch(
            descriptor.browse_name,
            "object member",
            T::type_name(),
        ));
    }
    codec.check_descriptor::<T>(descriptor)
}

impl fmt::Debug for TypedNodeFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedNodeFacade")
            .field("node", &self.inner.handle)
            .field("type", &self.inner.definition.browse_name)
            .field("children", &self.inner.children.len())
            .finish()
    }
}

impl fmt::Display for TypedNodeFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.handle)
    }
}

// =============================================================================
// Tests
// =============================================================================
