// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Shared collaborators of every facade created from one client.

use std::fmt;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::info;

use super::registry::TypeRegistry;
use super::{NodeType, TypedNodeFacade};
use crate::accessor::AttributeAccessor;
use crate::bridge::SyncBridge;
use crate::client::{AddressSpaceClient, NodeHandle};
use crate::codec::{SerializationContext, TypeCodec};
use crate::config::ProxyConfig;
use crate::error::{ConfigurationError, ProxyResult};

// =============================================================================
// ProxyContext
// =============================================================================

/// Client, codec, type table and runtime shared by a tree of facades.
pub struct ProxyContext {
    client: Arc<dyn AddressSpaceClient>,
    accessor: AttributeAccessor,
    codec: TypeCodec,
    types: Arc<TypeRegistry>,
    bridge: SyncBridge,
    config: ProxyConfig,
}

impl ProxyContext {
    /// Starts building a context over `client`.
    pub fn builder(client: Arc<dyn AddressSpaceClient>) -> ProxyContextBuilder {
        ProxyContextBuilder::new(client)
    }

    /// Creates a context with default settings on the current runtime.
    pub fn new(client: Arc<dyn AddressSpaceClient>) -> ProxyResult<Arc<Self>> {
        Self::builder(client).build()
    }

    /// Returns the client.
    pub fn client(&self) -> &Arc<dyn AddressSpaceClient> {
        &self.client
    }

    /// Returns the attribute accessor.
    pub fn accessor(&self) -> &AttributeAccessor {
        &self.accessor
    }

    /// Returns the codec.
    pub fn codec(&self) -> &TypeCodec {
        &self.codec
    }

    /// Returns the type registry.
    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    /// Returns the default bridge for blocking calls.
    pub fn bridge(&self) -> &SyncBridge {
        &self.bridge
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Wraps a node, choosing its member table from the type registry.
    pub fn facade(self: &Arc<Self>, handle: NodeHandle) -> TypedNodeFacade {
        let definition = self
            .types
            .resolve(handle.type_definition(), None, handle.node_class());
        TypedNodeFacade::new(Arc::clone(self), handle, definition)
    }

    /// Wraps a node as the typed node `N`.
    pub fn node<N: NodeType>(self: &Arc<Self>, handle: NodeHandle) -> N {
        N::from_facade(TypedNodeFacade::new(Arc::clone(self), handle, N::definition()))
    }
}

impl fmt::Debug for ProxyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyContext")
            .field("client", &self.client.display_name())
            .field("codec", &self.codec)
            .field("types", &self.types.len())
            .field("config", &self.config)
            .finish()
    }
}

// =============================================================================
// ProxyContextBuilder
// =============================================================================

/// Builder for [`ProxyContext`].
pub struct ProxyContextBuilder {
    client: Arc<dyn AddressSpaceClient>,
    config: Option<ProxyConfig>,
    runtime: Option<Handle>,
    types: Option<Arc<TypeRegistry>>,
    serialization: Option<Arc<dyn SerializationContext>>,
}

impl ProxyContextBuilder {
    fn new(client: Arc<dyn AddressSpaceClient>) -> Self {
        Self {
            client,
            config: None,
            runtime: None,
            types: None,
            serialization: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ProxyConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the runtime blocking calls are driven on.
    ///
    /// Defaults to the runtime of the thread calling [`build`](Self::build).
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Sets the type registry. Defaults to [`TypeRegistry::standard`].
    pub fn types(mut self, types: Arc<TypeRegistry>) -> Self {
        self.types = Some(types);
        self
    }

    /// Overrides the client's serialization context.
    pub fn serialization_context(mut self, context: Arc<dyn SerializationContext>) -> Self {
        self.serialization = Some(context);
        self
    }

    /// Builds the context.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or no runtime is available.
    pub fn build(self) -> ProxyResult<Arc<ProxyContext>> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current()
                .map_err(|e| ConfigurationError::no_runtime(e.to_string()))?,
        };

        let serialization = self
            .serialization
            .unwrap_or_else(|| self.client.serialization_context());
        let codec = TypeCodec::new(serialization, config.enum_policy);
        let types = self
            .types
            .unwrap_or_else(|| Arc::new(TypeRegistry::standard()));

        info!(
            client = %self.client.display_name(),
            enum_policy = %config.enum_policy,
            negative_caching = config.cache.negative_caching,
            types = types.len(),
            "Proxy context created"
        );

        Ok(Arc::new(ProxyContext {
            accessor: AttributeAccessor::new(Arc::clone(&self.client)),
            client: self.client,
            codec,
            types,
            bridge: SyncBridge::new(runtime),
            config,
        }))
    }
}
