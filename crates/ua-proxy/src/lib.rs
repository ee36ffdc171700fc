// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed OPC UA node proxies.
//!
//! This crate sits between an asynchronous address-space client (session,
//! secure channel and services are the client's business) and strongly
//! typed node wrappers. For each member of a node type a wrapper offers:
//!
//! - `get_x` / `set_x`: the locally cached value, no network access
//! - `read_x` / `write_x`: one round trip to the server, blocking
//! - `read_x_async` / `write_x_async`: the same round trip as a future
//! - `get_x_node` / `get_x_node_async`: the member node itself
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │             Typed wrappers (model::*TypeNode)                   │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      TypedNodeFacade                            │
//! │   shadow value │ NodeCache │ SyncBridge │ descriptor table      │
//! └─────────────────────────────────────────────────────────────────┘
//!            │                 │                 │
//!            ▼                 ▼                 ▼
//! ┌───────────────┐ ┌───────────────┐ ┌───────────────────────────┐
//! │  TypeCodec    │ │AttributeAccess│ │   AddressSpaceClient      │
//! │ (wire values) │ │ (read/write)  │ │ (resolve/read/write)      │
//! └───────────────┘ └───────────────┘ └───────────────────────────┘
//! ```
//!
//! # Error Handling
//!
//! ```text
//! ProxyError
//! ├── Resolution    - Child lookup outcomes (not found is non-fatal)
//! ├── Service       - Remote failures and bad status codes
//! ├── Conversion    - Wire value does not fit the declared type
//! ├── Cancellation  - Interrupted blocking waits
//! ├── Execution     - Failures with no specific cause
//! └── Configuration - Invalid settings or missing runtime
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ua_proxy::model::KeyCredentialConfigurationTypeNode;
//! use ua_proxy::{NodeHandle, ProxyContext};
//!
//! let context = ProxyContext::new(Arc::new(client))?;
//! let credentials: KeyCredentialConfigurationTypeNode = context.node(handle);
//!
//! let uri = credentials.read_resource_uri_async().await?;
//! assert_eq!(credentials.get_resource_uri()?, uri);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod accessor;
pub mod bridge;
pub mod cache;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod facade;
pub mod logging;
pub mod model;
pub mod status;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use error::{
    CancellationError, ConfigurationError, ConversionError, ErrorCode, ErrorSeverity,
    ExecutionError, ProxyError, ProxyErrorContext, ProxyResult, ResolutionError, ServiceError,
};

pub use accessor::AttributeAccessor;
pub use bridge::SyncBridge;
pub use cache::{CacheKey, CacheStatistics, NodeCache};
pub use client::{AddressSpaceClient, MemberQuery, NodeHandle};
pub use codec::{EnumPolicy, TypeCodec, UaType};
pub use config::{ConfigLoader, ProxyConfig};
pub use facade::{NodeType, ProxyContext, TypedNode, TypedNodeFacade};
pub use status::StatusCode;
pub use types::{AttributeId, LocalizedText, NodeClass, NodeId, QualifiedName};
pub use value::{DataValue, Variant};
