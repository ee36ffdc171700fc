// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Declarative generators for typed node wrappers.

/// Declares a typed wrapper over [`TypedNodeFacade`](crate::facade::TypedNodeFacade).
///
/// The definition must be a `Lazy<Arc<NodeTypeDefinition>>` static.
///
/// ```ignore
/// typed_node! {
///     /// A pump.
///     pub struct PumpTypeNode => PUMP_TYPE;
/// }
/// ```
#[macro_export]
macro_rules! typed_node {
    ($(#[$meta:meta])* $vis:vis struct $name:ident => $definition:path;) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name($crate::facade::TypedNodeFacade);

        impl $crate::facade::TypedNode for $name {
            fn from_facade(facade: $crate::facade::TypedNodeFacade) -> Self {
                Self(facade)
            }

            fn facade(&self) -> &$crate::facade::TypedNodeFacade {
                &self.0
            }
        }

        impl $crate::facade::NodeType for $name {
            fn definition() -> ::std::sync::Arc<$crate::facade::NodeTypeDefinition> {
                ::std::sync::Arc::clone(&*$definition)
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = $crate::facade::TypedNodeFacade;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

/// Generates the eight named accessors of one value member.
///
/// Expands inside an `impl` block of a [`typed_node!`](crate::typed_node) wrapper.
#[macro_export]
macro_rules! property_accessors {
    ($member:path : $t:ty => $n:ty {
        get: $get:ident,
        set: $set:ident,
        read: $read:ident,
        write: $write:ident,
        read_async: $read_async:ident,
        write_async: $write_async:ident,
        node: $node:ident,
        node_async: $node_async:ident $(,)?
    }) => {
        #[doc = concat!("Local value of `", stringify!($member), "`. No network access once the member node is known.")]
        pub fn $get(&self) -> $crate::error::ProxyResult<Option<$t>> {
            $crate::facade::TypedNode::facade(self).get(&$member)
        }

        #[doc = concat!("Replaces the local value of `", stringify!($member), "`.")]
        pub fn $set(&self, value: $t) -> $crate::error::ProxyResult<()> {
            $crate::facade::TypedNode::facade(self).set(&$member, value)
        }

        #[doc = concat!("Reads `", stringify!($member), "` from the server.")]
        pub fn $read(&self) -> $crate::error::ProxyResult<Option<$t>> {
            $crate::facade::TypedNode::facade(self).read(&$member)
        }

        #[doc = concat!("Writes `", stringify!($member), "` to the server.")]
        pub fn $write(&self, value: $t) -> $crate::error::ProxyResult<$crate::status::StatusCode> {
            $crate::facade::TypedNode::facade(self).write(&$member, value)
        }

        #[doc = concat!("Reads `", stringify!($member), "` from the server.")]
        pub async fn $read_async(&self) -> $crate::error::ProxyResult<Option<$t>> {
            $crate::facade::TypedNode::facade(self).read_async(&$member).await
        }

        #[doc = concat!("Writes `", stringify!($member), "` to the server.")]
        pub async fn $write_async(
            &self,
            value: $t,
        ) -> $crate::error::ProxyResult<$crate::status::StatusCode> {
            $crate::facade::TypedNode::facade(self)
                .write_async(&$member, value)
                .await
        }

        #[doc = concat!("Node of `", stringify!($member), "`, or `None` if the server has none.")]
        pub fn $node(&self) -> $crate::error::ProxyResult<Option<$n>> {
            $crate::facade::TypedNode::facade(self).node(&$member)
        }

        #[doc = concat!("Node of `", stringify!($member), "`, or `None` if the server has none.")]
        pub async fn $node_async(&self) -> $crate::error::ProxyResult<Option<$n>> {
            $crate::facade::TypedNode::facade(self).node_async(&$member).await
        }
    };
}

/// Generates the node accessors of one object component.
#[macro_export]
macro_rules! component_accessors {
    ($member:path => $n:ty {
        node: $node:ident,
        node_async: $node_async:ident $(,)?
    }) => {
        #[doc = concat!("Node of `", stringify!($member), "`, or `None` if the server has none.")]
        pub fn $node(&self) -> $crate::error::ProxyResult<Option<$n>> {
            $crate::facade::TypedNode::facade(self).component(&$member)
        }

        #[doc = concat!("Node of `", stringify!($member), "`, or `None` if the server has none.")]
        pub async fn $node_async(&self) -> $crate::error::ProxyResult<Option<$n>> {
            $crate::facade::TypedNode::facade(self)
                .component_async(&$member)
                .await
        }
    };
}
