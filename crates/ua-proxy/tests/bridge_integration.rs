// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Blocking calls and concurrent resolution.

mod common;

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use common::key_credential_space;
use ua_proxy::model::KeyCredentialConfigurationTypeNode;
use ua_proxy::{
    ExecutionError, NodeId, ProxyContext, ProxyError, TypedNode, Variant,
};

// =============================================================================
// Concurrent resolution
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_lookups_resolve_once() {
    let (space, handle) = key_credential_space();
    space.set_resolve_delay(Duration::from_millis(50));

    let node: KeyCredentialConfigurationTypeNode =
        ProxyContext::new(space.clone()).unwrap().node(handle);

    let tasks = (0..16).map(|_| {
        let node = node.clone();
        tokio::spawn(async move { node.get_resource_uri_node_async().await })
    });
    let children: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap().unwrap())
        .collect();

    assert_eq!(space.resolve_calls(), 1);
    assert!(children.iter().all(|child| child.same_node(&children[0])));
    assert_eq!(node.cache_statistics().resolutions(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reads_share_one_child() {
    let (space, handle) = key_credential_space();
    space.set_resolve_delay(Duration::from_millis(20));
    space.set_value(&NodeId::numeric(2, 1001), Variant::String("opc.tcp://host".into()));

    let node: KeyCredentialConfigurationTypeNode =
        ProxyContext::new(space.clone()).unwrap().node(handle);

    let reads = (0..8).map(|_| node.read_resource_uri_async());
    for result in join_all(reads).await {
        assert_eq!(result.unwrap(), Some("opc.tcp://host".to_string()));
    }

    assert_eq!(space.resolve_calls(), 1);
    assert_eq!(space.read_calls(), 8);
}

// =============================================================================
// Blocking calls
// =============================================================================

#[test]
fn test_blocking_calls_outside_runtime() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap();

    let (space, handle) = key_credential_space();
    space.set_value(&NodeId::numeric(2, 1001), Variant::String("opc.tcp://host".into()));

    let context = ProxyContext::builder(space.clone())
        .runtime(runtime.handle().clone())
        .build()
        .unwrap();
    let node: KeyCredentialConfigurationTypeNode = context.node(handle);

    assert_eq!(
        node.read_resource_uri().unwrap(),
        Some("opc.tcp://host".to_string())
    );
    assert!(node.write_profile_uri("urn:profile".to_string()).unwrap().is_good());
    assert_eq!(node.get_profile_uri().unwrap(), Some("urn:profile".to_string()));
}

#[test]
fn test_context_requires_runtime() {
    let (space, _) = key_credential_space();
    let err = ProxyContext::new(space).unwrap_err();
    assert!(matches!(err, ProxyError::Configuration(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_calls_from_blocking_thread() {
    let (space, handle) = key_credential_space();
    space.set_value(&NodeId::numeric(2, 1001), Variant::String("opc.tcp://host".into()));

    let node: KeyCredentialConfigurationTypeNode =
        ProxyContext::new(space.clone()).unwrap().node(handle);

    let value = tokio::task::spawn_blocking(move || node.read_resource_uri())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(value, Some("opc.tcp://host".to_string()));
}

#[tokio::test]
async fn test_blocking_inside_current_thread_runtime_is_refused() {
    let (space, handle) = key_credential_space();
    let node: KeyCredentialConfigurationTypeNode =
        ProxyContext::new(space.clone()).unwrap().node(handle);

    let err = node.read_resource_uri().unwrap_err();
    assert!(matches!(
        err,
        ProxyError::Execution(ExecutionError::RuntimeUnavailable { .. })
    ));

    // The async form still works on the same runtime.
    assert_eq!(node.read_resource_uri_async().await.unwrap(), None);
}

#[tokio::test]
async fn test_blocking_pool_of_current_thread_runtime_is_refused() {
    let (space, handle) = key_credential_space();
    space.set_value(&NodeId::numeric(2, 1001), Variant::String("opc.tcp://host".into()));
    let node: KeyCredentialConfigurationTypeNode =
        ProxyContext::new(space.clone()).unwrap().node(handle);

    let blocking = node.clone();
    let err = tokio::task::spawn_blocking(move || blocking.read_resource_uri())
        .await
        .unwrap()
        .unwrap_err();
    assert!(matches!(
        err,
        ProxyError::Execution(ExecutionError::RuntimeUnavailable { .. })
    ));
    assert_eq!(space.network_calls(), 0);

    assert_eq!(
        node.read_resource_uri_async().await.unwrap(),
        Some("opc.tcp://host".to_string())
    );
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_token_fails_fast() {
    let (space, handle) = key_credential_space();
    let node: KeyCredentialConfigurationTypeNode =
        ProxyContext::new(space.clone()).unwrap().node(handle);

    let token = CancellationToken::new();
    token.cancel();
    let view = KeyCredentialConfigurationTypeNode::from_facade(node.with_cancellation(token));

    let err = view.read_resource_uri().unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(space.network_calls(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancellation_interrupts_blocking_read() {
    let (space, handle) = key_credential_space();
    space.set_resolve_delay(Duration::from_secs(30));

    let node: KeyCredentialConfigurationTypeNode =
        ProxyContext::new(space.clone()).unwrap().node(handle);

    let token = CancellationToken::new();
    let view = KeyCredentialConfigurationTypeNode::from_facade(node.with_cancellation(token.clone()));

    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        token.cancel();
    });

    let err = view.read_resource_uri().unwrap_err();
    canceller.join().unwrap();
    assert!(err.is_cancelled());

    // Both views share one context.
    assert!(Arc::ptr_eq(view.context(), node.context()));
}
