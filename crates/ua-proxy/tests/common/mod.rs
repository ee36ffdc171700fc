// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory address space shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use ua_proxy::codec::{DataTypeRegistry, SerializationContext};
use ua_proxy::model::register_standard_codecs;
use ua_proxy::types::{ids, OPC_UA_NAMESPACE_URI};
use ua_proxy::{
    AddressSpaceClient, AttributeId, DataValue, MemberQuery, NodeHandle, NodeId, ProxyError,
    ProxyResult, QualifiedName, StatusCode, Variant,
};

// =============================================================================
// FakeAddressSpace
// =============================================================================

#[derive(Clone)]
struct Link {
    reference_type: NodeId,
    child: NodeHandle,
}

/// Address space client backed by maps, with call counters and scripted failures.
pub struct FakeAddressSpace {
    links: RwLock<HashMap<(NodeId, String, String), Link>>,
    values: RwLock<HashMap<(NodeId, AttributeId), DataValue>>,
    resolve_delay: Mutex<Option<Duration>>,
    failing_reads: Mutex<HashSet<NodeId>>,
    failing_writes: Mutex<HashSet<NodeId>>,
    write_statuses: Mutex<HashMap<NodeId, StatusCode>>,
    writes: Mutex<Vec<(NodeId, DataValue)>>,
    resolve_calls: AtomicUsize,
    read_calls: AtomicUsize,
    write_calls: AtomicUsize,
    types: Arc<DataTypeRegistry>,
}

impl FakeAddressSpace {
    /// Creates an empty address space that knows the standard structures.
    pub fn new() -> Arc<Self> {
        let types = DataTypeRegistry::new();
        register_standard_codecs(&types);

        Arc::new(Self {
            links: RwLock::new(HashMap::new()),
            values: RwLock::new(HashMap::new()),
            resolve_delay: Mutex::new(None),
            failing_reads: Mutex::new(HashSet::new()),
            failing_writes: Mutex::new(HashSet::new()),
            write_statuses: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            resolve_calls: AtomicUsize::new(0),
            read_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
            types: Arc::new(types),
        })
    }

    /// Links `child` under `parent`.
    pub fn link(&self, parent: &NodeHandle, namespace_uri: &str, reference_type: NodeId, child: NodeHandle) {
        let key = (
            parent.node_id().clone(),
            namespace_uri.to_string(),
            child.browse_name().name.clone(),
        );
        self.links.write().insert(
            key,
            Link {
                reference_type,
                child,
            },
        );
    }

    /// Adds a standard property variable under `parent` and returns its id.
    pub fn add_property(&self, parent: &NodeHandle, name: &str, id: u32) -> NodeId {
        let node_id = NodeId::numeric(2, id);
        self.link(
            parent,
            OPC_UA_NAMESPACE_URI,
            ids::HAS_PROPERTY,
            NodeHandle::variable(node_id.clone(), QualifiedName::new(0, name), ids::PROPERTY_TYPE),
        );
        node_id
    }

    /// Adds a standard component variable under `parent` and returns its id.
    pub fn add_component(
        &self,
        parent: &NodeHandle,
        name: &str,
        id: u32,
        type_definition: NodeId,
    ) -> NodeHandle {
        let handle = NodeHandle::variable(
            NodeId::numeric(2, id),
            QualifiedName::new(0, name),
            type_definition,
        );
        self.link(parent, OPC_UA_NAMESPACE_URI, ids::HAS_COMPONENT, handle.clone());
        handle
    }

    /// Sets the Value attribute of a node with Good status.
    pub fn set_value(&self, node_id: &NodeId, value: Variant) {
        self.set_data_value(node_id, AttributeId::Value, DataValue::with_status(value, StatusCode::GOOD));
    }

    /// Sets any attribute of a node.
    pub fn set_data_value(&self, node_id: &NodeId, attribute: AttributeId, value: DataValue) {
        self.values.write().insert((node_id.clone(), attribute), value);
    }

    /// Returns the stored Value attribute.
    pub fn value(&self, node_id: &NodeId) -> Option<Variant> {
        self.values
            .read()
            .get(&(node_id.clone(), AttributeId::Value))
            .map(|v| v.value.clone())
    }

    /// Delays every member resolution.
    pub fn set_resolve_delay(&self, delay: Duration) {
        *self.resolve_delay.lock() = Some(delay);
    }

    /// Makes reads of `node_id` fail with a service error.
    pub fn fail_reads(&self, node_id: &NodeId) {
        self.failing_reads.lock().insert(node_id.clone());
    }

    /// Makes writes to `node_id` fail with a service error.
    pub fn fail_writes(&self, node_id: &NodeId) {
        self.failing_writes.lock().insert(node_id.clone());
    }

    /// Makes writes to `node_id` complete with `status` without storing the value.
    pub fn reject_writes(&self, node_id: &NodeId, status: StatusCode) {
        self.write_statuses.lock().insert(node_id.clone(), status);
    }

    /// Returns the writes received so far.
    pub fn writes(&self) -> Vec<(NodeId, DataValue)> {
        self.writes.lock().clone()
    }

    /// Number of member resolutions.
    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    /// Number of attribute reads.
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    /// Number of attribute writes.
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Number of network calls of any kind.
    pub fn network_calls(&self) -> usize {
        self.resolve_calls() + self.read_calls() + self.write_calls()
    }
}

#[async_trait]
impl AddressSpaceClient for FakeAddressSpace {
    async fn resolve_member(
        &self,
        parent: &NodeHandle,
        query: &MemberQuery,
    ) -> ProxyResult<Option<NodeHandle>> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.resolve_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let key = (
            parent.node_id().clone(),
            query.namespace_uri.clone(),
            query.browse_name.clone(),
        );
        let link = self.links.read().get(&key).cloned();
        Ok(link.and_then(|link| {
            let class_matches = query
                .node_class
                .map_or(true, |class| class == link.child.node_class());
            (link.reference_type == query.reference_type && class_matches).then_some(link.child)
        }))
    }

    async fn read_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
    ) -> ProxyResult<DataValue> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_reads.lock().contains(node_id) {
            return Err(ProxyError::read_failed(node_id.to_string(), attribute, "scripted failure"));
        }

        Ok(self
            .values
            .read()
            .get(&(node_id.clone(), attribute))
            .cloned()
            .unwrap_or_else(|| DataValue::with_status(Variant::Empty, StatusCode::GOOD)))
    }

    async fn write_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
        value: DataValue,
    ) -> ProxyResult<StatusCode> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_writes.lock().contains(node_id) {
            return Err(ProxyError::write_failed(node_id.to_string(), attribute, "scripted failure"));
        }
        self.writes.lock().push((node_id.clone(), value.clone()));

        let status = self.write_statuses.lock().get(node_id).copied();
        if let Some(status) = status {
            return Ok(status);
        }

        self.values.write().insert((node_id.clone(), attribute), value);
        Ok(StatusCode::GOOD)
    }

    fn serialization_context(&self) -> Arc<dyn SerializationContext> {
        self.types.clone()
    }

    fn display_name(&self) -> String {
        "fake-address-space".to_string()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Handle of a `KeyCredentialConfigurationType` object.
pub fn key_credential_handle() -> NodeHandle {
    NodeHandle::object(
        NodeId::numeric(2, 1000),
        QualifiedName::new(2, "AuthService"),
        ids::KEY_CREDENTIAL_CONFIGURATION_TYPE,
    )
}

/// Address space with one key credential object and its four properties.
pub fn key_credential_space() -> (Arc<FakeAddressSpace>, NodeHandle) {
    let space = FakeAddressSpace::new();
    let handle = key_credential_handle();
    space.add_property(&handle, "ResourceUri", 1001);
    space.add_property(&handle, "ProfileUri", 1002);
    space.add_property(&handle, "EndpointUrls", 1003);
    space.add_property(&handle, "ServiceStatus", 1004);
    (space, handle)
}
