// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Single attribute reads and writes.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::client::AddressSpaceClient;
use crate::error::{ProxyResult, ServiceError};
use crate::status::StatusCode;
use crate::types::{AttributeId, NodeId};
use crate::value::{DataValue, Variant};

/// Issues one read or write per call against the address space client.
///
/// No retries. Transport errors propagate unchanged.
#[derive(Clone)]
pub struct AttributeAccessor {
    client: Arc<dyn AddressSpaceClient>,
}

impl AttributeAccessor {
    /// Creates an accessor over `client`.
    pub fn new(client: Arc<dyn AddressSpaceClient>) -> Self {
        Self { client }
    }

    /// Returns the client.
    pub fn client(&self) -> &Arc<dyn AddressSpaceClient> {
        &self.client
    }

    /// Reads one attribute, returning the full envelope.
    pub async fn read_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
    ) -> ProxyResult<DataValue> {
        let started = Instant::now();
        let value = self.client.read_attribute(node_id, attribute).await?;
        debug!(
            node_id = %node_id,
            attribute = ?attribute,
            status = %value.status,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Attribute read"
        );
        Ok(value)
    }

    /// Reads one attribute and fails on a bad status.
    ///
    /// Uncertain values are returned and logged.
    pub async fn read_checked(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
    ) -> ProxyResult<DataValue> {
        let value = self.read_attribute(node_id, attribute).await?;
        if value.status.is_bad() {
            return Err(
                ServiceError::read_failed_with_status(node_id.to_string(), attribute, value.status)
                    .into(),
            );
        }
        if value.status.is_uncertain() {
            warn!(node_id = %node_id, status = %value.status, "Read returned uncertain value");
        }
        Ok(value)
    }

    /// Writes one attribute carrying only the payload.
    ///
    /// Returns the status the server reported, whatever its severity.
    pub async fn write_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
        value: Variant,
    ) -> ProxyResult<StatusCode> {
        let started = Instant::now();
        let status = self
            .client
            .write_attribute(node_id, attribute, DataValue::value_only(value))
            .await?;
        debug!(
            node_id = %node_id,
            attribute = ?attribute,
            status = %status,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Attribute written"
        );
        Ok(status)
    }

    /// Writes one attribute and fails unless the status is good or uncertain.
    pub async fn write_checked(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
        value: Variant,
    ) -> ProxyResult<StatusCode> {
        let status = self.write_attribute(node_id, attribute, value).await?;
        if status.is_bad() {
            return Err(ServiceError::write_failed_with_status(
                node_id.to_string(),
                attribute,
                status,
            )
            .into());
        }
        Ok(status)
    }
}

impl std::fmt::Debug for AttributeAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeAccessor")
            .field("client", &self.client.display_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::client::{MemberQuery, NodeHandle};
    use crate::codec::{DataTypeRegistry, SerializationContext};
    use crate::error::ProxyError;

    struct ScriptedClient {
        read: DataValue,
        write_status: StatusCode,
        writes: Mutex<Vec<DataValue>>,
    }

    #[async_trait]
    impl AddressSpaceClient for ScriptedClient {
        async fn resolve_member(
            &self,
            _parent: &NodeHandle,
            _query: &MemberQuery,
        ) -> ProxyResult<Option<NodeHandle>> {
            Ok(None)
        }

        async fn read_attribute(
            &self,
            _node_id: &NodeId,
            _attribute: AttributeId,
        ) -> ProxyResult<DataValue> {
            Ok(self.read.clone())
        }

        async fn write_attribute(
            &self,
            _node_id: &NodeId,
            _attribute: AttributeId,
            value: DataValue,
        ) -> ProxyResult<StatusCode> {
            self.writes.lock().push(value);
            Ok(self.write_status)
        }

        fn serialization_context(&self) -> Arc<dyn SerializationContext> {
            Arc::new(DataTypeRegistry::new())
        }
    }

    fn accessor(read: DataValue, write_status: StatusCode) -> (AttributeAccessor, Arc<ScriptedClient>) {
        let client = Arc::new(ScriptedClient {
            read,
            write_status,
            writes: Mutex::new(Vec::new()),
        });
        (AttributeAccessor::new(client.clone()), client)
    }

    #[tokio::test]
    async fn test_write_sends_payload_only() {
        let (accessor, client) = accessor(DataValue::default(), StatusCode::GOOD);
        accessor
            .write_checked(&NodeId::numeric(2, 1), AttributeId::Value, Variant::Int32(5))
            .await
            .unwrap();

        let writes = client.writes.lock();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].value, Variant::Int32(5));
        assert!(writes[0].source_timestamp.is_none());
        assert!(writes[0].server_timestamp.is_none());
    }

    #[tokio::test]
    async fn test_bad_write_status_is_failure() {
        let (accessor, _) = accessor(DataValue::default(), StatusCode::BAD_NOT_WRITABLE);
        let node = NodeId::numeric(2, 1);

        let status = accessor
            .write_attribute(&node, AttributeId::Value, Variant::Int32(5))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::BAD_NOT_WRITABLE);

        let err = accessor
            .write_checked(&node, AttributeId::Value, Variant::Int32(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::Service(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_NOT_WRITABLE);
    }

    #[tokio::test]
    async fn test_uncertain_write_status_is_success() {
        let (accessor, _) = accessor(DataValue::default(), StatusCode::UNCERTAIN);
        let status = accessor
            .write_checked(&NodeId::numeric(2, 1), AttributeId::Value, Variant::Boolean(true))
            .await
            .unwrap();
        assert!(status.is_uncertain());
    }

    #[tokio::test]
    async fn test_bad_read_status_is_failure() {
        let read = DataValue::with_status(Variant::Empty, StatusCode::BAD_NOT_READABLE);
        let (accessor, _) = accessor(read, StatusCode::GOOD);
        let node = NodeId::numeric(2, 1);

        let raw = accessor.read_attribute(&node, AttributeId::Value).await.unwrap();
        assert_eq!(raw.status, StatusCode::BAD_NOT_READABLE);

        let err = accessor.read_checked(&node, AttributeId::Value).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_NOT_READABLE);
    }
}
