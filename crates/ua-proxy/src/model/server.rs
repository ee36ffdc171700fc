// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `ServerType`, the type of the `Server` object.

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::base::{BaseObjectTypeNode, PropertyTypeNode, BASE_OBJECT_TYPE};
use super::server_status::{ServerStatusDataType, ServerStatusTypeNode};
use crate::facade::{value_rank, Component, MemberDescriptor, NodeTypeDefinition, Property};
use crate::types::{ids, NodeId, OPC_UA_NAMESPACE_URI};

const VENDOR_SERVER_INFO_TYPE: NodeId = NodeId::ns0(2033);

static SERVER_ARRAY: Property<Vec<String>, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "ServerArray",
        ids::STRING,
        value_rank::ONE_DIMENSION,
    ));

static NAMESPACE_ARRAY: Property<Vec<String>, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "NamespaceArray",
        ids::STRING,
        value_rank::ONE_DIMENSION,
    ));

static SERVICE_LEVEL: Property<u8, PropertyTypeNode> = Property::new(MemberDescriptor::property(
    OPC_UA_NAMESPACE_URI,
    "ServiceLevel",
    ids::BYTE,
    value_rank::SCALAR,
));

static AUDITING: Property<bool, PropertyTypeNode> = Property::new(MemberDescriptor::property(
    OPC_UA_NAMESPACE_URI,
    "Auditing",
    ids::BOOLEAN,
    value_rank::SCALAR,
));

static SERVER_STATUS: Property<ServerStatusDataType, ServerStatusTypeNode> =
    Property::new(MemberDescriptor::variable(
        OPC_UA_NAMESPACE_URI,
        "ServerStatus",
        ids::SERVER_STATUS_TYPE,
        ids::SERVER_STATUS_DATA_TYPE,
        value_rank::SCALAR,
    ));

static VENDOR_SERVER_INFO: Component<BaseObjectTypeNode> = Component::new(
    MemberDescriptor::object(OPC_UA_NAMESPACE_URI, "VendorServerInfo", VENDOR_SERVER_INFO_TYPE),
);

/// `ServerType`.
pub static SERVER_TYPE: Lazy<Arc<NodeTypeDefinition>> = Lazy::new(|| {
    NodeTypeDefinition::derive(
        &BASE_OBJECT_TYPE,
        "ServerType",
        ids::SERVER_TYPE,
        vec![
            SERVER_ARRAY.descriptor(),
            NAMESPACE_ARRAY.descriptor(),
            SERVER_STATUS.descriptor(),
            SERVICE_LEVEL.descriptor(),
            AUDITING.descriptor(),
            VENDOR_SERVER_INFO.descriptor(),
        ],
    )
    .shared()
});

crate::typed_node! {
    /// The `Server` object every server exposes under `Objects`.
    pub struct ServerTypeNode => SERVER_TYPE;
}

impl ServerTypeNode {
    crate::property_accessors!(SERVER_ARRAY: Vec<String> => PropertyTypeNode {
        get: get_server_array,
        set: set_server_array,
        read: read_server_array,
        write: write_server_array,
        read_async: read_server_array_async,
        write_async: write_server_array_async,
        node: get_server_array_node,
        node_async: get_server_array_node_async,
    });

    crate::property_accessors!(NAMESPACE_ARRAY: Vec<String> => PropertyTypeNode {
        get: get_namespace_array,
        set: set_namespace_array,
        read: read_namespace_array,
        write: write_namespace_array,
        read_async: read_namespace_array_async,
        write_async: write_namespace_array_async,
        node: get_namespace_array_node,
        node_async: get_namespace_array_node_async,
    });

    crate::property_accessors!(SERVER_STATUS: ServerStatusDataType => ServerStatusTypeNode {
        get: get_server_status,
        set: set_server_status,
        read: read_server_status,
        write: write_server_status,
        read_async: read_server_status_async,
        write_async: write_server_status_async,
        node: get_server_status_node,
        node_async: get_server_status_node_async,
    });

    crate::property_accessors!(SERVICE_LEVEL: u8 => PropertyTypeNode {
        get: get_service_level,
        set: set_service_level,
        read: read_service_level,
        write: write_service_level,
        read_async: read_service_level_async,
        write_async: write_service_level_async,
        node: get_service_level_node,
        node_async: get_service_level_node_async,
    });

    crate::property_accessors!(AUDITING: bool => PropertyTypeNode {
        get: get_auditing,
        set: set_auditing,
        read: read_auditing,
        write: write_auditing,
        read_async: read_auditing_async,
        write_async: write_auditing_async,
        node: get_auditing_node,
        node_async: get_auditing_node_async,
    });

    crate::component_accessors!(VENDOR_SERVER_INFO => BaseObjectTypeNode {
        node: get_vendor_server_info_node,
        node_async: get_vendor_server_info_node_async,
    });
}
