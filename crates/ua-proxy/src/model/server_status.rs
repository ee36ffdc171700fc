// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server status variables and their data types.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::base::{BaseDataVariableTypeNode, BASE_DATA_VARIABLE_TYPE};
use crate::facade::{value_rank, MemberDescriptor, NodeTypeDefinition, Property};
use crate::types::{ids, LocalizedText, NodeId, OPC_UA_NAMESPACE_URI};

crate::ua_enum! {
    /// Operating state of a server.
    pub enum ServerState [data_type = ids::SERVER_STATE] {
        /// Running normally.
        Running = 0,
        /// Failed and unable to recover.
        Failed = 1,
        /// Running without configuration.
        NoConfiguration = 2,
        /// Suspended by an administrator.
        Suspended = 3,
        /// Shutting down.
        Shutdown = 4,
        /// In test mode.
        Test = 5,
        /// Lost contact with its data sources.
        CommunicationFault = 6,
        /// State not known.
        Unknown = 7,
    }
}

/// Software build information of a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildInfo {
    /// URI of the product.
    pub product_uri: String,
    /// Manufacturer.
    pub manufacturer_name: String,
    /// Product name.
    pub product_name: String,
    /// Software version.
    pub software_version: String,
    /// Build number.
    pub build_number: String,
    /// Build date.
    pub build_date: DateTime<Utc>,
}

crate::ua_structure!(BuildInfo [data_type = ids::BUILD_INFO]);

/// Value of a `ServerStatusType` variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerStatusDataType {
    /// Time the server started.
    pub start_time: DateTime<Utc>,
    /// Server clock.
    pub current_time: DateTime<Utc>,
    /// Operating state.
    #[serde(with = "state_code")]
    pub state: ServerState,
    /// Build information.
    pub build_info: BuildInfo,
    /// Seconds until a scheduled shutdown, zero if none.
    pub seconds_till_shutdown: u32,
    /// Reason for a scheduled shutdown.
    pub shutdown_reason: LocalizedText,
}

crate::ua_structure!(ServerStatusDataType [data_type = ids::SERVER_STATUS_DATA_TYPE]);

/// `ServerState` travels as its integer code inside structures.
mod state_code {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ServerState;
    use crate::codec::UaEnum;

    pub fn serialize<S: Serializer>(state: &ServerState, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(state.value())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ServerState, D::Error> {
        let code = i32::deserialize(deserializer)?;
        ServerState::from_value(code)
            .ok_or_else(|| D::Error::custom(format!("unknown ServerState code {}", code)))
    }
}

// =============================================================================
// BuildInfoType
// =============================================================================

const fn component(browse_name: &'static str, data_type: NodeId) -> MemberDescriptor {
    MemberDescriptor::variable(
        OPC_UA_NAMESPACE_URI,
        browse_name,
        ids::BASE_DATA_VARIABLE_TYPE,
        data_type,
        value_rank::SCALAR,
    )
}

static PRODUCT_URI: Property<String, BaseDataVariableTypeNode> =
    Property::new(component("ProductUri", ids::STRING));
static MANUFACTURER_NAME: Property<String, BaseDataVariableTypeNode> =
    Property::new(component("ManufacturerName", ids::STRING));
static PRODUCT_NAME: Property<String, BaseDataVariableTypeNode> =
    Property::new(component("ProductName", ids::STRING));
static SOFTWARE_VERSION: Property<String, BaseDataVariableTypeNode> =
    Property::new(component("SoftwareVersion", ids::STRING));
static BUILD_NUMBER: Property<String, BaseDataVariableTypeNode> =
    Property::new(component("BuildNumber", ids::STRING));
static BUILD_DATE: Property<DateTime<Utc>, BaseDataVariableTypeNode> =
    Property::new(component("BuildDate", ids::UTC_TIME));

/// `BuildInfoType`.
pub static BUILD_INFO_TYPE: Lazy<Arc<NodeTypeDefinition>> = Lazy::new(|| {
    NodeTypeDefinition::derive(
        &BASE_DATA_VARIABLE_TYPE,
        "BuildInfoType",
        ids::BUILD_INFO_TYPE,
        vec![
            PRODUCT_URI.descriptor(),
            MANUFACTURER_NAME.descriptor(),
            PRODUCT_NAME.descriptor(),
            SOFTWARE_VERSION.descriptor(),
            BUILD_NUMBER.descriptor(),
            BUILD_DATE.descriptor(),
        ],
    )
    .shared()
});

crate::typed_node! {
    /// A variable holding a [`BuildInfo`], with one component per field.
    pub struct BuildInfoTypeNode => BUILD_INFO_TYPE;
}

impl BuildInfoTypeNode {
    crate::property_accessors!(PRODUCT_URI: String => BaseDataVariableTypeNode {
        get: get_product_uri,
        set: set_product_uri,
        read: read_product_uri,
        write: write_product_uri,
        read_async: read_product_uri_async,
        write_async: write_product_uri_async,
        node: get_product_uri_node,
        node_async: get_product_uri_node_async,
    });

    crate::property_accessors!(MANUFACTURER_NAME: String => BaseDataVariableTypeNode {
        get: get_manufacturer_name,
        set: set_manufacturer_name,
        read: read_manufacturer_name,
        write: write_manufacturer_name,
        read_async: read_manufacturer_name_async,
        write_async: write_manufacturer_name_async,
        node: get_manufacturer_name_node,
        node_async: get_manufacturer_name_node_async,
    });

    crate::property_accessors!(PRODUCT_NAME: String => BaseDataVariableTypeNode {
        get: get_product_name,
        set: set_product_name,
        read: read_product_name,
        write: write_product_name,
        read_async: read_product_name_async,
        write_async: write_product_name_async,
        node: get_product_name_node,
        node_async: get_product_name_node_async,
    });

    crate::property_accessors!(SOFTWARE_VERSION: String => BaseDataVariableTypeNode {
        get: get_software_version,
        set: set_software_version,
        read: read_software_version,
        write: write_software_version,
        read_async: read_software_version_async,
        write_async: write_software_version_async,
        node: get_software_version_node,
        node_async: get_software_version_node_async,
    });

    crate::property_accessors!(BUILD_NUMBER: String => BaseDataVariableTypeNode {
        get: get_build_number,
        set: set_build_number,
        read: read_build_number,
        write: write_build_number,
        read_async: read_build_number_async,
        write_async: write_build_number_async,
        node: get_build_number_node,
        node_async: get_build_number_node_async,
    });

    crate::property_accessors!(BUILD_DATE: DateTime<Utc> => BaseDataVariableTypeNode {
        get: get_build_date,
        set: set_build_date,
        read: read_build_date,
        write: write_build_date,
        read_async: read_build_date_async,
        write_async: write_build_date_async,
        node: get_build_date_node,
        node_async: get_build_date_node_async,
    });
}

// =============================================================================
// ServerStatusType
// =============================================================================

static START_TIME: Property<DateTime<Utc>, BaseDataVariableTypeNode> =
    Property::new(component("StartTime", ids::UTC_TIME));
static CURRENT_TIME: Property<DateTime<Utc>, BaseDataVariableTypeNode> =
    Property::new(component("CurrentTime", ids::UTC_TIME));
static STATE: Property<ServerState, BaseDataVariableTypeNode> =
    Property::new(component("State", ids::SERVER_STATE));
static SECONDS_TILL_SHUTDOWN: Property<u32, BaseDataVariableTypeNode> =
    Property::new(component("SecondsTillShutdown", ids::UINT32));
static SHUTDOWN_REASON: Property<LocalizedText, BaseDataVariableTypeNode> =
    Property::new(component("ShutdownReason", ids::LOCALIZED_TEXT));

static BUILD_INFO: Property<BuildInfo, BuildInfoTypeNode> =
    Property::new(MemberDescriptor::variable(
        OPC_UA_NAMESPACE_URI,
        "BuildInfo",
        ids::BUILD_INFO_TYPE,
        ids::BUILD_INFO,
        value_rank::SCALAR,
    ));

/// `ServerStatusType`.
pub static SERVER_STATUS_TYPE: Lazy<Arc<NodeTypeDefinition>> = Lazy::new(|| {
    NodeTypeDefinition::derive(
        &BASE_DATA_VARIABLE_TYPE,
        "ServerStatusType",
        ids::SERVER_STATUS_TYPE,
        vec![
            START_TIME.descriptor(),
            CURRENT_TIME.descriptor(),
            STATE.descriptor(),
            BUILD_INFO.descriptor(),
            SECONDS_TILL_SHUTDOWN.descriptor(),
            SHUTDOWN_REASON.descriptor(),
        ],
    )
    .shared()
});

crate::typed_node! {
    /// A variable holding a [`ServerStatusDataType`], with one component per field.
    pub struct ServerStatusTypeNode => SERVER_STATUS_TYPE;
}

impl ServerStatusTypeNode {
    crate::property_accessors!(START_TIME: DateTime<Utc> => BaseDataVariableTypeNode {
        get: get_start_time,
        set: set_start_time,
        read: read_start_time,
        write: write_start_time,
        read_async: read_start_time_async,
        write_async: write_start_time_async,
        node: get_start_time_node,
        node_async: get_start_time_node_async,
    });

    crate::property_accessors!(CURRENT_TIME: DateTime<Utc> => BaseDataVariableTypeNode {
        get: get_current_time,
        set: set_current_time,
        read: read_current_time,
        write: write_current_time,
        read_async: read_current_time_async,
        write_async: write_current_time_async,
        node: get_current_time_node,
        node_async: get_current_time_node_async,
    });

    crate::property_accessors!(STATE: ServerState => BaseDataVariableTypeNode {
        get: get_state,
        set: set_state,
        read: read_state,
        write: write_state,
        read_async: read_state_async,
        write_async: write_state_async,
        node: get_state_node,
        node_async: get_state_node_async,
    });

    crate::property_accessors!(BUILD_INFO: BuildInfo => BuildInfoTypeNode {
        get: get_build_info,
        set: set_build_info,
        read: read_build_info,
        write: write_build_info,
        read_async: read_build_info_async,
        write_async: write_build_info_async,
        node: get_build_info_node,
        node_async: get_build_info_node_async,
    });

    crate::property_accessors!(SECONDS_TILL_SHUTDOWN: u32 => BaseDataVariableTypeNode {
        get: get_seconds_till_shutdown,
        set: set_seconds_till_shutdown,
        read: read_seconds_till_shutdown,
        write: write_seconds_till_shutdown,
        read_async: read_seconds_till_shutdown_async,
        write_async: write_seconds_till_shutdown_async,
        node: get_seconds_till_shutdown_node,
        node_async: get_seconds_till_shutdown_node_async,
    });

    crate::property_accessors!(SHUTDOWN_REASON: LocalizedText => BaseDataVariableTypeNode {
        get: get_shutdown_reason,
        set: set_shutdown_reason,
        read: read_shutdown_reason,
        write: write_shutdown_reason,
        read_async: read_shutdown_reason_async,
        write_async: write_shutdown_reason_async,
        node: get_shutdown_reason_node,
        node_async: get_shutdown_reason_node_async,
    });
}
