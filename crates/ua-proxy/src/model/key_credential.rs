// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `KeyCredentialConfigurationType`.

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::base::{PropertyTypeNode, BASE_OBJECT_TYPE};
use crate::facade::{value_rank, MemberDescriptor, NodeTypeDefinition, Property};
use crate::status::StatusCode;
use crate::types::{ids, OPC_UA_NAMESPACE_URI};

/// `ResourceUri` property.
pub static RESOURCE_URI: Property<String, PropertyTypeNode> = Property::new(
    MemberDescriptor::property(OPC_UA_NAMESPACE_URI, "ResourceUri", ids::STRING, value_rank::SCALAR),
);

/// `ProfileUri` property.
pub static PROFILE_URI: Property<String, PropertyTypeNode> = Property::new(
    MemberDescriptor::property(OPC_UA_NAMESPACE_URI, "ProfileUri", ids::STRING, value_rank::SCALAR),
);

/// `EndpointUrls` property.
pub static ENDPOINT_URLS: Property<Vec<String>, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "EndpointUrls",
        ids::STRING,
        value_rank::ONE_DIMENSION,
    ));

/// `ServiceStatus` property.
pub static SERVICE_STATUS: Property<StatusCode, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "ServiceStatus",
        ids::STATUS_CODE,
        value_rank::SCALAR,
    ));

/// `KeyCredentialConfigurationType`.
pub static KEY_CREDENTIAL_CONFIGURATION_TYPE: Lazy<Arc<NodeTypeDefinition>> = Lazy::new(|| {
    NodeTypeDefinition::derive(
        &BASE_OBJECT_TYPE,
        "KeyCredentialConfigurationType",
        ids::KEY_CREDENTIAL_CONFIGURATION_TYPE,
        vec![
            RESOURCE_URI.descriptor(),
            PROFILE_URI.descriptor(),
            ENDPOINT_URLS.descriptor(),
            SERVICE_STATUS.descriptor(),
        ],
    )
    .shared()
});

crate::typed_node! {
    /// Credentials used to reach an external resource such as an
    /// authorization service.
    pub struct KeyCredentialConfigurationTypeNode => KEY_CREDENTIAL_CONFIGURATION_TYPE;
}

impl KeyCredentialConfigurationTypeNode {
    crate::property_accessors!(RESOURCE_URI: String => PropertyTypeNode {
        get: get_resource_uri,
        set: set_resource_uri,
        read: read_resource_uri,
        write: write_resource_uri,
        read_async: read_resource_uri_async,
        write_async: write_resource_uri_async,
        node: get_resource_uri_node,
        node_async: get_resource_uri_node_async,
    });

    crate::property_accessors!(PROFILE_URI: String => PropertyTypeNode {
        get: get_profile_uri,
        set: set_profile_uri,
        read: read_profile_uri,
        write: write_profile_uri,
        read_async: read_profile_uri_async,
        write_async: write_profile_uri_async,
        node: get_profile_uri_node,
        node_async: get_profile_uri_node_async,
    });

    crate::property_accessors!(ENDPOINT_URLS: Vec<String> => PropertyTypeNode {
        get: get_endpoint_urls,
        set: set_endpoint_urls,
        read: read_endpoint_urls,
        write: write_endpoint_urls,
        read_async: read_endpoint_urls_async,
        write_async: write_endpoint_urls_async,
        node: get_endpoint_urls_node,
        node_async: get_endpoint_urls_node_async,
    });

    crate::property_accessors!(SERVICE_STATUS: StatusCode => PropertyTypeNode {
        get: get_service_status,
        set: set_service_status,
        read: read_service_status,
        write: write_service_status,
        read_async: read_service_status_async,
        write_async: write_service_status_async,
        node: get_service_status_node,
        node_async: get_service_status_node_async,
    });
}
