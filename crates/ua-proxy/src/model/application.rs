// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server and application configuration objects.

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::base::{PropertyTypeNode, BASE_OBJECT_TYPE};
use crate::facade::{value_rank, MemberDescriptor, NodeTypeDefinition, Property};
use crate::types::{ids, OPC_UA_NAMESPACE_URI};

crate::ua_enum! {
    /// The role an application plays.
    pub enum ApplicationType [data_type = ids::APPLICATION_TYPE] {
        /// A server.
        Server = 0,
        /// A client.
        Client = 1,
        /// Both client and server.
        ClientAndServer = 2,
        /// A discovery server.
        DiscoveryServer = 3,
    }
}

// =============================================================================
// ServerConfigurationType
// =============================================================================

static SC_APPLICATION_URI: Property<String, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "ApplicationUri",
        ids::URI_STRING,
        value_rank::SCALAR,
    ));

static SC_PRODUCT_URI: Property<String, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "ProductUri",
        ids::URI_STRING,
        value_rank::SCALAR,
    ));

static SC_APPLICATION_TYPE: Property<ApplicationType, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "ApplicationType",
        ids::APPLICATION_TYPE,
        value_rank::SCALAR,
    ));

static SERVER_CAPABILITIES: Property<Vec<String>, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "ServerCapabilities",
        ids::STRING,
        value_rank::ONE_DIMENSION,
    ));

static SUPPORTED_PRIVATE_KEY_FORMATS: Property<Vec<String>, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "SupportedPrivateKeyFormats",
        ids::STRING,
        value_rank::ONE_DIMENSION,
    ));

static MAX_TRUST_LIST_SIZE: Property<u32, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "MaxTrustListSize",
        ids::UINT32,
        value_rank::SCALAR,
    ));

static MULTICAST_DNS_ENABLED: Property<bool, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "MulticastDnsEnabled",
        ids::BOOLEAN,
        value_rank::SCALAR,
    ));

static HAS_SECURE_ELEMENT: Property<bool, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "HasSecureElement",
        ids::BOOLEAN,
        value_rank::SCALAR,
    ));

/// `ServerConfigurationType`.
pub static SERVER_CONFIGURATION_TYPE: Lazy<Arc<NodeTypeDefinition>> = Lazy::new(|| {
    NodeTypeDefinition::derive(
        &BASE_OBJECT_TYPE,
        "ServerConfigurationType",
        ids::SERVER_CONFIGURATION_TYPE,
        vec![
            SC_APPLICATION_URI.descriptor(),
            SC_PRODUCT_URI.descriptor(),
            SC_APPLICATION_TYPE.descriptor(),
            SERVER_CAPABILITIES.descriptor(),
            SUPPORTED_PRIVATE_KEY_FORMATS.descriptor(),
            MAX_TRUST_LIST_SIZE.descriptor(),
            MULTICAST_DNS_ENABLED.descriptor(),
            HAS_SECURE_ELEMENT.descriptor(),
        ],
    )
    .shared()
});

crate::typed_node! {
    /// Certificate and capability settings of a server.
    pub struct ServerConfigurationTypeNode => SERVER_CONFIGURATION_TYPE;
}

impl ServerConfigurationTypeNode {
    crate::property_accessors!(SC_APPLICATION_URI: String => PropertyTypeNode {
        get: get_application_uri,
        set: set_application_uri,
        read: read_application_uri,
        write: write_application_uri,
        read_async: read_application_uri_async,
        write_async: write_application_uri_async,
        node: get_application_uri_node,
        node_async: get_application_uri_node_async,
    });

    crate::property_accessors!(SC_PRODUCT_URI: String => PropertyTypeNode {
        get: get_product_uri,
        set: set_product_uri,
        read: read_product_uri,
        write: write_product_uri,
        read_async: read_product_uri_async,
        write_async: write_product_uri_async,
        node: get_product_uri_node,
        node_async: get_product_uri_node_async,
    });

    crate::property_accessors!(SC_APPLICATION_TYPE: ApplicationType => PropertyTypeNode {
        get: get_application_type,
        set: set_application_type,
        read: read_application_type,
        write: write_application_type,
        read_async: read_application_type_async,
        write_async: write_application_type_async,
        node: get_application_type_node,
        node_async: get_application_type_node_async,
    });

    crate::property_accessors!(SERVER_CAPABILITIES: Vec<String> => PropertyTypeNode {
        get: get_server_capabilities,
        set: set_server_capabilities,
        read: read_server_capabilities,
        write: write_server_capabilities,
        read_async: read_server_capabilities_async,
        write_async: write_server_capabilities_async,
        node: get_server_capabilities_node,
        node_async: get_server_capabilities_node_async,
    });

    crate::property_accessors!(SUPPORTED_PRIVATE_KEY_FORMATS: Vec<String> => PropertyTypeNode {
        get: get_supported_private_key_formats,
        set: set_supported_private_key_formats,
        read: read_supported_private_key_formats,
        write: write_supported_private_key_formats,
        read_async: read_supported_private_key_formats_async,
        write_async: write_supported_private_key_formats_async,
        node: get_supported_private_key_formats_node,
        node_async: get_supported_private_key_formats_node_async,
    });

    crate::property_accessors!(MAX_TRUST_LIST_SIZE: u32 => PropertyTypeNode {
        get: get_max_trust_list_size,
        set: set_max_trust_list_size,
        read: read_max_trust_list_size,
        write: write_max_trust_list_size,
        read_async: read_max_trust_list_size_async,
        write_async: write_max_trust_list_size_async,
        node: get_max_trust_list_size_node,
        node_async: get_max_trust_list_size_node_async,
    });

    crate::property_accessors!(MULTICAST_DNS_ENABLED: bool => PropertyTypeNode {
        get: get_multicast_dns_enabled,
        set: set_multicast_dns_enabled,
        read: read_multicast_dns_enabled,
        write: write_multicast_dns_enabled,
        read_async: read_multicast_dns_enabled_async,
        write_async: write_multicast_dns_enabled_async,
        node: get_multicast_dns_enabled_node,
        node_async: get_multicast_dns_enabled_node_async,
    });

    crate::property_accessors!(HAS_SECURE_ELEMENT: bool => PropertyTypeNode {
        get: get_has_secure_element,
        set: set_has_secure_element,
        read: read_has_secure_element,
        write: write_has_secure_element,
        read_async: read_has_secure_element_async,
        write_async: write_has_secure_element_async,
        node: get_has_secure_element_node,
        node_async: get_has_secure_element_node_async,
    });
}

// =============================================================================
// ApplicationConfigurationType
// =============================================================================

// Redeclared by the subtype; they shadow the inherited entries of the same name.
static APPLICATION_URI: Property<String, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "ApplicationUri",
        ids::URI_STRING,
        value_rank::SCALAR,
    ));

static PRODUCT_URI: Property<String, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "ProductUri",
        ids::URI_STRING,
        value_rank::SCALAR,
    ));

static APPLICATION_TYPE: Property<ApplicationType, PropertyTypeNode> =
    Property::new(MemberDescriptor::property(
        OPC_UA_NAMESPACE_URI,
        "ApplicationType",
        ids::APPLICATION_TYPE,
        value_rank::SCALAR,
    ));

static ENABLED: Property<bool, PropertyTypeNode> = Property::new(MemberDescriptor::property(
    OPC_UA_NAMESPACE_URI,
    "Enabled",
    ids::BOOLEAN,
    value_rank::SCALAR,
));

/// `ApplicationConfigurationType`.
pub static APPLICATION_CONFIGURATION_TYPE: Lazy<Arc<NodeTypeDefinition>> = Lazy::new(|| {
    NodeTypeDefinition::derive(
        &SERVER_CONFIGURATION_TYPE,
        "ApplicationConfigurationType",
        ids::APPLICATION_CONFIGURATION_TYPE,
        vec![
            APPLICATION_URI.descriptor(),
            PRODUCT_URI.descriptor(),
            APPLICATION_TYPE.descriptor(),
            ENABLED.descriptor(),
        ],
    )
    .shared()
});

crate::typed_node! {
    /// Configuration of an application that may be disabled as a whole.
    ///
    /// Inherited `ServerConfigurationType` members are reached through
    /// [`as_server_configuration`](Self::as_server_configuration).
    pub struct ApplicationConfigurationTypeNode => APPLICATION_CONFIGURATION_TYPE;
}

impl ApplicationConfigurationTypeNode {
    /// Views this node through its supertype's accessors.
    pub fn as_server_configuration(&self) -> ServerConfigurationTypeNode {
        use crate::facade::TypedNode;
        ServerConfigurationTypeNode::from_facade(self.facade().clone())
    }

    crate::property_accessors!(APPLICATION_URI: String => PropertyTypeNode {
        get: get_application_uri,
        set: set_application_uri,
        read: read_application_uri,
        write: write_application_uri,
        read_async: read_application_uri_async,
        write_async: write_application_uri_async,
        node: get_application_uri_node,
        node_async: get_application_uri_node_async,
    });

    crate::property_accessors!(PRODUCT_URI: String => PropertyTypeNode {
        get: get_product_uri,
        set: set_product_uri,
        read: read_product_uri,
        write: write_product_uri,
        read_async: read_product_uri_async,
        write_async: write_product_uri_async,
        node: get_product_uri_node,
        node_async: get_product_uri_node_async,
    });

    crate::property_accessors!(APPLICATION_TYPE: ApplicationType => PropertyTypeNode {
        get: get_application_type,
        set: set_application_type,
        read: read_application_type,
        write: write_application_type,
        read_async: read_application_type_async,
        write_async: write_application_type_async,
        node: get_application_type_node,
        node_async: get_application_type_node_async,
    });

    crate::property_accessors!(ENABLED: bool => PropertyTypeNode {
        get: get_enabled,
        set: set_enabled,
        read: read_enabled,
        write: write_enabled,
        read_async: read_enabled_async,
        write_async: write_enabled_async,
        node: get_enabled_node,
        node_async: get_enabled_node_async,
    });
}
