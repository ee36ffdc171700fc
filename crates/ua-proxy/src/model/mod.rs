// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! A slice of the standard information model.
//!
//! Each node type is a static [`NodeTypeDefinition`](crate::facade::NodeTypeDefinition)
//! plus a typed wrapper with one accessor family per member. Subtypes reuse
//! their parent's table, so `ApplicationConfigurationTypeNode` sees every
//! member of `ServerConfigurationType`.

mod application;
mod base;
mod key_credential;
mod server;
mod server_status;

pub use application::{
    ApplicationConfigurationTypeNode, ApplicationType, ServerConfigurationTypeNode,
    APPLICATION_CONFIGURATION_TYPE, SERVER_CONFIGURATION_TYPE,
};
pub use base::{
    BaseDataVariableTypeNode, BaseObjectTypeNode, FolderTypeNode, PropertyTypeNode,
    BASE_DATA_VARIABLE_TYPE, BASE_OBJECT_TYPE, BASE_VARIABLE_TYPE, FOLDER_TYPE, PROPERTY_TYPE,
};
pub use key_credential::{KeyCredentialConfigurationTypeNode, KEY_CREDENTIAL_CONFIGURATION_TYPE};
pub use server::{ServerTypeNode, SERVER_TYPE};
pub use server_status::{
    BuildInfo, BuildInfoTypeNode, ServerState, ServerStatusDataType, ServerStatusTypeNode,
    BUILD_INFO_TYPE, SERVER_STATUS_TYPE,
};

use std::sync::Arc;

use crate::codec::DataTypeRegistry;
use crate::facade::TypeRegistry;
use crate::types::ids;

/// Registers every node type of this module.
pub fn register_standard_types(registry: &TypeRegistry) {
    for definition in [
        &BASE_OBJECT_TYPE,
        &BASE_VARIABLE_TYPE,
        &BASE_DATA_VARIABLE_TYPE,
        &PROPERTY_TYPE,
        &FOLDER_TYPE,
        &SERVER_CONFIGURATION_TYPE,
        &APPLICATION_CONFIGURATION_TYPE,
        &KEY_CREDENTIAL_CONFIGURATION_TYPE,
        &BUILD_INFO_TYPE,
        &SERVER_STATUS_TYPE,
        &SERVER_TYPE,
    ] {
        registry.register(Arc::clone(&**definition));
    }
}

/// Registers JSON codecs for the structures of this module.
pub fn register_standard_codecs(registry: &DataTypeRegistry) {
    registry.register_json::<BuildInfo>(ids::BUILD_INFO_ENCODING_JSON);
    registry.register_json::<ServerStatusDataType>(ids::SERVER_STATUS_DATA_TYPE_ENCODING_JSON);
}
