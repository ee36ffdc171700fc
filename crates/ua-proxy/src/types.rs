// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Address-space identity types.
//!
//! - **NodeId**: the four OPC UA identifier kinds with string parsing
//! - **QualifiedName** / **LocalizedText**: browse and display names
//! - **NodeClass** / **AttributeId**: closed enumerations used by the services
//! - [`ids`]: well-known node ids of the standard namespace
//!
//! # Examples
//!
//! ```
//! use ua_proxy::types::NodeId;
//!
//! let node: NodeId = "ns=2;s=Boiler.Temperature".parse().unwrap();
//! assert_eq!(node.namespace_index, 2);
//! assert_eq!(node.to_string(), "ns=2;s=Boiler.Temperature");
//! ```

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConfigurationError, ProxyError};

/// Namespace URI of the standard OPC UA information model.
pub const OPC_UA_NAMESPACE_URI: &str = "http://opcfoundation.org/UA/";

// =============================================================================
// NodeId
// =============================================================================

/// OPC UA node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    /// Namespace index (0 = OPC UA standard namespace).
    pub namespace_index: u16,

    /// The node identifier.
    pub identifier: NodeIdentifier,
}

impl NodeId {
    /// Creates a numeric node ID.
    ///
    /// ```
    /// use ua_proxy::types::NodeId;
    ///
    /// let node = NodeId::numeric(2, 1001);
    /// assert_eq!(node.to_string(), "ns=2;i=1001");
    /// ```
    #[inline]
    pub const fn numeric(namespace_index: u16, value: u32) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Numeric(value),
        }
    }

    /// Creates a node ID in the standard namespace.
    #[inline]
    pub const fn ns0(value: u32) -> Self {
        Self::numeric(0, value)
    }

    /// Creates a string node ID.
    #[inline]
    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::String(value.into()),
        }
    }

    /// Creates a GUID node ID.
    #[inline]
    pub fn guid(namespace_index: u16, value: Uuid) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Guid(value),
        }
    }

    /// Creates an opaque (byte string) node ID.
    #[inline]
    pub fn opaque(namespace_index: u16, value: Vec<u8>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Opaque(value),
        }
    }

    /// Returns the null node ID (ns=0, i=0).
    #[inline]
    pub const fn null() -> Self {
        Self::numeric(0, 0)
    }

    /// Returns `true` if this is the null node ID.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && matches!(self.identifier, NodeIdentifier::Numeric(0))
    }

    /// Returns the numeric value if this is a numeric identifier.
    #[inline]
    pub fn as_numeric(&self) -> Option<u32> {
        match &self.identifier {
            NodeIdentifier::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// Converts to the OPC UA string format, omitting `ns=0`.
    pub fn to_opc_string(&self) -> String {
        if self.namespace_index == 0 {
            self.identifier.to_string()
        } else {
            format!("ns={};{}", self.namespace_index, self.identifier)
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_opc_string())
    }
}

impl FromStr for NodeId {
    type Err = ProxyError;

    /// Parses `ns=<n>;{i|s|g|b}=<id>`; the namespace part is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = |reason: String| {
            ProxyError::from(ConfigurationError::invalid_value("node_id", s, reason))
        };

        let (namespace_index, identifier_part) = match s.strip_prefix("ns=") {
            Some(rest) => {
                let (ns, id) = rest
                    .split_once(';')
                    .ok_or_else(|| invalid("missing identifier after namespace".into()))?;
                let ns: u16 = ns
                    .parse()
                    .map_err(|_| invalid("invalid namespace index".into()))?;
                (ns, id)
            }
            None => (0, s),
        };

        let identifier = if let Some(id) = identifier_part.strip_prefix("i=") {
            NodeIdentifier::Numeric(
                id.parse()
                    .map_err(|_| invalid("invalid numeric identifier".into()))?,
            )
        } else if let Some(id) = identifier_part.strip_prefix("s=") {
            NodeIdentifier::String(id.to_string())
        } else if let Some(id) = identifier_part.strip_prefix("g=") {
            NodeIdentifier::Guid(
                Uuid::parse_str(id).map_err(|e| invalid(format!("invalid GUID: {}", e)))?,
            )
        } else if let Some(id) = identifier_part.strip_prefix("b=") {
            NodeIdentifier::Opaque(
                BASE64
                    .decode(id)
                    .map_err(|e| invalid(format!("invalid base64: {}", e)))?,
            )
        } else {
            return Err(invalid("expected i=, s=, g= or b=".into()));
        };

        Ok(Self {
            namespace_index,
            identifier,
        })
    }
}

// =============================================================================
// NodeIdentifier
// =============================================================================

/// The four OPC UA identifier kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum NodeIdentifier {
    /// Numeric identifier.
    Numeric(u32),
    /// String identifier.
    String(String),
    /// GUID identifier.
    Guid(Uuid),
    /// Opaque identifier.
    Opaque(Vec<u8>),
}

impl fmt::Display for NodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "i={}", v),
            Self::String(v) => write!(f, "s={}", v),
            Self::Guid(v) => write!(f, "g={}", v),
            Self::Opaque(v) => write!(f, "b={}", BASE64.encode(v)),
        }
    }
}

// =============================================================================
// QualifiedName
// =============================================================================

/// A browse name qualified by a namespace index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Namespace index.
    pub namespace_index: u16,
    /// Name.
    pub name: String,
}

impl QualifiedName {
    /// Creates a new qualified name.
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}", self.namespace_index, self.name)
        }
    }
}

// =============================================================================
// LocalizedText
// =============================================================================

/// Human-readable text with an optional locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LocalizedText {
    /// Locale id such as `en-US`.
    pub locale: Option<String>,
    /// Text.
    pub text: String,
}

impl LocalizedText {
    /// Creates text without a locale.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            locale: None,
            text: text.into(),
        }
    }

    /// Creates text with a locale.
    pub fn with_locale(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            text: text.into(),
        }
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

// =============================================================================
// NodeClass
// =============================================================================

/// OPC UA node class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeClass {
    /// Object node.
    Object,
    /// Variable node.
    Variable,
    /// Method node.
    Method,
    /// Object type node.
    ObjectType,
    /// Variable type node.
    VariableType,
    /// Reference type node.
    ReferenceType,
    /// Data type node.
    DataType,
    /// View node.
    View,
}

impl NodeClass {
    /// Returns the OPC UA bit mask value.
    pub const fn value(&self) -> u32 {
        match self {
            Self::Object => 1,
            Self::Variable => 2,
            Self::Method => 4,
            Self::ObjectType => 8,
            Self::VariableType => 16,
            Self::ReferenceType => 32,
            Self::DataType => 64,
            Self::View => 128,
        }
    }

    /// Creates from OPC UA value.
    pub fn from_value(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Object),
            2 => Some(Self::Variable),
            4 => Some(Self::Method),
            8 => Some(Self::ObjectType),
            16 => Some(Self::VariableType),
            32 => Some(Self::ReferenceType),
            64 => Some(Self::DataType),
            128 => Some(Self::View),
            _ => None,
        }
    }

    /// Returns `true` if this node class carries a Value attribute.
    pub const fn has_value(&self) -> bool {
        matches!(self, Self::Variable | Self::VariableType)
    }
}

// =============================================================================
// AttributeId
// =============================================================================

/// OPC UA attribute ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttributeId {
    /// Node ID attribute.
    NodeId,
    /// Node class attribute.
    NodeClass,
    /// Browse name attribute.
    BrowseName,
    /// Display name attribute.
    DisplayName,
    /// Description attribute.
    Description,
    /// Write mask attribute.
    WriteMask,
    /// User write mask attribute.
    UserWriteMask,
    /// Value attribute.
    #[default]
    Value,
    /// Data type attribute.
    DataType,
    /// Value rank attribute.
    ValueRank,
    /// Array dimensions attribute.
    ArrayDimensions,
    /// Access level attribute.
    AccessLevel,
    /// User access level attribute.
    UserAccessLevel,
    /// Minimum sampling interval attribute.
    MinimumSamplingInterval,
    /// Historizing attribute.
    Historizing,
}

impl AttributeId {
    /// Returns the OPC UA numeric value.
    pub const fn value(&self) -> u32 {
        match self {
            Self::NodeId => 1,
            Self::NodeClass => 2,
            Self::BrowseName => 3,
            Self::DisplayName => 4,
            Self::Description => 5,
            Self::WriteMask => 6,
            Self::UserWriteMask => 7,
            Self::Value => 13,
            Self::DataType => 14,
            Self::ValueRank => 15,
            Self::ArrayDimensions => 16,
            Self::AccessLevel => 17,
            Self::UserAccessLevel => 18,
            Self::MinimumSamplingInterval => 19,
            Self::Historizing => 20,
        }
    }
}

// =============================================================================
// Well-known ids
// =============================================================================

/// Node ids of the standard namespace used by the proxy layer.
pub mod ids {
    use super::NodeId;

    /// `HasComponent` reference type.
    pub const HAS_COMPONENT: NodeId = NodeId::ns0(47);
    /// `HasProperty` reference type.
    pub const HAS_PROPERTY: NodeId = NodeId::ns0(46);

    /// `BaseObjectType`.
    pub const BASE_OBJECT_TYPE: NodeId = NodeId::ns0(58);
    /// `BaseVariableType`.
    pub const BASE_VARIABLE_TYPE: NodeId = NodeId::ns0(62);
    /// `BaseDataVariableType`.
    pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId::ns0(63);
    /// `PropertyType`.
    pub const PROPERTY_TYPE: NodeId = NodeId::ns0(68);

    /// `Boolean` data type.
    pub const BOOLEAN: NodeId = NodeId::ns0(1);
    /// `SByte` data type.
    pub const SBYTE: NodeId = NodeId::ns0(2);
    /// `Byte` data type.
    pub const BYTE: NodeId = NodeId::ns0(3);
    /// `Int16` data type.
    pub const INT16: NodeId = NodeId::ns0(4);
    /// `UInt16` data type.
    pub const UINT16: NodeId = NodeId::ns0(5);
    /// `Int32` data type.
    pub const INT32: NodeId = NodeId::ns0(6);
    /// `UInt32` data type.
    pub const UINT32: NodeId = NodeId::ns0(7);
    /// `Int64` data type.
    pub const INT64: NodeId = NodeId::ns0(8);
    /// `UInt64` data type.
    pub const UINT64: NodeId = NodeId::ns0(9);
    /// `Float` data type.
    pub const FLOAT: NodeId = NodeId::ns0(10);
    /// `Double` data type.
    pub const DOUBLE: NodeId = NodeId::ns0(11);
    /// `String` data type.
    pub const STRING: NodeId = NodeId::ns0(12);
    /// `DateTime` data type.
    pub const DATE_TIME: NodeId = NodeId::ns0(13);
    /// `Guid` data type.
    pub const GUID: NodeId = NodeId::ns0(14);
    /// `ByteString` data type.
    pub const BYTE_STRING: NodeId = NodeId::ns0(15);
    /// `NodeId` data type.
    pub const NODE_ID: NodeId = NodeId::ns0(17);
    /// `StatusCode` data type.
    pub const STATUS_CODE: NodeId = NodeId::ns0(19);
    /// `QualifiedName` data type.
    pub const QUALIFIED_NAME: NodeId = NodeId::ns0(20);
    /// `LocalizedText` data type.
    pub const LOCALIZED_TEXT: NodeId = NodeId::ns0(21);
    /// `Structure` data type.
    pub const STRUCTURE: NodeId = NodeId::ns0(22);
    /// `BaseDataType`, the root of all data types.
    pub const BASE_DATA_TYPE: NodeId = NodeId::ns0(24);
    /// `Enumeration`, the abstract supertype of all enumerations.
    pub const ENUMERATION: NodeId = NodeId::ns0(29);
    /// `UtcTime` data type.
    pub const UTC_TIME: NodeId = NodeId::ns0(294);
    /// `UriString` data type.
    pub const URI_STRING: NodeId = NodeId::ns0(23751);

    /// `FolderType`.
    pub const FOLDER_TYPE: NodeId = NodeId::ns0(61);
    /// `ServerType`.
    pub const SERVER_TYPE: NodeId = NodeId::ns0(2004);
    /// `ServerConfigurationType`.
    pub const SERVER_CONFIGURATION_TYPE: NodeId = NodeId::ns0(12581);
    /// `ApplicationConfigurationType`.
    pub const APPLICATION_CONFIGURATION_TYPE: NodeId = NodeId::ns0(25731);
    /// `KeyCredentialConfigurationType`.
    pub const KEY_CREDENTIAL_CONFIGURATION_TYPE: NodeId = NodeId::ns0(18001);
    /// `ServerStatusType`.
    pub const SERVER_STATUS_TYPE: NodeId = NodeId::ns0(2138);
    /// `BuildInfoType`.
    pub const BUILD_INFO_TYPE: NodeId = NodeId::ns0(3051);

    /// `ApplicationType` enumeration.
    pub const APPLICATION_TYPE: NodeId = NodeId::ns0(307);
    /// `ServerState` enumeration.
    pub const SERVER_STATE: NodeId = NodeId::ns0(852);
    /// `BuildInfo` structure.
    pub const BUILD_INFO: NodeId = NodeId::ns0(338);
    /// `ServerStatusDataType` structure.
    pub const SERVER_STATUS_DATA_TYPE: NodeId = NodeId::ns0(862);
    /// JSON encoding of `BuildInfo`.
    pub const BUILD_INFO_ENCODING_JSON: NodeId = NodeId::ns0(15361);
    /// JSON encoding of `ServerStatusDataType`.
    pub const SERVER_STATUS_DATA_TYPE_ENCODING_JSON: NodeId = NodeId::ns0(15367);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_parse() {
        let numeric: NodeId = "ns=2;i=1001".parse().unwrap();
        assert_eq!(numeric, NodeId::numeric(2, 1001));

        let standard: NodeId = "i=2253".parse().unwrap();
        assert_eq!(standard, NodeId::ns0(2253));
        assert_eq!(standard.to_string(), "i=2253");

        let string: NodeId = "ns=3;s=Line1.Motor".parse().unwrap();
        assert_eq!(string, NodeId::string(3, "Line1.Motor"));

        let opaque: NodeId = "ns=1;b=AQID".parse().unwrap();
        assert_eq!(opaque, NodeId::opaque(1, vec![1, 2, 3]));
        assert_eq!(opaque.to_string(), "ns=1;b=AQID");
    }

    #[test]
    fn test_node_id_parse_errors() {
        assert!("ns=x;i=1".parse::<NodeId>().is_err());
        assert!("ns=2".parse::<NodeId>().is_err());
        assert!("ns=2;q=1".parse::<NodeId>().is_err());
        assert!("g=not-a-guid".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_null_node_id() {
        assert!(NodeId::null().is_null());
        assert!(NodeId::default().is_null());
        assert!(!ids::HAS_PROPERTY.is_null());
    }

    #[test]
    fn test_qualified_name_display() {
        assert_eq!(QualifiedName::new(0, "ResourceUri").to_string(), "ResourceUri");
        assert_eq!(QualifiedName::new(3, "Pump").to_string(), "3:Pump");
    }

    #[test]
    fn test_node_class() {
        assert_eq!(NodeClass::from_value(2), Some(NodeClass::Variable));
        assert_eq!(NodeClass::from_value(3), None);
        assert!(NodeClass::Variable.has_value());
        assert!(!NodeClass::Object.has_value());
    }

    #[test]
    fn test_attribute_id_values() {
        assert_eq!(AttributeId::default(), AttributeId::Value);
        assert_eq!(AttributeId::Value.value(), 13);
        assert_eq!(AttributeId::DisplayName.value(), 4);
    }
}
