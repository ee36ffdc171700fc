// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Wire-level values.
//!
//! [`Variant`] is the tagged union every attribute travels in. [`DataValue`]
//! wraps it with the status code and timestamps returned by a read.
//! Structured values travel as [`ExtensionObject`]s whose body is produced by
//! a codec from the serialization context.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::StatusCode;
use crate::types::{LocalizedText, NodeId, QualifiedName};

// =============================================================================
// ByteString
// =============================================================================

/// An opaque byte sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ByteString(pub Vec<u8>);

impl ByteString {
    /// Returns the bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", BASE64.encode(&self.0))
    }
}

// =============================================================================
// ExtensionObject
// =============================================================================

/// Encoded body of a structured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtensionBody {
    /// Binary-encoded body.
    Binary(ByteString),
    /// JSON-encoded body.
    Json(serde_json::Value),
}

/// A structured value boxed for transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionObject {
    /// Encoding node id; identifies both the data type and the body format.
    pub encoding_id: NodeId,
    /// Encoded body.
    pub body: ExtensionBody,
}

impl ExtensionObject {
    /// Creates a new extension object.
    pub fn new(encoding_id: NodeId, body: ExtensionBody) -> Self {
        Self { encoding_id, body }
    }
}

impl fmt::Display for ExtensionObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            ExtensionBody::Binary(bytes) => {
                write!(f, "ExtensionObject({}, {} bytes)", self.encoding_id, bytes.0.len())
            }
            ExtensionBody::Json(_) => write!(f, "ExtensionObject({}, json)", self.encoding_id),
        }
    }
}

// =============================================================================
// Variant
// =============================================================================

/// The generic wire value container.
///
/// `Empty` is the null value. An array holding no elements is
/// `Array(vec![])`, which is distinct from `Empty`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    /// Null value.
    #[default]
    Empty,
    /// Boolean value.
    Boolean(bool),
    /// Signed byte.
    SByte(i8),
    /// Unsigned byte.
    Byte(u8),
    /// 16-bit signed integer.
    Int16(i16),
    /// 16-bit unsigned integer.
    UInt16(u16),
    /// 32-bit signed integer; also carries enumeration codes.
    Int32(i32),
    /// 32-bit unsigned integer.
    UInt32(u32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit unsigned integer.
    UInt64(u64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit double.
    Double(f64),
    /// String value.
    String(String),
    /// Date/time value.
    DateTime(DateTime<Utc>),
    /// GUID value.
    Guid(Uuid),
    /// Byte string.
    ByteString(ByteString),
    /// Node id.
    NodeId(NodeId),
    /// Status code.
    StatusCode(StatusCode),
    /// Qualified name.
    QualifiedName(QualifiedName),
    /// Localized text.
    LocalizedText(LocalizedText),
    /// Encoded structured value.
    ExtensionObject(ExtensionObject),
    /// One-dimensional array.
    Array(Vec<Variant>),
}

impl Variant {
    /// Returns `true` for the null value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` for arrays.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns the built-in type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "Null",
            Self::Boolean(_) => "Boolean",
            Self::SByte(_) => "SByte",
            Self::Byte(_) => "Byte",
            Self::Int16(_) => "Int16",
            Self::UInt16(_) => "UInt16",
            Self::Int32(_) => "Int32",
            Self::UInt32(_) => "UInt32",
            Self::Int64(_) => "Int64",
            Self::UInt64(_) => "UInt64",
            Self::Float(_) => "Float",
            Self::Double(_) => "Double",
            Self::String(_) => "String",
            Self::DateTime(_) => "DateTime",
            Self::Guid(_) => "Guid",
            Self::ByteString(_) => "ByteString",
            Self::NodeId(_) => "NodeId",
            Self::StatusCode(_) => "StatusCode",
            Self::QualifiedName(_) => "QualifiedName",
            Self::LocalizedText(_) => "LocalizedText",
            Self::ExtensionObject(_) => "ExtensionObject",
            Self::Array(_) => "Array",
        }
    }

    /// Describes the value's shape for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Array(items) => match items.first() {
                Some(first) => format!("Array[{}] of {}", items.len(), first.type_name()),
                None => "Array[0]".to_string(),
            },
            Self::ExtensionObject(obj) => format!("ExtensionObject({})", obj.encoding_id),
            other => other.type_name().to_string(),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "null"),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::SByte(v) => write!(f, "{}", v),
            Self::Byte(v) => write!(f, "{}", v),
            Self::Int16(v) => write!(f, "{}", v),
            Self::UInt16(v) => write!(f, "{}", v),
            Self::Int32(v) => write!(f, "{}", v),
            Self::UInt32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::UInt64(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{}", v),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Guid(v) => write!(f, "{}", v),
            Self::ByteString(v) => write!(f, "{}", v),
            Self::NodeId(v) => write!(f, "{}", v),
            Self::StatusCode(v) => write!(f, "{}", v),
            Self::QualifiedName(v) => write!(f, "{}", v),
            Self::LocalizedText(v) => write!(f, "{}", v),
            Self::ExtensionObject(v) => write!(f, "{}", v),
            Self::Array(v) => write!(f, "[{} items]", v.len()),
        }
    }
}

// =============================================================================
// DataValue
// =============================================================================

/// A value with its status and timestamps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataValue {
    /// The value.
    pub value: Variant,
    /// Status of the value.
    pub status: StatusCode,
    /// Time the source produced the value.
    pub source_timestamp: Option<DateTime<Utc>>,
    /// Time the server observed the value.
    pub server_timestamp: Option<DateTime<Utc>>,
}

impl DataValue {
    /// Creates a value with Good status and no timestamps, as sent by writes.
    pub fn value_only(value: Variant) -> Self {
        Self {
            value,
            status: StatusCode::GOOD,
            source_timestamp: None,
            server_timestamp: None,
        }
    }

    /// Creates a value with the given status and a server timestamp of now.
    pub fn with_status(value: Variant, status: StatusCode) -> Self {
        Self {
            value,
            status,
            source_timestamp: None,
            server_timestamp: Some(Utc::now()),
        }
    }

    /// Returns a copy without timestamps, keeping only the payload.
    pub fn payload_only(&self) -> Self {
        Self::value_only(self.value.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_empty_array_differ() {
        let null = Variant::Empty;
        let empty = Variant::Array(vec![]);
        assert_ne!(null, empty);
        assert!(null.is_empty());
        assert!(!empty.is_empty());
        assert!(empty.is_array());
    }

    #[test]
    fn test_describe() {
        let array = Variant::Array(vec![Variant::String("a".into()), Variant::String("b".into())]);
        assert_eq!(array.describe(), "Array[2] of String");
        assert_eq!(Variant::Array(vec![]).describe(), "Array[0]");
        assert_eq!(Variant::Int32(3).describe(), "Int32");
    }

    #[test]
    fn test_display() {
        assert_eq!(Variant::Empty.to_string(), "null");
        assert_eq!(Variant::ByteString(ByteString(vec![1, 2, 3])).to_string(), "AQID");
        assert_eq!(
            Variant::StatusCode(StatusCode::BAD_TIMEOUT).to_string(),
            "BadTimeout (0x800a0000)"
        );
    }

    #[test]
    fn test_data_value_payload_only() {
        let read = DataValue::with_status(Variant::Double(21.5), StatusCode::UNCERTAIN);
        let write = read.payload_only();
        assert_eq!(write.value, Variant::Double(21.5));
        assert_eq!(write.status, StatusCode::GOOD);
        assert!(write.server_timestamp.is_none());
        assert!(write.source_timestamp.is_none());
    }
}
