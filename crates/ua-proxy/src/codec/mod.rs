// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Conversion between wire values and typed domain values.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          TypeCodec                              │
//! │        (enum policy + injected serialization context)           │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        UaType trait                             │
//! │          (one impl per domain type, composed for arrays)        │
//! └─────────────────────────────────────────────────────────────────┘
//!            │                 │                 │
//!            ▼                 ▼                 ▼
//! ┌───────────────┐ ┌───────────────┐ ┌───────────────────────────┐
//! │   Built-ins   │ │ Enumerations  │ │       Structures          │
//! │ (bool, i32..) │ │  (UaEnum)     │ │ (UaStructure + context)   │
//! └───────────────┘ └───────────────┘ └───────────────────────────┘
//! ```
//!
//! Decoding returns `Option<T>`: `None` means the wire value was null, or an
//! enumeration code was unknown under [`EnumPolicy::Permissive`]. Shape
//! mismatches are always errors.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use ua_proxy::codec::{DataTypeRegistry, EnumPolicy, TypeCodec};
//! use ua_proxy::value::Variant;
//!
//! let codec = TypeCodec::new(Arc::new(DataTypeRegistry::new()), EnumPolicy::Permissive);
//!
//! let urls = vec!["opc.tcp://a:4840".to_string(), "opc.tcp://b:4840".to_string()];
//! let wire = codec.encode(&urls).unwrap();
//! assert_eq!(codec.decode::<Vec<String>>(&wire).unwrap(), Some(urls));
//!
//! assert_eq!(codec.decode::<Vec<String>>(&Variant::Empty).unwrap(), None);
//! assert_eq!(codec.decode::<Vec<String>>(&Variant::Array(vec![])).unwrap(), Some(vec![]));
//! ```

mod enumeration;
mod structure;

pub use enumeration::{accepts_enum_data_type, decode_enum, UaEnum};
pub use structure::{
    accepts_structure_data_type, decode_structure, encode_structure, DataTypeRegistry,
    JsonStructureCodec, SerializationContext, StructureCodec, UaStructure,
};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::facade::{value_rank, MemberDescriptor};
use crate::error::{ConfigurationError, ConversionError};
use crate::status::StatusCode;
use crate::types::{ids, LocalizedText, NodeId, QualifiedName};
use crate::value::{ByteString, Variant};

// =============================================================================
// EnumPolicy
// =============================================================================

/// How unknown enumeration codes are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumPolicy {
    /// Unknown codes decode to `None`.
    #[default]
    Permissive,
    /// Unknown codes are a [`ConversionError::UnknownEnumValue`].
    Strict,
}

impl EnumPolicy {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permissive => "permissive",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for EnumPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EnumPolicy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(ConfigurationError::invalid_value(
                "enum_policy",
                other,
                "expected 'permissive' or 'strict'",
            )),
        }
    }
}

// =============================================================================
// CodecContext
// =============================================================================

/// Everything a [`UaType`] implementation may consult while converting.
#[derive(Clone, Copy)]
pub struct CodecContext<'a> {
    /// Structure codec lookup.
    pub serialization: &'a dyn SerializationContext,
    /// Unknown enumeration handling.
    pub enum_policy: EnumPolicy,
}

impl fmt::Debug for CodecContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecContext")
            .field("enum_policy", &self.enum_policy)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// UaType Trait
// =============================================================================

/// A domain type that can be carried in a [`Variant`].
///
/// Implementations exist for the built-in scalars, for `Vec<T>` (one
/// dimensional arrays) and `Option<T>` (nullable elements). Enumerations and
/// structures get theirs from [`ua_enum!`](crate::ua_enum) and
/// [`ua_structure!`](crate::ua_structure).
pub trait UaType: Sized + Clone + Send + Sync + 'static {
    /// Type name used in error messages.
    fn type_name() -> String;

    /// The data type id this Rust type maps to.
    fn data_type_id() -> NodeId;

    /// The value rank this Rust type maps to.
    fn value_rank() -> i32 {
        value_rank::SCALAR
    }

    /// Returns `true` if a member declared with `data_type` can be held by this type.
    ///
    /// Built-in scalars accept any declared type, since servers commonly
    /// declare subtypes such as `UtcTime` or `UriString`.
    fn accepts_data_type(_data_type: &NodeId) -> bool {
        true
    }

    /// The value a null wire value decodes to.
    fn from_null() -> Option<Self> {
        None
    }

    /// Decodes a non-null wire value.
    fn from_variant(value: &Variant, cx: &CodecContext<'_>) -> Result<Option<Self>, ConversionError>;

    /// Encodes this value.
    fn to_variant(&self, cx: &CodecContext<'_>) -> Result<Variant, ConversionError>;
}

macro_rules! builtin_type {
    ($ty:ty, $variant:ident, $id:expr, $name:literal) => {
        impl UaType for $ty {
            fn type_name() -> String {
                $name.to_string()
            }

            fn data_type_id() -> NodeId {
                $id
            }

            #[allow(clippy::clone_on_copy)]
            fn from_variant(
                value: &Variant,
                _cx: &CodecContext<'_>,
            ) -> Result<Option<Self>, ConversionError> {
                match value {
                    Variant::$variant(v) => Ok(Some(v.clone())),
                    other => Err(ConversionError::type_mismatch($name, other.describe())),
                }
            }

            #[allow(clippy::clone_on_copy)]
            fn to_variant(&self, _cx: &CodecContext<'_>) -> Result<Variant, ConversionError> {
                Ok(Variant::$variant(self.clone()))
            }
        }
    };
}

builtin_type!(bool, Boolean, ids::BOOLEAN, "Boolean");
builtin_type!(i8, SByte, ids::SBYTE, "SByte");
builtin_type!(u8, Byte, ids::BYTE, "Byte");
builtin_type!(i16, Int16, ids::INT16, "Int16");
builtin_type!(u16, UInt16, ids::UINT16, "UInt16");
builtin_type!(i32, Int32, ids::INT32, "Int32");
builtin_type!(u32, UInt32, ids::UINT32, "UInt32");
builtin_type!(i64, Int64, ids::INT64, "Int64");
builtin_type!(u64, UInt64, ids::UINT64, "UInt64");
builtin_type!(f32, Float, ids::FLOAT, "Float");
builtin_type!(f64, Double, ids::DOUBLE, "Double");
builtin_type!(String, String, ids::STRING, "String");
builtin_type!(DateTime<Utc>, DateTime, ids::DATE_TIME, "DateTime");
builtin_type!(Uuid, Guid, ids::GUID, "Guid");
builtin_type!(ByteString, ByteString, ids::BYTE_STRING, "ByteString");
builtin_type!(NodeId, NodeId, ids::NODE_ID, "NodeId");
builtin_type!(StatusCode, StatusCode, ids::STATUS_CODE, "StatusCode");
builtin_type!(QualifiedName, QualifiedName, ids::QUALIFIED_NAME, "QualifiedName");
builtin_type!(LocalizedText, LocalizedText, ids::LOCALIZED_TEXT, "LocalizedText");

/// Passes the wire value through untouched.
impl UaType for Variant {
    fn type_name() -> String {
        "Variant".to_string()
    }

    fn data_type_id() -> NodeId {
        ids::BASE_DATA_TYPE
    }

    fn value_rank() -> i32 {
        value_rank::ANY
    }

    fn from_variant(value: &Variant, _cx: &CodecContext<'_>) -> Result<Option<Self>, ConversionError> {
        Ok(Some(value.clone()))
    }

    fn to_variant(&self, _cx: &CodecContext<'_>) -> Result<Variant, ConversionError> {
        Ok(self.clone())
    }
}

impl<T: UaType> UaType for Vec<T> {
    fn type_name() -> String {
        format!("Vec<{}>", T::type_name())
    }

    fn data_type_id() -> NodeId {
        T::data_type_id()
    }

    fn value_rank() -> i32 {
        value_rank::ONE_DIMENSION
    }

    fn accepts_data_type(data_type: &NodeId) -> bool {
        T::accepts_data_type(data_type)
    }

    fn from_variant(value: &Variant, cx: &CodecContext<'_>) -> Result<Option<Self>, ConversionError> {
        let Variant::Array(items) = value else {
            return Err(ConversionError::value_rank_mismatch(
                value_rank::ONE_DIMENSION,
                value.describe(),
            ));
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let decoded = if item.is_empty() {
                    T::from_null()
                } else {
                    T::from_variant(item, cx)
                        .map_err(|e| ConversionError::array_element(index, e))?
                };
                decoded.ok_or_else(|| ConversionError::null_element(index, T::type_name()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn to_variant(&self, cx: &CodecContext<'_>) -> Result<Variant, ConversionError> {
        self.iter()
            .enumerate()
            .map(|(index, item)| {
                item.to_variant(cx)
                    .map_err(|e| ConversionError::array_element(index, e))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Variant::Array)
    }
}

/// Admits null where `T` alone would not, such as array elements.
impl<T: UaType> UaType for Option<T> {
    fn type_name() -> String {
        format!("Option<{}>", T::type_name())
    }

    fn data_type_id() -> NodeId {
        T::data_type_id()
    }

    fn value_rank() -> i32 {
        T::value_rank()
    }

    fn accepts_data_type(data_type: &NodeId) -> bool {
        T::accepts_data_type(data_type)
    }

    fn from_null() -> Option<Self> {
        Some(None)
    }

    fn from_variant(value: &Variant, cx: &CodecContext<'_>) -> Result<Option<Self>, ConversionError> {
        Ok(Some(T::from_variant(value, cx)?))
    }

    fn to_variant(&self, cx: &CodecContext<'_>) -> Result<Variant, ConversionError> {
        match self {
            Some(value) => value.to_variant(cx),
            None => Ok(Variant::Empty),
        }
    }
}

// =============================================================================
// TypeCodec
// =============================================================================

/// Converts wire values for the proxy, holding the serialization context
/// supplied by the client and the configured enum policy.
#[derive(Clone)]
pub struct TypeCodec {
    serialization: Arc<dyn SerializationContext>,
    enum_policy: EnumPolicy,
}

impl TypeCodec {
    /// Creates a codec.
    pub fn new(serialization: Arc<dyn SerializationContext>, enum_policy: EnumPolicy) -> Self {
        Self {
            serialization,
            enum_policy,
        }
    }

    /// Returns the enum policy.
    pub fn enum_policy(&self) -> EnumPolicy {
        self.enum_policy
    }

    /// Returns the serialization context.
    pub fn serialization_context(&self) -> &Arc<dyn SerializationContext> {
        &self.serialization
    }

    fn context(&self) -> CodecContext<'_> {
        CodecContext {
            serialization: self.serialization.as_ref(),
            enum_policy: self.enum_policy,
        }
    }

    /// Decodes a wire value. Returns `Ok(None)` for null.
    pub fn decode<T: UaType>(&self, value: &Variant) -> Result<Option<T>, ConversionError> {
        if value.is_empty() {
            return Ok(T::from_null());
        }
        T::from_variant(value, &self.context())
    }

    /// Encodes a domain value.
    pub fn encode<T: UaType>(&self, value: &T) -> Result<Variant, ConversionError> {
        value.to_variant(&self.context())
    }

    /// Checks that `T` can hold the member the descriptor declares.
    pub fn check_descriptor<T: UaType>(
        &self,
        descriptor: &MemberDescriptor,
    ) -> Result<(), ConversionError> {
        if !value_rank::compatible(descriptor.value_rank, T::value_rank()) {
            return Err(ConversionError::descriptor_mismatch(
                descriptor.browse_name,
                format!("value rank {}", descriptor.value_rank),
                format!("{} (rank {})", T::type_name(), T::value_rank()),
            ));
        }
        if !T::accepts_data_type(&descriptor.data_type) {
            return Err(ConversionError::descriptor_mismatch(
                descriptor.browse_name,
                format!("data type {}", descriptor.data_type),
                format!("{} ({})", T::type_name(), T::data_type_id()),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for TypeCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCodec")
            .field("enum_policy", &self.enum_policy)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
