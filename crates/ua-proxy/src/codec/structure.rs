// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Structured data types.
//!
//! A structured value is boxed into an [`ExtensionObject`] whose encoding id
//! names both the data type and the body format. The mapping from ids to
//! body codecs is the [`SerializationContext`], supplied by the address
//! space client. [`DataTypeRegistry`] is the in-process implementation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::CodecContext;
use crate::error::ConversionError;
use crate::types::{ids, NodeId};
use crate::value::{ExtensionBody, ExtensionObject, Variant};

// =============================================================================
// Traits
// =============================================================================

/// A structured data type.
///
/// Field layout is whatever the type's serde impls produce; the body codec
/// decides how that layout is put on the wire.
pub trait UaStructure: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Structure name used in errors.
    const TYPE_NAME: &'static str;

    /// The structure's data type id.
    fn data_type_id() -> NodeId;
}

/// Encodes and decodes the body of one structured data type.
pub trait StructureCodec: Send + Sync {
    /// Name of the data type.
    fn type_name(&self) -> &str;

    /// The data type this codec handles.
    fn data_type_id(&self) -> &NodeId;

    /// The encoding id written into extension objects.
    fn encoding_id(&self) -> &NodeId;

    /// Encodes a serde representation into a body.
    fn encode(&self, value: serde_json::Value) -> Result<ExtensionBody, ConversionError>;

    /// Decodes a body into its serde representation.
    fn decode(&self, body: &ExtensionBody) -> Result<serde_json::Value, ConversionError>;
}

/// Lookup from data type and encoding ids to body codecs.
pub trait SerializationContext: Send + Sync {
    /// Returns the codec used to encode values of `data_type_id`.
    fn codec_for_type(&self, data_type_id: &NodeId) -> Option<Arc<dyn StructureCodec>>;

    /// Returns the codec that produced bodies tagged with `encoding_id`.
    fn codec_for_encoding(&self, encoding_id: &NodeId) -> Option<Arc<dyn StructureCodec>>;
}

// =============================================================================
// JsonStructureCodec
// =============================================================================

/// Body codec using the JSON encoding.
#[derive(Debug, Clone)]
pub struct JsonStructureCodec {
    type_name: String,
    data_type_id: NodeId,
    encoding_id: NodeId,
}

impl JsonStructureCodec {
    /// Creates a codec for an arbitrary data type.
    pub fn new(type_name: impl Into<String>, data_type_id: NodeId, encoding_id: NodeId) -> Self {
        Self {
            type_name: type_name.into(),
            data_type_id,
            encoding_id,
        }
    }

    /// Creates a codec for `S`.
    pub fn for_type<S: UaStructure>(encoding_id: NodeId) -> Self {
        Self::new(S::TYPE_NAME, S::data_type_id(), encoding_id)
    }
}

impl StructureCodec for JsonStructureCodec {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn data_type_id(&self) -> &NodeId {
        &self.data_type_id
    }

    fn encoding_id(&self) -> &NodeId {
        &self.encoding_id
    }

    fn encode(&self, value: serde_json::Value) -> Result<ExtensionBody, ConversionError> {
        Ok(ExtensionBody::Json(value))
    }

    fn decode(&self, body: &ExtensionBody) -> Result<serde_json::Value, ConversionError> {
        match body {
            ExtensionBody::Json(value) => Ok(value.clone()),
            ExtensionBody::Binary(bytes) => Err(ConversionError::decoding_failed(
                self.type_name.clone(),
                format!("{} byte binary body given to JSON codec", bytes.as_bytes().len()),
            )),
        }
    }
}

// =============================================================================
// DataTypeRegistry
// =============================================================================

#[derive(Default)]
struct RegistryInner {
    by_type: HashMap<NodeId, Arc<dyn StructureCodec>>,
    by_encoding: HashMap<NodeId, Arc<dyn StructureCodec>>,
}

/// Thread-safe [`SerializationContext`] backed by registered codecs.
#[derive(Default)]
pub struct DataTypeRegistry {
    inner: RwLock<RegistryInner>,
}

impl DataTypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a codec, replacing any codec for the same data type or encoding.
    pub fn register(&self, codec: Arc<dyn StructureCodec>) {
        debug!(
            type_name = codec.type_name(),
            data_type = %codec.data_type_id(),
            encoding = %codec.encoding_id(),
            "Registering structure codec"
        );
        let mut inner = self.inner.write();
        inner
            .by_type
            .insert(codec.data_type_id().clone(), Arc::clone(&codec));
        inner.by_encoding.insert(codec.encoding_id().clone(), codec);
    }

    /// Registers a JSON codec for `S`.
    pub fn register_json<S: UaStructure>(&self, encoding_id: NodeId) {
        self.register(Arc::new(JsonStructureCodec::for_type::<S>(encoding_id)));
    }

    /// Returns `true` if a codec is registered for the data type.
    pub fn contains_type(&self, data_type_id: &NodeId) -> bool {
        self.inner.read().by_type.contains_key(data_type_id)
    }

    /// Returns the number of registered data types.
    pub fn len(&self) -> usize {
        self.inner.read().by_type.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.read().by_type.is_empty()
    }
}

impl SerializationContext for DataTypeRegistry {
    fn codec_for_type(&self, data_type_id: &NodeId) -> Option<Arc<dyn StructureCodec>> {
        self.inner.read().by_type.get(data_type_id).cloned()
    }

    fn codec_for_encoding(&self, encoding_id: &NodeId) -> Option<Arc<dyn StructureCodec>> {
        self.inner.read().by_encoding.get(encoding_id).cloned()
    }
}

impl fmt::Debug for DataTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTypeRegistry")
            .field("types", &self.len())
            .finish()
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Decodes an extension object into `S`.
///
/// Fails if no codec knows the encoding or if the encoding belongs to a
/// different data type.
pub fn decode_structure<S: UaStructure>(
    value: &Variant,
    cx: &CodecContext<'_>,
) -> Result<Option<S>, ConversionError> {
    let Variant::ExtensionObject(object) = value else {
        return Err(ConversionError::type_mismatch(
            format!("{} (ExtensionObject)", S::TYPE_NAME),
            value.describe(),
        ));
    };

    let codec = cx
        .serialization
        .codec_for_encoding(&object.encoding_id)
        .ok_or_else(|| ConversionError::codec_not_found(object.encoding_id.to_string()))?;

    if *codec.data_type_id() != S::data_type_id() {
        return Err(ConversionError::structure_type_mismatch(
            S::TYPE_NAME,
            format!("{} ({})", object.encoding_id, codec.type_name()),
        ));
    }

    let json = codec.decode(&object.body)?;
    serde_json::from_value(json)
        .map(Some)
        .map_err(|e| ConversionError::decoding_failed(S::TYPE_NAME, e.to_string()))
}

/// Encodes `S` into an extension object.
pub fn encode_structure<S: UaStructure>(
    value: &S,
    cx: &CodecContext<'_>,
) -> Result<Variant, ConversionError> {
    let data_type_id = S::data_type_id();
    let codec = cx
        .serialization
        .codec_for_type(&data_type_id)
        .ok_or_else(|| ConversionError::codec_not_found(data_type_id.to_string()))?;

    let json = serde_json::to_value(value)
        .map_err(|e| ConversionError::encoding_failed(S::TYPE_NAME, e.to_string()))?;
    let body = codec.encode(json)?;

    Ok(Variant::ExtensionObject(ExtensionObject::new(
        codec.encoding_id().clone(),
        body,
    )))
}

/// Returns `true` if a member declared with `declared` can hold structure `own`.
#[doc(hidden)]
pub fn accepts_structure_data_type(declared: &NodeId, own: &NodeId) -> bool {
    declared == own || *declared == ids::STRUCTURE || *declared == ids::BASE_DATA_TYPE
}

/// Binds a serde type to a structured data type.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use ua_proxy::types::NodeId;
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// #[serde(rename_all = "PascalCase")]
/// pub struct Range {
///     pub low: f64,
///     pub high: f64,
/// }
///
/// ua_proxy::ua_structure!(Range [data_type = NodeId::ns0(884)]);
/// ```
#[macro_export]
macro_rules! ua_structure {
    ($name:ident [data_type = $data_type:expr]) => {
        impl $crate::codec::UaStructure for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn data_type_id() -> $crate::types::NodeId {
                $data_type
            }
        }

        impl $crate::codec::UaType for $name {
            fn type_name() -> ::std::string::String {
                ::std::string::String::from(stringify!($name))
            }

            fn data_type_id() -> $crate::types::NodeId {
                <Self as $crate::codec::UaStructure>::data_type_id()
            }

            fn accepts_data_type(data_type: &$crate::types::NodeId) -> bool {
                $crate::codec::accepts_structure_data_type(
                    data_type,
                    &<Self as $crate::codec::UaStructure>::data_type_id(),
                )
            }

            fn from_variant(
                value: &$crate::value::Variant,
                cx: &$crate::codec::CodecContext<'_>,
            ) -> ::std::result::Result<::std::option::Option<Self>, $crate::error::ConversionError> {
                $crate::codec::decode_structure::<Self>(value, cx)
            }

            fn to_variant(
                &self,
                cx: &$crate::codec::CodecContext<'_>,
            ) -> ::std::result::Result<$crate::value::Variant, $crate::error::ConversionError> {
                $crate::codec::encode_structure(self, cx)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::codec::{EnumPolicy, TypeCodec};
    use crate::value::ByteString;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Point {
        x: f64,
        y: f64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Label {
        text: String,
    }

    crate::ua_structure!(Point [data_type = NodeId::numeric(2, 5001)]);
    crate::ua_structure!(Label [data_type = NodeId::numeric(2, 5002)]);

    fn codec() -> TypeCodec {
        let registry = DataTypeRegistry::new();
        registry.register_json::<Point>(NodeId::numeric(2, 5101));
        registry.register_json::<Label>(NodeId::numeric(2, 5102));
        TypeCodec::new(Arc::new(registry), EnumPolicy::Permissive)
    }

    #[test]
    fn test_structure_round_trip() {
        let codec = codec();
        let point = Point { x: 1.5, y: -2.0 };

        let wire = codec.encode(&point).unwrap();
        let Variant::ExtensionObject(object) = &wire else {
            panic!("expected extension object, got {:?}", wire);
        };
        assert_eq!(object.encoding_id, NodeId::numeric(2, 5101));
        assert_eq!(object.body, ExtensionBody::Json(serde_json::json!({"X": 1.5, "Y": -2.0})));

        assert_eq!(codec.decode::<Point>(&wire).unwrap(), Some(point));
    }

    #[test]
    fn test_structure_array_round_trip() {
        let codec = codec();
        let points = vec![Point { x: 0.0, y: 1.0 }, Point { x: 2.0, y: 3.0 }];

        let wire = codec.encode(&points).unwrap();
        match &wire {
            Variant::Array(items) => {
                assert_eq!(items.len(), 2);
                assert!(items.iter().all(|i| matches!(i, Variant::ExtensionObject(_))));
            }
            other => panic!("expected array, got {:?}", other),
        }
        assert_eq!(codec.decode::<Vec<Point>>(&wire).unwrap(), Some(points));
    }

    #[test]
    fn test_rejects_other_structure_type() {
        let codec = codec();
        let wire = codec.encode(&Label { text: "x".into() }).unwrap();
        let err = codec.decode::<Point>(&wire).unwrap_err();
        assert!(matches!(err, ConversionError::StructureTypeMismatch { .. }));
    }

    #[test]
    fn test_unknown_encoding() {
        let codec = codec();
        let wire = Variant::ExtensionObject(ExtensionObject::new(
            NodeId::numeric(2, 9999),
            ExtensionBody::Json(serde_json::json!({})),
        ));
        let err = codec.decode::<Point>(&wire).unwrap_err();
        assert!(matches!(err, ConversionError::CodecNotFound { .. }));

        let empty = TypeCodec::new(Arc::new(DataTypeRegistry::new()), EnumPolicy::Permissive);
        let err = empty.encode(&Point { x: 0.0, y: 0.0 }).unwrap_err();
        assert!(matches!(err, ConversionError::CodecNotFound { .. }));
    }

    #[test]
    fn test_binary_body_rejected_by_json_codec() {
        let codec = codec();
        let wire = Variant::ExtensionObject(ExtensionObject::new(
            NodeId::numeric(2, 5101),
            ExtensionBody::Binary(ByteString(vec![0, 1, 2])),
        ));
        let err = codec.decode::<Point>(&wire).unwrap_err();
        assert!(matches!(err, ConversionError::DecodingFailed { .. }));
    }

    #[test]
    fn test_malformed_body() {
        let codec = codec();
        let wire = Variant::ExtensionObject(ExtensionObject::new(
            NodeId::numeric(2, 5101),
            ExtensionBody::Json(serde_json::json!({"X": "left"})),
        ));
        assert!(matches!(
            codec.decode::<Point>(&wire).unwrap_err(),
            ConversionError::DecodingFailed { .. }
        ));
    }

    #[test]
    fn test_registry_lookup() {
        let registry = DataTypeRegistry::new();
        assert!(registry.is_empty());
        registry.register_json::<Point>(NodeId::numeric(2, 5101));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains_type(&NodeId::numeric(2, 5001)));
        assert!(registry.codec_for_encoding(&NodeId::numeric(2, 5101)).is_some());
        assert!(registry.codec_for_encoding(&NodeId::numeric(2, 5001)).is_none());
    }
}
