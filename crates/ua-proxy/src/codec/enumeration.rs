// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Enumerations carried as `Int32` codes.

use tracing::debug;

use super::{CodecContext, EnumPolicy};
use crate::error::ConversionError;
use crate::types::{ids, NodeId};
use crate::value::Variant;

/// An enumeration data type.
///
/// Implemented through [`ua_enum!`](crate::ua_enum), which also provides the
/// [`UaType`](super::UaType) impl.
pub trait UaEnum: Copy + Send + Sync + 'static {
    /// Enumeration name used in errors and logs.
    const TYPE_NAME: &'static str;

    /// The enumeration's data type id.
    fn data_type_id() -> NodeId;

    /// Maps a wire code to a variant.
    fn from_value(value: i32) -> Option<Self>;

    /// Returns the wire code.
    fn value(self) -> i32;
}

/// Decodes an enumeration code under the context's policy.
pub fn decode_enum<E: UaEnum>(
    value: &Variant,
    cx: &CodecContext<'_>,
) -> Result<Option<E>, ConversionError> {
    let Variant::Int32(code) = value else {
        return Err(ConversionError::type_mismatch(
            format!("{} (Int32)", E::TYPE_NAME),
            value.describe(),
        ));
    };

    if let Some(variant) = E::from_value(*code) {
        return Ok(Some(variant));
    }

    match cx.enum_policy {
        EnumPolicy::Permissive => {
            debug!(enum_type = E::TYPE_NAME, code = *code, "Unknown enumeration code decoded as null");
            Ok(None)
        }
        EnumPolicy::Strict => Err(ConversionError::unknown_enum_value(E::TYPE_NAME, *code)),
    }
}

/// Returns `true` if a member declared with `declared` can hold enumeration `own`.
#[doc(hidden)]
pub fn accepts_enum_data_type(declared: &NodeId, own: &NodeId) -> bool {
    declared == own || *declared == ids::INT32 || *declared == ids::ENUMERATION
}

/// Declares an enumeration data type.
///
/// ```
/// use ua_proxy::types::NodeId;
///
/// ua_proxy::ua_enum! {
///     /// Redundancy support level.
///     pub enum RedundancySupport [data_type = NodeId::ns0(851)] {
///         None = 0,
///         Cold = 1,
///         Warm = 2,
///         Hot = 3,
///     }
/// }
///
/// use ua_proxy::codec::UaEnum;
/// assert_eq!(RedundancySupport::from_value(2), Some(RedundancySupport::Warm));
/// assert_eq!(RedundancySupport::Hot.value(), 3);
/// ```
#[macro_export]
macro_rules! ua_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident [data_type = $data_type:expr] {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::codec::UaEnum for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn data_type_id() -> $crate::types::NodeId {
                $data_type
            }

            fn from_value(value: i32) -> ::std::option::Option<Self> {
                match value {
                    $( $code => ::std::option::Option::Some(Self::$variant), )+
                    _ => ::std::option::Option::None,
                }
            }

            fn value(self) -> i32 {
                match self {
                    $( Self::$variant => $code, )+
                }
            }
        }

        impl $crate::codec::UaType for $name {
            fn type_name() -> ::std::string::String {
                ::std::string::String::from(stringify!($name))
            }

            fn data_type_id() -> $crate::types::NodeId {
                <Self as $crate::codec::UaEnum>::data_type_id()
            }

            fn accepts_data_type(data_type: &$crate::types::NodeId) -> bool {
                $crate::codec::accepts_enum_data_type(
                    data_type,
                    &<Self as $crate::codec::UaEnum>::data_type_id(),
                )
            }

            fn from_variant(
                value: &$crate::value::Variant,
                cx: &$crate::codec::CodecContext<'_>,
            ) -> ::std::result::Result<::std::option::Option<Self>, $crate::error::ConversionError> {
                $crate::codec::decode_enum::<Self>(value, cx)
            }

            fn to_variant(
                &self,
                _cx: &$crate::codec::CodecContext<'_>,
            ) -> ::std::result::Result<$crate::value::Variant, $crate::error::ConversionError> {
                ::std::result::Result::Ok($crate::value::Variant::Int32(
                    <Self as $crate::codec::UaEnum>::value(*self),
                ))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let name = match self {
                    $( Self::$variant => stringify!($variant), )+
                };
                write!(f, "{}_{}", name, <Self as $crate::codec::UaEnum>::value(*self))
            }
        }
    };
}
