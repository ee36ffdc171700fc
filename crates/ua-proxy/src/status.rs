// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA status codes.
//!
//! A status code is a 32-bit value whose two top bits carry the severity:
//!
//! ```text
//! 00.. Good
//! 01.. Uncertain
//! 10.. Bad
//! ```
//!
//! The low 16 bits hold info flags and are ignored when naming a code.

use std::fmt;

use serde::{Deserialize, Serialize};

const SEVERITY_MASK: u32 = 0xC000_0000;
const UNCERTAIN_BIT: u32 = 0x4000_0000;
const BAD_BIT: u32 = 0x8000_0000;

// =============================================================================
// StatusCode
// =============================================================================

/// An OPC UA status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(u32);

impl StatusCode {
    /// The operation succeeded.
    pub const GOOD: Self = Self(0x0000_0000);
    /// Generic uncertain result.
    pub const UNCERTAIN: Self = Self(0x4000_0000);
    /// The value is an initial value for a variable that normally receives its value from another variable.
    pub const UNCERTAIN_INITIAL_VALUE: Self = Self(0x4092_0000);
    /// Generic bad result.
    pub const BAD: Self = Self(0x8000_0000);
    /// An unexpected error occurred.
    pub const BAD_UNEXPECTED_ERROR: Self = Self(0x8001_0000);
    /// An internal error occurred as a result of a programming or configuration error.
    pub const BAD_INTERNAL_ERROR: Self = Self(0x8002_0000);
    /// A low level communication error occurred.
    pub const BAD_COMMUNICATION_ERROR: Self = Self(0x8005_0000);
    /// Encoding halted because of invalid data in the objects being serialized.
    pub const BAD_ENCODING_ERROR: Self = Self(0x8006_0000);
    /// Decoding halted because of invalid data in the stream.
    pub const BAD_DECODING_ERROR: Self = Self(0x8007_0000);
    /// The operation timed out.
    pub const BAD_TIMEOUT: Self = Self(0x800A_0000);
    /// The server does not support the requested service.
    pub const BAD_SERVICE_UNSUPPORTED: Self = Self(0x800B_0000);
    /// The operation was cancelled because the application is shutting down.
    pub const BAD_SHUTDOWN: Self = Self(0x800C_0000);
    /// The operation could not complete because the client is not connected to the server.
    pub const BAD_SERVER_NOT_CONNECTED: Self = Self(0x800D_0000);
    /// The extension object cannot be (de)serialized because the data type id is not recognized.
    pub const BAD_DATA_TYPE_ID_UNKNOWN: Self = Self(0x8011_0000);
    /// User does not have permission to perform the requested operation.
    pub const BAD_USER_ACCESS_DENIED: Self = Self(0x801F_0000);
    /// The session was closed by the client.
    pub const BAD_SESSION_CLOSED: Self = Self(0x8026_0000);
    /// The request was cancelled by the client.
    pub const BAD_REQUEST_CANCELLED_BY_CLIENT: Self = Self(0x802C_0000);
    /// The syntax of the node id is not valid.
    pub const BAD_NODE_ID_INVALID: Self = Self(0x8033_0000);
    /// The node id refers to a node that does not exist in the server address space.
    pub const BAD_NODE_ID_UNKNOWN: Self = Self(0x8034_0000);
    /// The attribute is not supported for the specified node.
    pub const BAD_ATTRIBUTE_ID_INVALID: Self = Self(0x8035_0000);
    /// The access level does not allow reading or subscribing to the node.
    pub const BAD_NOT_READABLE: Self = Self(0x803A_0000);
    /// The access level does not allow writing to the node.
    pub const BAD_NOT_WRITABLE: Self = Self(0x803B_0000);
    /// The value was out of range.
    pub const BAD_OUT_OF_RANGE: Self = Self(0x803C_0000);
    /// The requested operation is not supported.
    pub const BAD_NOT_SUPPORTED: Self = Self(0x803D_0000);
    /// A requested item was not found or a search operation ended without success.
    pub const BAD_NOT_FOUND: Self = Self(0x803E_0000);
    /// The requested operation has no match to return.
    pub const BAD_NO_MATCH: Self = Self(0x806F_0000);
    /// The value supplied for the attribute is not of the same type as the attribute's value.
    pub const BAD_TYPE_MISMATCH: Self = Self(0x8074_0000);
    /// The server does not support writing the combination of value, status and timestamps provided.
    pub const BAD_WRITE_NOT_SUPPORTED: Self = Self(0x8073_0000);
    /// One or more arguments are invalid.
    pub const BAD_INVALID_ARGUMENT: Self = Self(0x80AB_0000);

    /// Creates a status code from its raw value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` if the severity is Good.
    #[inline]
    pub const fn is_good(self) -> bool {
        self.0 & SEVERITY_MASK == 0
    }

    /// Returns `true` if the severity is Uncertain.
    #[inline]
    pub const fn is_uncertain(self) -> bool {
        self.0 & UNCERTAIN_BIT != 0 && self.0 & BAD_BIT == 0
    }

    /// Returns `true` if the severity is Bad.
    #[inline]
    pub const fn is_bad(self) -> bool {
        self.0 & BAD_BIT != 0
    }

    /// Returns the code with the info bits cleared.
    #[inline]
    pub const fn code(self) -> u32 {
        self.0 & 0xFFFF_0000
    }

    /// Returns the symbolic name, or `None` for codes this crate does not know.
    pub fn name(self) -> Option<&'static str> {
        let name = match self.code() {
            0x0000_0000 => "Good",
            0x4000_0000 => "Uncertain",
            0x4092_0000 => "UncertainInitialValue",
            0x8000_0000 => "Bad",
            0x8001_0000 => "BadUnexpectedError",
            0x8002_0000 => "BadInternalError",
            0x8003_0000 => "BadOutOfMemory",
            0x8004_0000 => "BadResourceUnavailable",
            0x8005_0000 => "BadCommunicationError",
            0x8006_0000 => "BadEncodingError",
            0x8007_0000 => "BadDecodingError",
            0x800A_0000 => "BadTimeout",
            0x800B_0000 => "BadServiceUnsupported",
            0x800C_0000 => "BadShutdown",
            0x800D_0000 => "BadServerNotConnected",
            0x8011_0000 => "BadDataTypeIdUnknown",
            0x801F_0000 => "BadUserAccessDenied",
            0x8026_0000 => "BadSessionClosed",
            0x802C_0000 => "BadRequestCancelledByClient",
            0x8033_0000 => "BadNodeIdInvalid",
            0x8034_0000 => "BadNodeIdUnknown",
            0x8035_0000 => "BadAttributeIdInvalid",
            0x803A_0000 => "BadNotReadable",
            0x803B_0000 => "BadNotWritable",
            0x803C_0000 => "BadOutOfRange",
            0x803D_0000 => "BadNotSupported",
            0x803E_0000 => "BadNotFound",
            0x806F_0000 => "BadNoMatch",
            0x8073_0000 => "BadWriteNotSupported",
            0x8074_0000 => "BadTypeMismatch",
            0x80AB_0000 => "BadInvalidArgument",
            _ => return None,
        };
        Some(name)
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<StatusCode> for u32 {
    fn from(status: StatusCode) -> Self {
        status.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({:#010x})", name, self.0),
            None => write!(f, "{:#010x}", self.0),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_bits() {
        assert!(StatusCode::GOOD.is_good());
        assert!(!StatusCode::GOOD.is_bad());

        assert!(StatusCode::UNCERTAIN_INITIAL_VALUE.is_uncertain());
        assert!(!StatusCode::UNCERTAIN_INITIAL_VALUE.is_good());
        assert!(!StatusCode::UNCERTAIN_INITIAL_VALUE.is_bad());

        assert!(StatusCode::BAD_TIMEOUT.is_bad());
        assert!(!StatusCode::BAD_TIMEOUT.is_uncertain());
    }

    #[test]
    fn test_name_ignores_info_bits() {
        let with_flags = StatusCode::new(StatusCode::BAD_NOT_WRITABLE.value() | 0x0000_0400);
        assert_eq!(with_flags.name(), Some("BadNotWritable"));
        assert_eq!(StatusCode::new(0x80FF_0000).name(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StatusCode::BAD_UNEXPECTED_ERROR.to_string(),
            "BadUnexpectedError (0x80010000)"
        );
        assert_eq!(StatusCode::new(0x80FF_0000).to_string(), "0x80ff0000");
    }
}
