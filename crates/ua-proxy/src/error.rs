// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the node proxy layer.
//!
//! Every failure a proxy call can produce is a [`ProxyError`]. The variants
//! split failures by how a caller is expected to react:
//!
//! ```text
//! ProxyError
//! ├── Resolution    - Child lookup outcomes (not found is non-fatal)
//! ├── Service       - Remote read/write/resolve failures and bad status codes
//! ├── Conversion    - Wire value does not match the declared type
//! ├── Cancellation  - Blocking wait interrupted or task cancelled
//! ├── Execution     - Failures with no extractable cause
//! └── Configuration - Invalid settings or missing runtime
//! ```
//!
//! # Examples
//!
//! ```
//! use ua_proxy::error::{ProxyError, ErrorSeverity};
//! use ua_proxy::StatusCode;
//!
//! let error = ProxyError::not_found("ns=0;i=2253", "http://opcfoundation.org/UA/", "BuildInfo");
//! assert!(error.is_not_found());
//! assert_eq!(error.severity(), ErrorSeverity::Info);
//! assert_eq!(error.status_code(), StatusCode::BAD_NOT_FOUND);
//! ```

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;
use tracing::Level;

use crate::status::StatusCode;
use crate::types::AttributeId;

// =============================================================================
// ProxyError - Main Error Type
// =============================================================================

/// The main error type for proxy operations.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Child lookup outcomes.
    #[error("{0}")]
    Resolution(#[from] ResolutionError),

    /// Remote service failures.
    #[error("{0}")]
    Service(#[from] ServiceError),

    /// Value coercion failures.
    #[error("{0}")]
    Conversion(#[from] ConversionError),

    /// Interrupted or cancelled waits.
    #[error("{0}")]
    Cancellation(#[from] CancellationError),

    /// Failures with no specific cause.
    #[error("{0}")]
    Execution(#[from] ExecutionError),

    /// Configuration errors.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
}

impl ProxyError {
    // =========================================================================
    // Convenience Factory Methods
    // =========================================================================

    /// Creates a child-not-found outcome.
    pub fn not_found(
        parent: impl Into<String>,
        namespace_uri: impl Into<String>,
        browse_name: impl Into<String>,
    ) -> Self {
        Self::Resolution(ResolutionError::not_found(parent, namespace_uri, browse_name))
    }

    /// Creates a read failed error.
    pub fn read_failed(
        node_id: impl Into<String>,
        attribute: AttributeId,
        message: impl Into<String>,
    ) -> Self {
        Self::Service(ServiceError::read_failed(node_id, attribute, message))
    }

    /// Creates a write failed error.
    pub fn write_failed(
        node_id: impl Into<String>,
        attribute: AttributeId,
        message: impl Into<String>,
    ) -> Self {
        Self::Service(ServiceError::write_failed(node_id, attribute, message))
    }

    /// Creates a not connected error.
    pub fn not_connected() -> Self {
        Self::Service(ServiceError::NotConnected)
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::Conversion(ConversionError::type_mismatch(expected, actual))
    }

    /// Creates an interrupted error.
    pub fn interrupted(operation: impl Into<String>) -> Self {
        Self::Cancellation(CancellationError::interrupted(operation))
    }

    /// Creates a generic unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Execution(ExecutionError::unexpected(message))
    }

    // =========================================================================
    // Error Properties
    // =========================================================================

    /// Returns `true` if this is the non-fatal "child does not exist" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Resolution(ResolutionError::NotFound { .. }))
    }

    /// Returns `true` if the call was interrupted or cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancellation(_))
    }

    /// Returns `true` if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Resolution(e) => e.is_retryable(),
            Self::Service(e) => e.is_retryable(),
            Self::Cancellation(_)
            | Self::Conversion(_)
            | Self::Execution(_)
            | Self::Configuration(_) => false,
        }
    }

    /// Returns the severity level of this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Resolution(e) => e.severity(),
            Self::Service(e) => e.severity(),
            Self::Conversion(_) => ErrorSeverity::Error,
            Self::Cancellation(_) => ErrorSeverity::Warning,
            Self::Execution(e) => e.severity(),
            Self::Configuration(_) => ErrorSeverity::Critical,
        }
    }

    /// Returns the error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Resolution(_) => "resolution",
            Self::Service(_) => "service",
            Self::Conversion(_) => "conversion",
            Self::Cancellation(_) => "cancellation",
            Self::Execution(_) => "execution",
            Self::Configuration(_) => "configuration",
        }
    }

    /// Returns a unique error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Resolution(e) => e.error_code(),
            Self::Service(e) => e.error_code(),
            Self::Conversion(e) => e.error_code(),
            Self::Cancellation(e) => e.error_code(),
            Self::Execution(e) => e.error_code(),
            Self::Configuration(e) => e.error_code(),
        }
    }

    /// Returns the OPC UA status code that best describes this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Resolution(e) => e.status_code(),
            Self::Service(e) => e.status_code(),
            Self::Conversion(e) => e.status_code(),
            Self::Cancellation(_) => StatusCode::BAD_REQUEST_CANCELLED_BY_CLIENT,
            Self::Execution(e) => e.status_code(),
            Self::Configuration(_) => StatusCode::BAD_INTERNAL_ERROR,
        }
    }

    /// Returns recovery hints for this error.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::Resolution(e) => e.recovery_hints(),
            Self::Service(e) => e.recovery_hints(),
            Self::Conversion(e) => e.recovery_hints(),
            Self::Cancellation(_) => vec!["Reissue the call if the interruption was not intended"],
            Self::Execution(e) => e.recovery_hints(),
            Self::Configuration(e) => e.recovery_hints(),
        }
    }

    /// Returns the tracing level for this error.
    pub fn tracing_level(&self) -> Level {
        self.severity().to_tracing_level()
    }

    /// Logs this error with appropriate level and context.
    pub fn log(&self, context: &str) {
        let level = self.tracing_level();
        let code = self.error_code();
        let status = self.status_code();

        match level {
            Level::ERROR => tracing::error!(
                error_code = %code,
                category = self.category(),
                status = %status,
                context = context,
                "{self}"
            ),
            Level::WARN => tracing::warn!(
                error_code = %code,
                category = self.category(),
                status = %status,
                context = context,
                "{self}"
            ),
            _ => tracing::debug!(
                error_code = %code,
                category = self.category(),
                status = %status,
                context = context,
                "{self}"
            ),
        }
    }
}

// =============================================================================
// ResolutionError
// =============================================================================

/// Outcomes of resolving a named child under a parent node.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The child does not exist on this server.
    #[error("No member '{browse_name}' ({namespace_uri}) under node '{parent}'")]
    NotFound {
        /// Parent node id.
        parent: String,
        /// Namespace URI of the browse name.
        namespace_uri: String,
        /// Browse name.
        browse_name: String,
    },

    /// The member is not declared by the node's type.
    #[error("Type '{type_name}' declares no member '{browse_name}'")]
    UnknownMember {
        /// Type definition name.
        type_name: String,
        /// Browse name that was requested.
        browse_name: String,
    },

    /// The resolved node is not an instance of the expected type.
    #[error("Node '{node_id}' has type '{actual}', expected '{expected}'")]
    TypeDefinitionMismatch {
        /// Resolved node id.
        node_id: String,
        /// Expected type definition.
        expected: String,
        /// Actual type definition.
        actual: String,
    },
}

impl ResolutionError {
    /// Creates a not found outcome.
    pub fn not_found(
        parent: impl Into<String>,
        namespace_uri: impl Into<String>,
        browse_name: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            parent: parent.into(),
            namespace_uri: namespace_uri.into(),
            browse_name: browse_name.into(),
        }
    }

    /// Creates an unknown member error.
    pub fn unknown_member(type_name: impl Into<String>, browse_name: impl Into<String>) -> Self {
        Self::UnknownMember {
            type_name: type_name.into(),
            browse_name: browse_name.into(),
        }
    }

    /// Creates a type definition mismatch error.
    pub fn type_definition_mismatch(
        node_id: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeDefinitionMismatch {
            node_id: node_id.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Returns `true` if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Returns the severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } => ErrorSeverity::Info,
            Self::UnknownMember { .. } | Self::TypeDefinitionMismatch { .. } => ErrorSeverity::Error,
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::new(1, 1),
            Self::UnknownMember { .. } => ErrorCode::new(1, 2),
            Self::TypeDefinitionMismatch { .. } => ErrorCode::new(1, 3),
        }
    }

    /// Returns the matching OPC UA status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::BAD_NOT_FOUND,
            Self::UnknownMember { .. } => StatusCode::BAD_INVALID_ARGUMENT,
            Self::TypeDefinitionMismatch { .. } => StatusCode::BAD_TYPE_MISMATCH,
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::NotFound { .. } => vec![
                "The member is optional on this server instance",
                "Use the node accessor to probe for optional members",
            ],
            Self::UnknownMember { .. } => vec![
                "Check the browse name against the type's member table",
                "Register the type definition that declares this member",
            ],
            Self::TypeDefinitionMismatch { .. } => vec![
                "The server model differs from the local type table",
                "Check the server's information model version",
            ],
        }
    }
}

// =============================================================================
// ServiceError
// =============================================================================

/// Failures reported by the remote address-space services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Attribute read failed.
    #[error("Read of {attribute:?} failed for node '{node_id}': {message}")]
    ReadFailed {
        /// Node id.
        node_id: String,
        /// Attribute.
        attribute: AttributeId,
        /// Error message.
        message: String,
        /// Status code, if the server returned one.
        status: Option<StatusCode>,
    },

    /// Attribute write failed.
    #[error("Write of {attribute:?} failed for node '{node_id}': {message}")]
    WriteFailed {
        /// Node id.
        node_id: String,
        /// Attribute.
        attribute: AttributeId,
        /// Error message.
        message: String,
        /// Status code, if the server returned one.
        status: Option<StatusCode>,
    },

    /// The call completed but the result status is bad.
    #[error("{operation} on node '{node_id}' returned {status}")]
    BadStatus {
        /// Node id.
        node_id: String,
        /// Operation name.
        operation: &'static str,
        /// Returned status.
        status: StatusCode,
    },

    /// The client's request timed out.
    #[error("{operation} timed out after {duration:?}")]
    Timeout {
        /// Operation name.
        operation: String,
        /// Timeout duration.
        duration: Duration,
    },

    /// The client has no session.
    #[error("Not connected to OPC UA server")]
    NotConnected,
}

impl ServiceError {
    /// Creates a read failed error.
    pub fn read_failed(
        node_id: impl Into<String>,
        attribute: AttributeId,
        message: impl Into<String>,
    ) -> Self {
        Self::ReadFailed {
            node_id: node_id.into(),
            attribute,
            message: message.into(),
            status: None,
        }
    }

    /// Creates a read failed error with status code.
    pub fn read_failed_with_status(
        node_id: impl Into<String>,
        attribute: AttributeId,
        status: StatusCode,
    ) -> Self {
        Self::ReadFailed {
            node_id: node_id.into(),
            attribute,
            message: status.to_string(),
            status: Some(status),
        }
    }

    /// Creates a write failed error.
    pub fn write_failed(
        node_id: impl Into<String>,
        attribute: AttributeId,
        message: impl Into<String>,
    ) -> Self {
        Self::WriteFailed {
            node_id: node_id.into(),
            attribute,
            message: message.into(),
            status: None,
        }
    }

    /// Creates a write failed error with status code.
    pub fn write_failed_with_status(
        node_id: impl Into<String>,
        attribute: AttributeId,
        status: StatusCode,
    ) -> Self {
        Self::WriteFailed {
            node_id: node_id.into(),
            attribute,
            message: status.to_string(),
            status: Some(status),
        }
    }

    /// Creates a bad status error.
    pub fn bad_status(
        node_id: impl Into<String>,
        operation: &'static str,
        status: StatusCode,
    ) -> Self {
        Self::BadStatus {
            node_id: node_id.into(),
            operation,
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Returns the status code carried by this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::ReadFailed { status, .. }
            | Self::WriteFailed { status, .. } => *status,
            Self::BadStatus { status, .. } => Some(*status),
            Self::Timeout { .. } => Some(StatusCode::BAD_TIMEOUT),
            Self::NotConnected => Some(StatusCode::BAD_SERVER_NOT_CONNECTED),
        }
    }

    /// Returns `true` if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::NotConnected => true,
            other => matches!(
                other.status(),
                Some(
                    StatusCode::BAD_TIMEOUT
                        | StatusCode::BAD_COMMUNICATION_ERROR
                        | StatusCode::BAD_SERVER_NOT_CONNECTED
                )
            ),
        }
    }

    /// Returns the severity.
    pub fn severity(&self) -> ErrorSeverity {
        if self.is_retryable() {
            ErrorSeverity::Warning
        } else {
            ErrorSeverity::Error
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::ReadFailed { .. } => ErrorCode::new(2, 1),
            Self::WriteFailed { .. } => ErrorCode::new(2, 2),
            Self::BadStatus { .. } => ErrorCode::new(2, 3),
            Self::Timeout { .. } => ErrorCode::new(2, 4),
            Self::NotConnected => ErrorCode::new(2, 5),
        }
    }

    /// Returns the matching OPC UA status code.
    pub fn status_code(&self) -> StatusCode {
        self.status().unwrap_or(StatusCode::BAD_COMMUNICATION_ERROR)
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self.status() {
            Some(StatusCode::BAD_NOT_WRITABLE) => vec![
                "The node's access level does not allow writes",
                "Check AccessLevel and UserAccessLevel",
            ],
            Some(StatusCode::BAD_NOT_READABLE) => vec![
                "The node's access level does not allow reads",
                "Check AccessLevel and UserAccessLevel",
            ],
            Some(StatusCode::BAD_USER_ACCESS_DENIED) => vec![
                "Check user permissions for this node",
                "Contact server administrator",
            ],
            Some(StatusCode::BAD_TYPE_MISMATCH) => vec![
                "The written value's type differs from the node's DataType",
            ],
            _ => vec![
                "Check server connection",
                "Retry the operation",
            ],
        }
    }
}

// =============================================================================
// ConversionError
// =============================================================================

/// Value coercion failures.
///
/// These signal a disagreement between the local type table and the server,
/// and are never downgraded to a null value.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Scalar type mismatch.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected type.
        expected: String,
        /// Actual type.
        actual: String,
    },

    /// Array/scalar mismatch.
    #[error("Value rank mismatch: expected rank {expected_rank}, got {actual}")]
    ValueRankMismatch {
        /// Expected value rank.
        expected_rank: i32,
        /// Description of the actual value.
        actual: String,
    },

    /// Array element that decoded to no value.
    #[error("Element {index} of array has no {element_type} value")]
    NullElement {
        /// Element index.
        index: usize,
        /// Element type.
        element_type: String,
    },

    /// An array element failed to convert.
    #[error("Array element {index} failed to convert: {source}")]
    ArrayElement {
        /// Element index.
        index: usize,
        /// Element error.
        #[source]
        source: Box<ConversionError>,
    },

    /// Enumeration code with no matching variant.
    #[error("Unknown value {value} for enumeration {enum_type}")]
    UnknownEnumValue {
        /// Enumeration type name.
        enum_type: String,
        /// Wire value.
        value: i32,
    },

    /// Structured payload of the wrong type.
    #[error("Structure type mismatch: expected {expected}, got encoding {actual}")]
    StructureTypeMismatch {
        /// Expected structure type.
        expected: String,
        /// Encoding id of the payload.
        actual: String,
    },

    /// No codec registered for a structured type.
    #[error("No codec registered for data type {type_id}")]
    CodecNotFound {
        /// Data type or encoding id.
        type_id: String,
    },

    /// Encoding a structure failed.
    #[error("Encoding {type_name} failed: {message}")]
    EncodingFailed {
        /// Type name.
        type_name: String,
        /// Error message.
        message: String,
    },

    /// Decoding a structure failed.
    #[error("Decoding {type_name} failed: {message}")]
    DecodingFailed {
        /// Type name.
        type_name: String,
        /// Error message.
        message: String,
    },

    /// The declared member does not agree with the Rust type bound to it.
    #[error("Member '{browse_name}' declares {declared}, accessor uses {actual}")]
    DescriptorMismatch {
        /// Member browse name.
        browse_name: String,
        /// What the descriptor declares.
        declared: String,
        /// What the accessor type provides.
        actual: String,
    },
}

impl ConversionError {
    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a value rank mismatch error.
    pub fn value_rank_mismatch(expected_rank: i32, actual: impl Into<String>) -> Self {
        Self::ValueRankMismatch {
            expected_rank,
            actual: actual.into(),
        }
    }

    /// Creates a null element error.
    pub fn null_element(index: usize, element_type: impl Into<String>) -> Self {
        Self::NullElement {
            index,
            element_type: element_type.into(),
        }
    }

    /// Wraps an element error with its index.
    pub fn array_element(index: usize, source: ConversionError) -> Self {
        Self::ArrayElement {
            index,
            source: Box::new(source),
        }
    }

    /// Creates an unknown enumeration value error.
    pub fn unknown_enum_value(enum_type: impl Into<String>, value: i32) -> Self {
        Self::UnknownEnumValue {
            enum_type: enum_type.into(),
            value,
        }
    }

    /// Creates a structure type mismatch error.
    pub fn structure_type_mismatch(
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::StructureTypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a codec not found error.
    pub fn codec_not_found(type_id: impl Into<String>) -> Self {
        Self::CodecNotFound {
            type_id: type_id.into(),
        }
    }

    /// Creates an encoding failed error.
    pub fn encoding_failed(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Creates a decoding failed error.
    pub fn decoding_failed(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Creates a descriptor mismatch error.
    pub fn descriptor_mismatch(
        browse_name: impl Into<String>,
        declared: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::DescriptorMismatch {
            browse_name: browse_name.into(),
            declared: declared.into(),
            actual: actual.into(),
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::TypeMismatch { .. } => ErrorCode::new(3, 1),
            Self::ValueRankMismatch { .. } => ErrorCode::new(3, 2),
            Self::NullElement { .. } => ErrorCode::new(3, 3),
            Self::ArrayElement { .. } => ErrorCode::new(3, 4),
            Self::UnknownEnumValue { .. } => ErrorCode::new(3, 5),
            Self::StructureTypeMismatch { .. } => ErrorCode::new(3, 6),
            Self::CodecNotFound { .. } => ErrorCode::new(3, 7),
            Self::EncodingFailed { .. } => ErrorCode::new(3, 8),
            Self::DecodingFailed { .. } => ErrorCode::new(3, 9),
            Self::DescriptorMismatch { .. } => ErrorCode::new(3, 10),
        }
    }

    /// Returns the matching OPC UA status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::CodecNotFound { .. } => StatusCode::BAD_DATA_TYPE_ID_UNKNOWN,
            Self::EncodingFailed { .. } => StatusCode::BAD_ENCODING_ERROR,
            Self::DecodingFailed { .. } => StatusCode::BAD_DECODING_ERROR,
            Self::UnknownEnumValue { .. } => StatusCode::BAD_OUT_OF_RANGE,
            Self::ArrayElement { source, .. } => source.status_code(),
            _ => StatusCode::BAD_TYPE_MISMATCH,
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::CodecNotFound { .. } => vec![
                "Register the structure with the serialization context",
            ],
            Self::UnknownEnumValue { .. } => vec![
                "The server may use a newer enumeration",
                "Switch to the permissive enum policy to read it as absent",
            ],
            _ => vec![
                "The server's data type differs from the local type table",
                "Check the information model version",
            ],
        }
    }
}

// =============================================================================
// CancellationError
// =============================================================================

/// A blocking wait did not run to completion.
#[derive(Debug, Error)]
pub enum CancellationError {
    /// The waiting caller was interrupted.
    #[error("{operation} was interrupted")]
    Interrupted {
        /// Operation name.
        operation: String,
    },

    /// The task driving the operation was cancelled.
    #[error("{operation} was cancelled before completing")]
    TaskCancelled {
        /// Operation name.
        operation: String,
    },
}

impl CancellationError {
    /// Creates an interrupted error.
    pub fn interrupted(operation: impl Into<String>) -> Self {
        Self::Interrupted {
            operation: operation.into(),
        }
    }

    /// Creates a task cancelled error.
    pub fn task_cancelled(operation: impl Into<String>) -> Self {
        Self::TaskCancelled {
            operation: operation.into(),
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Interrupted { .. } => ErrorCode::new(4, 1),
            Self::TaskCancelled { .. } => ErrorCode::new(4, 2),
        }
    }
}

// =============================================================================
// ExecutionError
// =============================================================================

/// Failures with no more specific cause.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Generic unexpected failure.
    #[error("Unexpected error: {message}")]
    Unexpected {
        /// Error message.
        message: String,
        /// Status code.
        status: StatusCode,
    },

    /// The task driving the operation panicked.
    #[error("{operation} panicked: {message}")]
    Panicked {
        /// Operation name.
        operation: String,
        /// Panic message.
        message: String,
    },

    /// A blocking call cannot be served on the current thread.
    #[error("Blocking call unavailable: {reason}")]
    RuntimeUnavailable {
        /// Reason.
        reason: String,
    },
}

impl ExecutionError {
    /// Creates an unexpected error with `BadUnexpectedError`.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
            status: StatusCode::BAD_UNEXPECTED_ERROR,
        }
    }

    /// Creates a panicked error.
    pub fn panicked(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Panicked {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a runtime unavailable error.
    pub fn runtime_unavailable(reason: impl Into<String>) -> Self {
        Self::RuntimeUnavailable {
            reason: reason.into(),
        }
    }

    /// Returns the severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Unexpected { .. } => ErrorSeverity::Error,
            Self::Panicked { .. } | Self::RuntimeUnavailable { .. } => ErrorSeverity::Critical,
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Unexpected { .. } => ErrorCode::new(5, 1),
            Self::Panicked { .. } => ErrorCode::new(5, 2),
            Self::RuntimeUnavailable { .. } => ErrorCode::new(5, 3),
        }
    }

    /// Returns the matching OPC UA status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unexpected { status, .. } => *status,
            Self::Panicked { .. } => StatusCode::BAD_UNEXPECTED_ERROR,
            Self::RuntimeUnavailable { .. } => StatusCode::BAD_INTERNAL_ERROR,
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::RuntimeUnavailable { .. } => vec![
                "Use the async accessors inside a current-thread runtime",
                "Run blocking accessors on a multi-thread runtime or a plain thread",
            ],
            _ => vec!["Check the client logs for the underlying failure"],
        }
    }
}

// =============================================================================
// ConfigurationError
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Invalid field value.
    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Supplied value.
        value: String,
        /// Reason.
        reason: String,
    },

    /// Invalid environment override.
    #[error("Invalid value '{value}' in environment variable {variable}: {reason}")]
    InvalidEnvironment {
        /// Variable name.
        variable: String,
        /// Supplied value.
        value: String,
        /// Reason.
        reason: String,
    },

    /// Configuration text could not be parsed.
    #[error("Failed to parse configuration{}: {message}", .path.as_ref().map(|p| format!(" '{}'", p)).unwrap_or_default())]
    ParseFailed {
        /// Source file, if any.
        path: Option<String>,
        /// Parser message.
        message: String,
    },

    /// Configuration file could not be read.
    #[error("Failed to read configuration '{path}'")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// No tokio runtime is available to drive the proxy.
    #[error("No tokio runtime available: {reason}")]
    NoRuntime {
        /// Reason.
        reason: String,
    },

    /// Logging could not be initialised.
    #[error("Failed to initialise logging: {message}")]
    Logging {
        /// Error message.
        message: String,
    },
}

impl ConfigurationError {
    /// Creates an invalid value error.
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid environment override error.
    pub fn invalid_environment(
        variable: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidEnvironment {
            variable: variable.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates a parse failed error.
    pub fn parse_failed(path: Option<String>, message: impl Into<String>) -> Self {
        Self::ParseFailed {
            path,
            message: message.into(),
        }
    }

    /// Creates an I/O error.
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a no runtime error.
    pub fn no_runtime(reason: impl Into<String>) -> Self {
        Self::NoRuntime {
            reason: reason.into(),
        }
    }

    /// Creates a logging initialisation error.
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidValue { .. } => ErrorCode::new(6, 1),
            Self::InvalidEnvironment { .. } => ErrorCode::new(6, 2),
            Self::ParseFailed { .. } => ErrorCode::new(6, 3),
            Self::Io { .. } => ErrorCode::new(6, 4),
            Self::NoRuntime { .. } => ErrorCode::new(6, 5),
            Self::Logging { .. } => ErrorCode::new(6, 6),
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::InvalidEnvironment { .. } => vec![
                "enum_policy: permissive | strict",
                "log_format: text | json | compact",
            ],
            Self::NoRuntime { .. } => vec![
                "Build the proxy context inside a tokio runtime",
                "Or pass a runtime handle to the builder",
            ],
            _ => vec!["Check the configuration file"],
        }
    }
}

// =============================================================================
// ErrorSeverity
// =============================================================================

/// Error severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational - no action required.
    Info,
    /// Warning - action may be required.
    Warning,
    /// Error - action required, but recoverable.
    Error,
    /// Critical - immediate action required.
    Critical,
}

impl ErrorSeverity {
    /// Converts to tracing level.
    pub fn to_tracing_level(self) -> Level {
        match self {
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error | Self::Critical => Level::ERROR,
        }
    }

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// ErrorCode
// =============================================================================

/// Structured error code.
///
/// Format: `UA-XXYY` where XX is the category and YY the specific error.
///
/// Categories:
/// - 1: Resolution
/// - 2: Service
/// - 3: Conversion
/// - 4: Cancellation
/// - 5: Execution
/// - 6: Configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    /// Category (1-6).
    pub category: u8,
    /// Specific error within category.
    pub code: u8,
}

impl ErrorCode {
    /// Creates a new error code.
    pub const fn new(category: u8, code: u8) -> Self {
        Self { category, code }
    }

    /// Returns the full error code as a u16.
    pub fn as_u16(&self) -> u16 {
        ((self.category as u16) << 8) | (self.code as u16)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UA-{:02X}{:02X}", self.category, self.code)
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// A Result type with ProxyError.
pub type ProxyResult<T> = Result<T, ProxyError>;

// =============================================================================
// Error Context Extension
// =============================================================================

/// Extension trait for attaching call context to proxy errors.
pub trait ProxyErrorContext<T> {
    /// Logs the error with the node it concerns.
    fn with_node(self, node_id: &str) -> ProxyResult<T>;

    /// Logs the error with the operation that produced it.
    fn with_operation(self, operation: &str) -> ProxyResult<T>;
}

impl<T> ProxyErrorContext<T> for ProxyResult<T> {
    fn with_node(self, node_id: &str) -> ProxyResult<T> {
        self.map_err(|e| {
            tracing::debug!(node_id = node_id, error = %e, "Proxy error with node context");
            e
        })
    }

    fn with_operation(self, operation: &str) -> ProxyResult<T> {
        self.map_err(|e| {
            tracing::debug!(operation = operation, error = %e, "Proxy error with operation context");
            e
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_non_fatal() {
        let error = ProxyError::not_found("ns=2;i=10", "http://opcfoundation.org/UA/", "ProfileUri");
        assert!(error.is_not_found());
        assert!(!error.is_retryable());
        assert_eq!(error.severity(), ErrorSeverity::Info);
        assert!(error.to_string().contains("ProfileUri"));
    }

    #[test]
    fn test_service_error_retryable() {
        assert!(ServiceError::timeout("read", Duration::from_secs(5)).is_retryable());
        assert!(ServiceError::NotConnected.is_retryable());
        assert!(ServiceError::bad_status("ns=2;i=1", "write", StatusCode::BAD_COMMUNICATION_ERROR)
            .is_retryable());
        assert!(!ServiceError::bad_status("ns=2;i=1", "write", StatusCode::BAD_NOT_WRITABLE)
            .is_retryable());
    }

    #[test]
    fn test_service_error_status() {
        let error = ServiceError::write_failed_with_status(
            "ns=2;i=1",
            AttributeId::Value,
            StatusCode::BAD_USER_ACCESS_DENIED,
        );
        assert_eq!(error.status(), Some(StatusCode::BAD_USER_ACCESS_DENIED));
        assert!(error.recovery_hints().iter().any(|h| h.contains("permissions")));
        assert_eq!(
            ServiceError::read_failed("ns=2;i=1", AttributeId::Value, "boom").status_code(),
            StatusCode::BAD_COMMUNICATION_ERROR
        );
    }

    #[test]
    fn test_conversion_error_status() {
        assert_eq!(
            ConversionError::unknown_enum_value("ApplicationType", 99).status_code(),
            StatusCode::BAD_OUT_OF_RANGE
        );
        let nested = ConversionError::array_element(
            3,
            ConversionError::codec_not_found("ns=0;i=338"),
        );
        assert_eq!(nested.status_code(), StatusCode::BAD_DATA_TYPE_ID_UNKNOWN);
        assert!(nested.to_string().contains("element 3"));
    }

    #[test]
    fn test_unexpected_fallback_status() {
        let error = ProxyError::unexpected("no cause");
        assert_eq!(error.status_code(), StatusCode::BAD_UNEXPECTED_ERROR);
        assert_eq!(error.category(), "execution");
    }

    #[test]
    fn test_cancellation() {
        let error = ProxyError::interrupted("read ResourceUri");
        assert!(error.is_cancelled());
        assert!(!error.is_retryable());
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST_CANCELLED_BY_CLIENT);
    }

    #[test]
    fn test_error_code() {
        let code = ErrorCode::new(3, 10);
        assert_eq!(code.to_string(), "UA-030A");
        assert_eq!(code.as_u16(), 0x030A);
        assert_eq!(ProxyError::not_connected().error_code(), ErrorCode::new(2, 5));
    }

    #[test]
    fn test_error_severity() {
        assert_eq!(ProxyError::not_connected().severity(), ErrorSeverity::Warning);
        assert_eq!(ProxyError::type_mismatch("String", "Int32").severity(), ErrorSeverity::Error);
        assert_eq!(
            ProxyError::from(ConfigurationError::no_runtime("none")).severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(ErrorSeverity::Critical.to_tracing_level(), Level::ERROR);
    }

    #[test]
    fn test_parse_failed_display() {
        let with_path = ConfigurationError::parse_failed(Some("proxy.toml".into()), "bad key");
        assert_eq!(with_path.to_string(), "Failed to parse configuration 'proxy.toml': bad key");
        let without = ConfigurationError::parse_failed(None, "bad key");
        assert_eq!(without.to_string(), "Failed to parse configuration: bad key");
    }
}
