//! Error types for the call-manager client library
//!
//! Every public operation returns [`ClientResult`]. The variants form a closed
//! taxonomy shared with the platform call-manager API, so [`CallManagerError::code`]
//! can hand the platform error number to consumers that still speak integers.

use thiserror::Error;

use crate::transport::{TransportError, TransportErrorKind};

/// Result type for call-manager client operations
pub type ClientResult<T> = Result<T, CallManagerError>;

/// Substring the daemon puts in its error message when a privilege check fails.
pub const ACCESS_DENIED_MARKER: &str = "No access rights";

/// Errors that can occur in the call-manager client
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CallManagerError {
    /// A buffer or record could not be allocated
    #[error("Out of memory: {message}")]
    OutOfMemory { message: String },

    /// An argument was rejected locally, or the session handle is no longer valid
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// The daemon refused the caller's privileges
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// The feature is not available on this device
    #[error("Not supported: {feature}")]
    NotSupported { feature: String },

    /// No callback is registered for the signal
    #[error("Callback not registered for {signal}")]
    NotRegistered { signal: String },

    /// A callback is already registered for the signal
    #[error("Callback already registered for {signal}")]
    AlreadyRegistered { signal: String },

    /// The transport or the daemon failed the request
    #[error("Operation failed: {message}")]
    OperationFailed { message: String },
}

impl CallManagerError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create an operation failed error
    pub fn operation_failed(message: impl Into<String>) -> Self {
        Self::OperationFailed {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a not registered error
    pub fn not_registered(signal: impl Into<String>) -> Self {
        Self::NotRegistered {
            signal: signal.into(),
        }
    }

    /// Create an already registered error
    pub fn already_registered(signal: impl Into<String>) -> Self {
        Self::AlreadyRegistered {
            signal: signal.into(),
        }
    }

    /// Error returned for any use of a session after `deinit`
    pub(crate) fn session_closed() -> Self {
        Self::invalid_parameter("client session is not initialized")
    }

    /// Platform error number for this error
    ///
    /// Generic entries reuse the platform-wide values, the call-manager
    /// specific ones live in the module's own range.
    pub fn code(&self) -> i32 {
        match self {
            Self::OutOfMemory { .. } => -12,
            Self::InvalidParameter { .. } => -22,
            Self::PermissionDenied { .. } => -13,
            Self::NotSupported { .. } => -1_073_741_822,
            Self::NotRegistered { .. } => 0x01,
            Self::AlreadyRegistered { .. } => 0x02,
            Self::OperationFailed { .. } => 0x03,
        }
    }

    /// Check if the error came from a privilege check
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

impl From<TransportError> for CallManagerError {
    /// Structured access-denied errors win; otherwise the daemon's message is
    /// searched for [`ACCESS_DENIED_MARKER`].
    fn from(err: TransportError) -> Self {
        if err.kind == TransportErrorKind::AccessDenied || err.message.contains(ACCESS_DENIED_MARKER) {
            return Self::permission_denied(err.message);
        }
        match err.kind {
            TransportErrorKind::NoMemory => Self::OutOfMemory {
                message: err.message,
            },
            _ => Self::operation_failed(err.to_string()),
        }
    }
}
