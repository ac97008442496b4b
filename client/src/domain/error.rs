//! Domain-level error types.
//!
//! These errors are transport agnostic in shape: adapters report failures
//! through their port error types and the service maps them here, so callers
//! only ever match on [`ErrorCode`].

use std::fmt;

use thiserror::Error;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Connection, DNS, or timeout failure before a response arrived.
    Transport,
    /// The server answered with a non-success status.
    Protocol,
    /// The response body was not valid JSON or lacked expected fields.
    Decode,
    /// The caller's input cannot be acted upon.
    Precondition,
}

impl ErrorCode {
    /// Snake-case name of the code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Protocol => "protocol",
            Self::Decode => "decode",
            Self::Precondition => "precondition",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every vehicle operation.
///
/// # Examples
/// ```
/// use vehicle_client::domain::{Error, ErrorCode};
///
/// let err = Error::protocol(404, "vehicle 12 not found");
/// assert_eq!(err.code(), ErrorCode::Protocol);
/// assert_eq!(err.status(), Some(404));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code} error: {message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
    status: Option<u16>,
}

impl Error {
    /// Create an error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP status for [`ErrorCode::Protocol`] errors.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Convenience constructor for [`ErrorCode::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Transport, message)
    }

    /// Convenience constructor for [`ErrorCode::Protocol`].
    pub fn protocol(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(ErrorCode::Protocol, message)
        }
    }

    /// Convenience constructor for [`ErrorCode::Decode`].
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Decode, message)
    }

    /// Convenience constructor for [`ErrorCode::Precondition`].
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Precondition, message)
    }
}
