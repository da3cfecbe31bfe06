//! Error types for the Colloquy client.

use thiserror::Error;

/// A shared error type for the conversation synchronization client.
///
/// Every failure the client can surface is one of these variants, so
/// retry decisions and user-facing error strings can be made from the
/// variant alone.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColloquyError {
    /// A required field was missing or blank. Raised before any network
    /// call is made and never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The server could not be reached at all. Retryable.
    #[error("Network error: {0}")]
    Network(String),

    /// The request deadline elapsed before the call settled. Retryable.
    #[error("Timeout after {timeout_ms}ms on {operation}")]
    Timeout { operation: String, timeout_ms: u64 },

    /// The server responded with a non-2xx status. Retryable only for
    /// 408, 429 and 5xx.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body could not be decoded. Terminal; must not be
    /// retried as a network failure.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A conversation identifier that is already bound was asked to
    /// change, or the server failed to assign one.
    #[error("Identity error: {0}")]
    Identity(String),
}

impl ColloquyError {
    /// Creates a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Timeout error for the given operation.
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates an Http error from a status code and message body.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a Parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates an Identity error.
    pub fn identity(message: impl Into<String>) -> Self {
        Self::Identity(message.into())
    }

    /// Check if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether another attempt at the failed call may succeed.
    ///
    /// Network failures and timeouts are always retryable. HTTP failures
    /// are retryable only for 408 (request timeout), 429 (rate limited)
    /// and server errors; any other 4xx is terminal. Validation, parse
    /// and identity errors are never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout { .. } => true,
            Self::Http { status, .. } => {
                matches!(status, 408 | 429) || (500..=599).contains(status)
            }
            _ => false,
        }
    }
}

impl From<serde_json::Error> for ColloquyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// A type alias for `Result<T, ColloquyError>`.
pub type Result<T> = std::result::Result<T, ColloquyError>;
