//! Tempest error types

use application::ApplicationError;
use thiserror::Error;

/// Errors that can occur while talking to the Tempest backend
#[derive(Debug, Error)]
pub enum TempestError {
    /// No access token was configured
    #[error("Access token is not set: export {0} or pass --token")]
    MissingToken(String),

    /// Connection to the backend failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the backend failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// The backend rejected the access token
    #[error("Not authorized: check the access token")]
    NotAuthorized,

    /// Failed to parse a response from the backend
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The subscription request could not be delivered
    #[error("Handshake failed: {0}")]
    HandshakeFailed(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl TempestError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::Timeout { .. }
        )
    }
}

impl From<TempestError> for ApplicationError {
    fn from(err: TempestError) -> Self {
        match err {
            TempestError::MissingToken(_) | TempestError::NotAuthorized => {
                Self::NotAuthorized(err.to_string())
            },
            TempestError::ConnectionFailed(e) | TempestError::HandshakeFailed(e) => {
                Self::Connection(e)
            },
            TempestError::RequestFailed(e) | TempestError::ServiceUnavailable(e) => {
                Self::Network(e)
            },
            TempestError::Timeout { timeout_secs } => {
                Self::RequestTimeout(format!("after {timeout_secs} seconds"))
            },
            TempestError::ParseError(e) => Self::MalformedMessage(e),
            TempestError::ConfigurationError(e) => Self::Internal(e),
        }
    }
}
