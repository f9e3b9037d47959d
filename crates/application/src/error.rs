//! Application-level errors

use domain::DecodeError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Observation decoding failed
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A metadata request exceeded its deadline
    #[error("Request timed out: {0}")]
    RequestTimeout(String),

    /// Network-level failure talking to the weather backend
    #[error("Network error: {0}")]
    Network(String),

    /// The streaming connection failed or dropped unexpectedly
    #[error("Connection error: {0}")]
    Connection(String),

    /// The access token is missing or was rejected
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// An inbound message could not be interpreted
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    ///
    /// Classification only; nothing in this crate retries on its own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RequestTimeout(_) | Self::Network(_))
    }
}
