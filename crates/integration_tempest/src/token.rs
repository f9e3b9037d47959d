//! Access token handling
//!
//! The Tempest API authenticates every request with a personal access
//! token. The token is kept in a [`SecretString`] so it never shows up
//! in debug output or serialized configuration.

use secrecy::{ExposeSecret, SecretString};

use crate::error::TempestError;

/// Environment variable holding the personal access token
pub const TOKEN_ENV_VAR: &str = "TEMPEST_TOKEN";

/// Personal access token for the Tempest API
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Wrap an already resolved token value
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Read the token from the `TEMPEST_TOKEN` environment variable
    ///
    /// An unset or empty variable counts as missing.
    ///
    /// # Errors
    ///
    /// Returns [`TempestError::MissingToken`] when no usable value is set.
    pub fn from_env() -> Result<Self, TempestError> {
        std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .map(Self::new)
            .ok_or_else(|| TempestError::MissingToken(TOKEN_ENV_VAR.to_string()))
    }

    /// Get the token value for building a request
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}
