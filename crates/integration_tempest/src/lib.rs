//! WeatherFlow Tempest integration
//!
//! REST and WebSocket clients for the WeatherFlow Tempest API
//! (<https://weatherflow.github.io/Tempest/api/>). Requires a personal
//! access token, read from the `TEMPEST_TOKEN` environment variable by
//! default.
//!
//! # Architecture
//!
//! [`TempestClient`] serves station metadata and recorded observations
//! over HTTPS and implements the application's `StationPort`.
//! [`TempestStream`] opens the live data socket, subscribes to one
//! device per connection and implements `StreamPort`. Both share
//! [`TempestConfig`] for endpoints and timeouts and [`AccessToken`]
//! for the credential.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_tempest::{AccessToken, TempestClient, TempestConfig};
//!
//! let config = TempestConfig::default();
//! let client = TempestClient::new(config, AccessToken::from_env()?)?;
//!
//! let stations = client.stations().await?;
//! ```

mod client;
mod config;
mod error;
mod models;
mod stream;
mod token;

pub use client::TempestClient;
pub use config::TempestConfig;
pub use error::TempestError;
pub use stream::TempestStream;
pub use token::{AccessToken, TOKEN_ENV_VAR};
