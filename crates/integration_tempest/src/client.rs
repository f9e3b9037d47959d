//! WeatherFlow Tempest REST client
//!
//! HTTP client for station metadata and recorded observations. The
//! access token travels as a query parameter on every request and is
//! kept out of logs.

use application::{ApplicationError, DeviceSnapshot, StationPort};
use async_trait::async_trait;
use domain::{DeviceId, Station};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::TempestConfig;
use crate::error::TempestError;
use crate::models::{DeviceObservationsResponse, StationsResponse};
use crate::token::AccessToken;

/// HTTP client for the Tempest REST API
#[derive(Debug)]
pub struct TempestClient {
    client: Client,
    config: TempestConfig,
    token: AccessToken,
}

impl TempestClient {
    /// Create a new client with the given configuration and token
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP
    /// client cannot be initialized.
    pub fn new(config: TempestConfig, token: AccessToken) -> Result<Self, TempestError> {
        config.validate().map_err(TempestError::ConfigurationError)?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TempestError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config,
            token,
        })
    }

    /// Create a client with the default configuration and the token
    /// from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no token is configured or the HTTP client
    /// cannot be initialized.
    pub fn from_env() -> Result<Self, TempestError> {
        Self::new(TempestConfig::default(), AccessToken::from_env()?)
    }

    fn stations_url(&self) -> String {
        format!("{}/stations", self.config.base_url)
    }

    fn device_observations_url(&self, device_id: DeviceId) -> String {
        format!("{}/observations/device/{device_id}", self.config.base_url)
    }

    /// Issue an authenticated GET request and parse the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, TempestError> {
        debug!(url = %url, "Requesting");

        let response = self
            .client
            .get(url)
            .query(&[("token", self.token.expose())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TempestError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else if e.is_connect() {
                    TempestError::ConnectionFailed(e.to_string())
                } else {
                    TempestError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TempestError::NotAuthorized);
        }
        if status.is_server_error() {
            return Err(TempestError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(TempestError::RequestFailed(format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| TempestError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl StationPort for TempestClient {
    #[instrument(skip(self))]
    async fn stations(&self) -> Result<Vec<Station>, ApplicationError> {
        let response: StationsResponse = self.get_json(&self.stations_url()).await?;
        let stations: Vec<Station> = response.stations.into_iter().map(Station::from).collect();
        debug!(station_count = stations.len(), "Retrieved stations");
        Ok(stations)
    }

    #[instrument(skip(self))]
    async fn device_observations(
        &self,
        device_id: DeviceId,
    ) -> Result<DeviceSnapshot, ApplicationError> {
        let response: DeviceObservationsResponse = self
            .get_json(&self.device_observations_url(device_id))
            .await?;
        let snapshot = DeviceSnapshot::from(response);
        debug!(
            device_id = %device_id,
            row_count = snapshot.observations.len(),
            "Retrieved device observations"
        );
        Ok(snapshot)
    }
}
