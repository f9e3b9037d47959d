//! Station port - Interface for station and device metadata
//!
//! This port abstracts the read-only metadata side of the weather backend:
//! the station inventory and the most recent observations recorded for a
//! single device.

use async_trait::async_trait;
use domain::{DeviceId, Station};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApplicationError;

/// The latest recorded observations for one device
///
/// Rows are raw positional arrays exactly as the backend reported them;
/// decoding is the caller's job so undecodable history never blocks
/// metadata retrieval.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// Payload tag declaring the layout of the observation rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    /// Raw observation rows, most recent first
    pub observations: Vec<Vec<Value>>,
}

impl DeviceSnapshot {
    /// Create a snapshot from a payload tag and raw rows
    #[must_use]
    pub fn new(device_type: Option<String>, observations: Vec<Vec<Value>>) -> Self {
        Self {
            device_type,
            observations,
        }
    }

    /// The most recent raw observation row, if any was recorded
    #[must_use]
    pub fn latest(&self) -> Option<&[Value]> {
        self.observations.first().map(Vec::as_slice)
    }

    /// Whether the device has no recorded observations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Port for fetching station and device metadata
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StationPort: Send + Sync {
    /// Fetch every station visible to the configured access token
    async fn stations(&self) -> Result<Vec<Station>, ApplicationError>;

    /// Fetch the latest recorded observations for one device
    async fn device_observations(
        &self,
        device_id: DeviceId,
    ) -> Result<DeviceSnapshot, ApplicationError>;
}
