//! Observation sink - Destination for decoded observations
//!
//! Every decoded observation, live or historical, is handed to a sink.
//! The default sink logs; alternative sinks can forward records elsewhere
//! without touching the listening machinery.

use async_trait::async_trait;
use domain::{DeviceId, Observation};
#[cfg(test)]
use mockall::automock;
use tracing::info;

use crate::error::ApplicationError;

/// Port for consuming decoded observations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObservationSink: Send + Sync {
    /// Hand over one decoded observation
    async fn deliver(
        &self,
        device_id: DeviceId,
        observation: Observation,
    ) -> Result<(), ApplicationError>;
}

/// Sink that writes each observation to the log as single-line JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSink;

impl LoggingSink {
    /// Create a new logging sink
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ObservationSink for LoggingSink {
    async fn deliver(
        &self,
        device_id: DeviceId,
        observation: Observation,
    ) -> Result<(), ApplicationError> {
        let observed_at = observation
            .observed_at()
            .map_or_else(|| observation.timestamp.to_string(), |at| at.to_rfc3339());
        let data = serde_json::to_string(&observation)
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;
        info!(device_id = %device_id, observed_at = %observed_at, data = %data, "Observation received");
        Ok(())
    }
}
