//! Device discovery service
//!
//! Walks the station inventory, reports what each listenable device last
//! sent, and produces the device set the listener should subscribe to.
//! Selection is driven purely by the device type tag in the metadata; a
//! device with no recorded observations is still selected.

use std::sync::Arc;

use domain::{DeviceId, Observation, Station};
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::StationPort;

/// Device identifiers eligible for a live subscription
///
/// Station order then device order is preserved; no de-duplication is
/// applied.
#[must_use]
pub fn listenable_devices(stations: &[Station]) -> Vec<DeviceId> {
    stations
        .iter()
        .flat_map(|station| station.listenable_devices().map(|d| d.device_id))
        .collect()
}

/// Service for fetching metadata and selecting listenable devices
pub struct DiscoveryService {
    stations: Arc<dyn StationPort>,
}

impl std::fmt::Debug for DiscoveryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryService")
            .field("stations", &"<StationPort>")
            .finish()
    }
}

impl DiscoveryService {
    /// Create a new discovery service
    #[must_use]
    pub fn new(stations: Arc<dyn StationPort>) -> Self {
        Self { stations }
    }

    /// Fetch every station visible to the configured access token
    ///
    /// A failure here is fatal for the whole run; there is nothing to
    /// listen to without the inventory.
    #[instrument(skip(self))]
    pub async fn stations(&self) -> Result<Vec<Station>, ApplicationError> {
        let stations = self.stations.stations().await?;
        info!(station_count = stations.len(), "Fetched station inventory");
        Ok(stations)
    }

    /// Fetch and decode the most recent observation for one device
    ///
    /// Returns `Ok(None)` when the device has no recorded observations.
    #[instrument(skip(self))]
    pub async fn latest_observation(
        &self,
        device_id: DeviceId,
    ) -> Result<Option<Observation>, ApplicationError> {
        let snapshot = self.stations.device_observations(device_id).await?;
        let Some(row) = snapshot.latest() else {
            return Ok(None);
        };
        let tag = snapshot.device_type.as_deref().unwrap_or_default();
        let observation = Observation::decode(row, tag)?;
        Ok(Some(observation))
    }

    /// Walk the inventory and select the devices to listen to
    ///
    /// Per-device snapshot problems are logged and skipped; they never
    /// remove a device from the selection or abort the walk.
    #[instrument(skip(self))]
    pub async fn discover(&self) -> Result<Vec<DeviceId>, ApplicationError> {
        let stations = self.stations().await?;

        for station in &stations {
            info!(
                station_id = %station.station_id,
                device_count = station.device_count(),
                "Pulling devices for station"
            );
            for device in &station.devices {
                if device.is_listenable() {
                    self.log_latest_snapshot(device.device_id).await;
                } else {
                    debug!(
                        device_id = %device.device_id,
                        device_type = %device.device_type,
                        "Skipping device without an observation stream"
                    );
                }
            }
        }

        let selected = listenable_devices(&stations);
        info!(device_count = selected.len(), "Selected listenable devices");
        Ok(selected)
    }

    /// Log when a device was last heard from and what it reported
    async fn log_latest_snapshot(&self, device_id: DeviceId) {
        match self.latest_observation(device_id).await {
            Ok(Some(observation)) => {
                let last_heard = observation
                    .observed_at()
                    .map_or_else(|| observation.timestamp.to_string(), |at| at.to_rfc3339());
                info!(device_id = %device_id, last_heard = %last_heard, "Device last heard from");
                if let Ok(data) = serde_json::to_string(&observation) {
                    info!(device_id = %device_id, data = %data, "Latest observation");
                }
            },
            Ok(None) => {
                debug!(device_id = %device_id, "No recorded observations for device");
            },
            Err(e) => {
                warn!(device_id = %device_id, error = %e, "Failed to fetch latest observation");
            },
        }
    }
}
