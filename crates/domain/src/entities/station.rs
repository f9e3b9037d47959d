//! Station entity

use serde::{Deserialize, Serialize};

use crate::entities::Device;
use crate::value_objects::{DeviceId, StationId};

/// A weather station owning a set of devices
///
/// Fetched once per run from the metadata endpoint and treated as
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Unique station identifier
    pub station_id: StationId,
    /// Owner-assigned station name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Devices registered under this station, in backend order
    pub devices: Vec<Device>,
}

impl Station {
    /// Create a new station with no devices
    #[must_use]
    pub const fn new(station_id: StationId) -> Self {
        Self {
            station_id,
            name: None,
            devices: Vec::new(),
        }
    }

    /// Set the station name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the device list
    #[must_use]
    pub fn with_devices(mut self, devices: Vec<Device>) -> Self {
        self.devices = devices;
        self
    }

    /// Number of registered devices
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Find a device by its identifier
    #[must_use]
    pub fn device(&self, device_id: DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.device_id == device_id)
    }

    /// Iterate over the devices that can be listened to, in backend order
    pub fn listenable_devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|d| d.is_listenable())
    }
}
