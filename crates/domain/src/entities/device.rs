//! Device entity

use serde::{Deserialize, Serialize};

use crate::value_objects::{DeviceId, DeviceType};

/// A physical device registered under a station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Unique device identifier
    pub device_id: DeviceId,
    /// Hardware type tag
    pub device_type: DeviceType,
    /// Factory serial number, when the backend reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

impl Device {
    /// Create a new device
    #[must_use]
    pub const fn new(device_id: DeviceId, device_type: DeviceType) -> Self {
        Self {
            device_id,
            device_type,
            serial_number: None,
        }
    }

    /// Set the serial number
    #[must_use]
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Whether a live observation stream can be opened for this device
    #[must_use]
    pub const fn is_listenable(&self) -> bool {
        self.device_type.is_listenable()
    }
}
