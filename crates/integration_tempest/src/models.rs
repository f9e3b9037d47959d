//! Wire types for the WeatherFlow Tempest API
//!
//! Response envelopes for the REST endpoints, the subscription request
//! for the data socket and the message shape read back from it. Every
//! inbound type converts into its domain or port counterpart; nothing
//! here leaks out of the crate.

use application::{DeviceSnapshot, StreamEvent};
use domain::{Device, DeviceId, DeviceType, Station, StationId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Envelope of the stations listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct StationsResponse {
    /// Stations visible to the access token
    #[serde(default)]
    pub stations: Vec<StationRecord>,
}

/// One station entry in the listing
#[derive(Debug, Clone, Deserialize)]
pub struct StationRecord {
    /// Backend identifier of the station
    pub station_id: u64,
    /// Display name, when set by the owner
    #[serde(default)]
    pub name: Option<String>,
    /// Devices registered at the station
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
}

/// One device entry inside a station
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceRecord {
    /// Backend identifier of the device
    pub device_id: u64,
    /// Hardware type tag, for example `ST` or `HB`
    pub device_type: String,
    /// Serial number printed on the device
    #[serde(default)]
    pub serial_number: Option<String>,
}

impl From<DeviceRecord> for Device {
    fn from(record: DeviceRecord) -> Self {
        let device = Self::new(
            DeviceId::new(record.device_id),
            DeviceType::from_tag(&record.device_type),
        );
        match record.serial_number {
            Some(serial) => device.with_serial_number(serial),
            None => device,
        }
    }
}

impl From<StationRecord> for Station {
    fn from(record: StationRecord) -> Self {
        let station = Self::new(StationId::new(record.station_id))
            .with_devices(record.devices.into_iter().map(Device::from).collect());
        match record.name {
            Some(name) => station.with_name(name),
            None => station,
        }
    }
}

/// Envelope of the device observations endpoint
///
/// `obs` is null for devices that have never reported.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceObservationsResponse {
    /// Payload tag declaring the row layout
    #[serde(rename = "type", default)]
    pub observation_type: Option<String>,
    /// Raw positional observation rows
    #[serde(default)]
    pub obs: Option<Vec<Vec<Value>>>,
}

impl From<DeviceObservationsResponse> for DeviceSnapshot {
    fn from(response: DeviceObservationsResponse) -> Self {
        Self::new(
            response.observation_type,
            response.obs.unwrap_or_default(),
        )
    }
}

/// Subscription request sent right after the socket opens
#[derive(Debug, Clone, Serialize)]
pub struct ListenStartRequest {
    /// Message type, always `listen_start`
    #[serde(rename = "type")]
    pub message_type: String,
    /// Device to subscribe to
    pub device_id: u64,
    /// Client-chosen request identifier
    pub id: String,
}

impl ListenStartRequest {
    /// Build a subscription request with a fresh request identifier
    #[must_use]
    pub fn new(device_id: DeviceId) -> Self {
        Self {
            message_type: "listen_start".to_string(),
            device_id: device_id.value(),
            id: Uuid::new_v4().to_string(),
        }
    }
}

/// Any message read from the data socket
///
/// The backend mixes acknowledgements, connection bookkeeping and
/// observation payloads on one socket; all fields are optional so every
/// well-formed JSON object parses.
#[derive(Debug, Clone, Deserialize)]
pub struct SocketMessage {
    /// Message type tag
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
    /// Device the message refers to
    #[serde(default)]
    pub device_id: Option<u64>,
    /// Raw positional observation rows
    #[serde(default)]
    pub obs: Option<Vec<Vec<Value>>>,
}

impl From<SocketMessage> for StreamEvent {
    fn from(message: SocketMessage) -> Self {
        Self {
            event_type: message.message_type,
            device_id: message.device_id.map(DeviceId::new),
            observations: message.obs,
        }
    }
}
