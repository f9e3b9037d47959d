//! Stream port - Interface for live observation subscriptions
//!
//! This port abstracts the streaming side of the weather backend. Opening
//! a subscription covers the whole setup: establishing the connection and
//! sending the listen handshake for the device. The returned subscription
//! then yields inbound events one at a time until the remote end closes.

use async_trait::async_trait;
use domain::DeviceId;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApplicationError;

/// One inbound message from a live subscription
///
/// Messages without observation rows are informational (handshake
/// acknowledgements, keep-alives) and carry only their type tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamEvent {
    /// Message type tag; doubles as the payload tag for observation rows
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Device the message refers to, when the backend includes it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<DeviceId>,
    /// Raw positional observation rows, absent for informational messages
    #[serde(rename = "obs", skip_serializing_if = "Option::is_none")]
    pub observations: Option<Vec<Vec<Value>>>,
}

impl StreamEvent {
    /// Create an informational event with just a type tag
    #[must_use]
    pub fn informational(event_type: impl Into<String>) -> Self {
        Self {
            event_type: Some(event_type.into()),
            device_id: None,
            observations: None,
        }
    }

    /// Create an observation event
    #[must_use]
    pub fn observations(
        event_type: impl Into<String>,
        device_id: DeviceId,
        rows: Vec<Vec<Value>>,
    ) -> Self {
        Self {
            event_type: Some(event_type.into()),
            device_id: Some(device_id),
            observations: Some(rows),
        }
    }

    /// Whether the event carries observation rows to decode
    #[must_use]
    pub const fn has_observations(&self) -> bool {
        self.observations.is_some()
    }
}

/// A live subscription bound to one device
///
/// Owned by exactly one listen task; the `&mut` receiver reflects that.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DeviceSubscription: Send {
    /// Wait for the next inbound event
    ///
    /// Returns `Ok(None)` when the remote end closes the connection
    /// normally. Errors are terminal for this subscription.
    async fn next_event(&mut self) -> Result<Option<StreamEvent>, ApplicationError>;

    /// Close the connection from this side
    ///
    /// Used on cooperative shutdown; the subscription must not be polled
    /// afterwards.
    async fn close(&mut self) -> Result<(), ApplicationError>;
}

impl std::fmt::Debug for dyn DeviceSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DeviceSubscription")
    }
}

/// Port for opening live observation subscriptions
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StreamPort: Send + Sync {
    /// Open a subscription for one device
    ///
    /// Covers connection establishment and the listen handshake; a
    /// returned subscription is ready to receive.
    async fn open(
        &self,
        device_id: DeviceId,
    ) -> Result<Box<dyn DeviceSubscription>, ApplicationError>;
}
