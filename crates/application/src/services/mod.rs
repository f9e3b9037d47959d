//! Application services - Use case implementations

mod discovery_service;
mod listener_service;

pub use discovery_service::{DiscoveryService, listenable_devices};
pub use listener_service::{DeviceOutcome, ListenReport, ListenerService, SubscriptionState};
