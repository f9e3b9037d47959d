//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! the weather backend. Adapters in the integration layer implement them.

mod observation_sink;
mod station_port;
mod stream_port;

#[cfg(test)]
pub use observation_sink::MockObservationSink;
pub use observation_sink::{LoggingSink, ObservationSink};
#[cfg(test)]
pub use station_port::MockStationPort;
pub use station_port::{DeviceSnapshot, StationPort};
#[cfg(test)]
pub use stream_port::{MockDeviceSubscription, MockStreamPort};
pub use stream_port::{DeviceSubscription, StreamEvent, StreamPort};
