//! Value Objects - Immutable, identity-less domain primitives

mod device_id;
mod device_type;
mod station_id;

pub use device_id::DeviceId;
pub use device_type::DeviceType;
pub use station_id::StationId;
