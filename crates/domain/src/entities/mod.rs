//! Domain entities - Objects with identity and lifecycle

mod device;
mod observation;
mod station;

pub use device::Device;
pub use observation::{Observation, PrecipitationAnalysis, PrecipitationType};
pub use station::Station;
