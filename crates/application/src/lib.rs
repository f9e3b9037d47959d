//! Application layer - Use cases and orchestration
//!
//! Contains the device discovery and listening flows along with the port
//! definitions the integration adapters implement. Orchestrates domain
//! objects without knowing how the weather backend is reached.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
