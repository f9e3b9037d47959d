//! Domain layer for TempestWatch
//!
//! Contains the weather-station model: stations, devices, decoded
//! observations, and domain errors. This layer has no network or runtime
//! dependencies and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DecodeError;
pub use value_objects::*;
