//! Domain-level errors

use thiserror::Error;

/// Errors that can occur while decoding a positional observation array
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The declared device type does not match any known payload layout
    #[error("Unsupported device type: {0}")]
    UnsupportedDeviceType(String),

    /// The array ended before the required field position
    #[error("Field index {index} out of range for observation array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The value at a field position has the wrong JSON type
    #[error("Type mismatch at index {index}: {field} is not a valid {expected}")]
    TypeMismatch {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },
}

impl DecodeError {
    /// Create an unsupported device type error
    pub fn unsupported_device_type(tag: impl Into<String>) -> Self {
        Self::UnsupportedDeviceType(tag.into())
    }

    /// Create an index out of range error
    #[must_use]
    pub const fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a type mismatch error
    #[must_use]
    pub const fn type_mismatch(index: usize, field: &'static str, expected: &'static str) -> Self {
        Self::TypeMismatch {
            index,
            field,
            expected,
        }
    }
}
