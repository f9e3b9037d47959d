//! Tempest service configuration

use serde::{Deserialize, Serialize};

/// Configuration for the WeatherFlow Tempest backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempestConfig {
    /// Base URL for the REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// URL of the live data WebSocket
    #[serde(default = "default_socket_url")]
    pub socket_url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://swd.weatherflow.com/swd/rest".to_string()
}

fn default_socket_url() -> String {
    "wss://ws.weatherflow.com/swd/data".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for TempestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            socket_url: default_socket_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TempestConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.socket_url.is_empty() {
            return Err("socket_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TempestConfig::default();
        assert_eq!(config.base_url, "https://swd.weatherflow.com/swd/rest");
        assert_eq!(config.socket_url, "wss://ws.weatherflow.com/swd/data");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_testing_config() {
        let config = TempestConfig::for_testing();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.base_url, TempestConfig::default().base_url);
    }

    #[test]
    fn test_validation_success() {
        assert!(TempestConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_empty_base_url() {
        let config = TempestConfig {
            base_url: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_socket_url() {
        let config = TempestConfig {
            socket_url: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = TempestConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = TempestConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: TempestConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.base_url, config.base_url);
        assert_eq!(deserialized.socket_url, config.socket_url);
        assert_eq!(deserialized.timeout_secs, config.timeout_secs);
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: TempestConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.base_url, TempestConfig::default().base_url);
        assert_eq!(config.timeout_secs, 30);
    }
}
