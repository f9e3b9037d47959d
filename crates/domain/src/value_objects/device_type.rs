//! Device type tag reported in station metadata
//!
//! WeatherFlow identifies hardware with short tags: `ST` for the Tempest
//! sensor unit, `HB` for the hub, `AR`/`SK` for the older Air and Sky
//! sensors. Only the Tempest sensor produces streamable observations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hardware type of a station device
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    /// Tempest all-in-one weather sensor (`ST`)
    Tempest,
    /// Station hub, the network relay with no sensors (`HB`)
    Hub,
    /// Legacy Air sensor (`AR`)
    Air,
    /// Legacy Sky sensor (`SK`)
    Sky,
    /// A tag this client does not recognize
    Other(String),
}

impl DeviceType {
    /// Parse a device type from its metadata tag
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ST" => Self::Tempest,
            "HB" => Self::Hub,
            "AR" => Self::Air,
            "SK" => Self::Sky,
            other => Self::Other(other.to_string()),
        }
    }

    /// Get the wire tag for this device type
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Tempest => "ST",
            Self::Hub => "HB",
            Self::Air => "AR",
            Self::Sky => "SK",
            Self::Other(tag) => tag,
        }
    }

    /// Whether a live observation stream can be opened for this device
    ///
    /// Hubs relay traffic but carry no sensors, and the legacy sensors use
    /// payload layouts this client does not decode.
    #[must_use]
    pub const fn is_listenable(&self) -> bool {
        matches!(self, Self::Tempest)
    }

    /// Get a human-readable label
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Tempest => "Tempest sensor",
            Self::Hub => "hub",
            Self::Air => "Air sensor",
            Self::Sky => "Sky sensor",
            Self::Other(_) => "unknown device",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl From<String> for DeviceType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<DeviceType> for String {
    fn from(device_type: DeviceType) -> Self {
        device_type.tag().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_parse() {
        assert_eq!(DeviceType::from_tag("ST"), DeviceType::Tempest);
        assert_eq!(DeviceType::from_tag("HB"), DeviceType::Hub);
        assert_eq!(DeviceType::from_tag("AR"), DeviceType::Air);
        assert_eq!(DeviceType::from_tag("SK"), DeviceType::Sky);
    }

    #[test]
    fn unknown_tag_is_preserved() {
        let parsed = DeviceType::from_tag("XX");
        assert_eq!(parsed, DeviceType::Other("XX".to_string()));
        assert_eq!(parsed.tag(), "XX");
    }

    #[test]
    fn only_tempest_is_listenable() {
        assert!(DeviceType::Tempest.is_listenable());
        assert!(!DeviceType::Hub.is_listenable());
        assert!(!DeviceType::Air.is_listenable());
        assert!(!DeviceType::Sky.is_listenable());
        assert!(!DeviceType::Other("XX".to_string()).is_listenable());
    }

    #[test]
    fn tag_roundtrips() {
        for tag in ["ST", "HB", "AR", "SK", "ZZ"] {
            assert_eq!(DeviceType::from_tag(tag).tag(), tag);
        }
    }

    #[test]
    fn serializes_as_tag_string() {
        let json = serde_json::to_string(&DeviceType::Tempest).unwrap();
        assert_eq!(json, r#""ST""#);

        let parsed: DeviceType = serde_json::from_str(r#""HB""#).unwrap();
        assert_eq!(parsed, DeviceType::Hub);
    }

    #[test]
    fn display_matches_tag() {
        assert_eq!(DeviceType::Tempest.to_string(), "ST");
        assert_eq!(DeviceType::Other("XX".to_string()).to_string(), "XX");
    }
}
