//! Decoded weather observation
//!
//! Tempest devices report observations as positional JSON arrays whose
//! layout is declared by a payload tag. The only layout this client decodes
//! is `obs_st`, the 22-field Tempest sensor record. Decoding is purely
//! positional: slot N always yields the same named field.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::DecodeError;

/// Kind of precipitation detected during the reporting interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum PrecipitationType {
    /// No precipitation (code 0)
    None,
    /// Rain (code 1)
    Rain,
    /// Hail (code 2)
    Hail,
    /// Rain and hail mixed (code 3)
    RainAndHail,
    /// A code this client does not recognize, preserved as-is
    Other(i64),
}

impl PrecipitationType {
    /// Map a wire code to its precipitation kind
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Rain,
            2 => Self::Hail,
            3 => Self::RainAndHail,
            other => Self::Other(other),
        }
    }

    /// Get the wire code
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::Rain => 1,
            Self::Hail => 2,
            Self::RainAndHail => 3,
            Self::Other(code) => *code,
        }
    }
}

impl fmt::Display for PrecipitationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Rain => write!(f, "rain"),
            Self::Hail => write!(f, "hail"),
            Self::RainAndHail => write!(f, "rain and hail"),
            Self::Other(code) => write!(f, "unknown ({code})"),
        }
    }
}

impl From<i64> for PrecipitationType {
    fn from(code: i64) -> Self {
        Self::from_code(code)
    }
}

impl From<PrecipitationType> for i64 {
    fn from(kind: PrecipitationType) -> Self {
        kind.code()
    }
}

/// How the rain figures in the record were derived
///
/// Nearcast is WeatherFlow's server-side rain correction; the code says
/// whether a corrected value is present and shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum PrecipitationAnalysis {
    /// No analysis applied (code 0)
    None,
    /// Nearcast value with display on (code 1)
    NearcastDisplayOn,
    /// Nearcast value with display off (code 2)
    NearcastDisplayOff,
    /// A code this client does not recognize, preserved as-is
    Other(i64),
}

impl PrecipitationAnalysis {
    /// Map a wire code to its analysis kind
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Self::None,
            1 => Self::NearcastDisplayOn,
            2 => Self::NearcastDisplayOff,
            other => Self::Other(other),
        }
    }

    /// Get the wire code
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::NearcastDisplayOn => 1,
            Self::NearcastDisplayOff => 2,
            Self::Other(code) => *code,
        }
    }
}

impl fmt::Display for PrecipitationAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::NearcastDisplayOn => write!(f, "nearcast (display on)"),
            Self::NearcastDisplayOff => write!(f, "nearcast (display off)"),
            Self::Other(code) => write!(f, "unknown ({code})"),
        }
    }
}

impl From<i64> for PrecipitationAnalysis {
    fn from(code: i64) -> Self {
        Self::from_code(code)
    }
}

impl From<PrecipitationAnalysis> for i64 {
    fn from(kind: PrecipitationAnalysis) -> Self {
        kind.code()
    }
}

/// One decoded Tempest sensor record
///
/// Immutable once decoded. Serializes with explicit named fields in
/// declaration order; numeric values round-trip exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation time as Unix epoch seconds
    pub timestamp: i64,
    /// Lowest wind over the sample interval in m/s
    pub wind_lull: f64,
    /// Average wind over the sample interval in m/s
    pub wind_avr: f64,
    /// Highest wind over the sample interval in m/s
    pub wind_gust: f64,
    /// Wind direction in degrees
    pub wind_direction: u16,
    /// Wind sampling interval in seconds
    pub wind_sample_interval: u32,
    /// Station pressure in mb
    pub pressure: f64,
    /// Air temperature in degrees Celsius
    pub air_temp: f64,
    /// Relative humidity in percent
    pub relative_humidity: f64,
    /// Illuminance in lux
    pub illuminance: f64,
    /// UV index
    pub uv: f64,
    /// Solar radiation in W/m^2
    pub solar_radiation: f64,
    /// Rain over the reporting interval in mm
    pub rain_accumulation: f64,
    /// Kind of precipitation detected
    pub precipitation_type: PrecipitationType,
    /// Average lightning strike distance in km
    pub lightning_average_distance: f64,
    /// Lightning strikes over the reporting interval
    pub lightning_strike_count: u32,
    /// Battery voltage in volts
    pub battery: f64,
    /// Reporting interval in minutes
    pub reporting_interval: u32,
    /// Rain since local midnight in mm
    pub local_day_rain_accumulation: f64,
    /// Nearcast-corrected rain over the reporting interval in mm
    pub nearcast_rain_accumulation: f64,
    /// Nearcast-corrected rain since local midnight in mm
    pub local_day_nearcast_rain_accumulation: f64,
    /// Which rain analysis produced the Nearcast figures
    pub precipitation_analysis_type: PrecipitationAnalysis,
}

impl Observation {
    /// Payload tag declaring the layout this decoder understands
    pub const PAYLOAD_TAG: &'static str = "obs_st";

    /// Number of positional fields in an `obs_st` record
    pub const FIELD_COUNT: usize = 22;

    /// Decode a positional observation array
    ///
    /// `device_type` is the payload tag the enclosing message declared for
    /// the array. Anything other than [`Self::PAYLOAD_TAG`] is rejected
    /// without attempting a partial decode. The timestamp slot accepts
    /// integer or float epoch values; every other slot must carry its
    /// declared JSON type. Elements beyond the known layout are ignored.
    pub fn decode(raw: &[Value], device_type: &str) -> Result<Self, DecodeError> {
        if device_type != Self::PAYLOAD_TAG {
            return Err(DecodeError::unsupported_device_type(device_type));
        }

        Ok(Self {
            timestamp: field_epoch(raw, 0, "timestamp")?,
            wind_lull: field_f64(raw, 1, "wind_lull")?,
            wind_avr: field_f64(raw, 2, "wind_avr")?,
            wind_gust: field_f64(raw, 3, "wind_gust")?,
            wind_direction: field_u16(raw, 4, "wind_direction")?,
            wind_sample_interval: field_u32(raw, 5, "wind_sample_interval")?,
            pressure: field_f64(raw, 6, "pressure")?,
            air_temp: field_f64(raw, 7, "air_temp")?,
            relative_humidity: field_f64(raw, 8, "relative_humidity")?,
            illuminance: field_f64(raw, 9, "illuminance")?,
            uv: field_f64(raw, 10, "uv")?,
            solar_radiation: field_f64(raw, 11, "solar_radiation")?,
            rain_accumulation: field_f64(raw, 12, "rain_accumulation")?,
            precipitation_type: PrecipitationType::from_code(field_i64(
                raw,
                13,
                "precipitation_type",
            )?),
            lightning_average_distance: field_f64(raw, 14, "lightning_average_distance")?,
            lightning_strike_count: field_u32(raw, 15, "lightning_strike_count")?,
            battery: field_f64(raw, 16, "battery")?,
            reporting_interval: field_u32(raw, 17, "reporting_interval")?,
            local_day_rain_accumulation: field_f64(raw, 18, "local_day_rain_accumulation")?,
            nearcast_rain_accumulation: field_f64(raw, 19, "nearcast_rain_accumulation")?,
            local_day_nearcast_rain_accumulation: field_f64(
                raw,
                20,
                "local_day_nearcast_rain_accumulation",
            )?,
            precipitation_analysis_type: PrecipitationAnalysis::from_code(field_i64(
                raw,
                21,
                "precipitation_analysis_type",
            )?),
        })
    }

    /// Observation time as a UTC datetime
    ///
    /// Returns `None` for epoch values outside the representable range.
    #[must_use]
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

fn value_at(raw: &[Value], index: usize) -> Result<&Value, DecodeError> {
    raw.get(index)
        .ok_or(DecodeError::IndexOutOfRange {
            index,
            len: raw.len(),
        })
}

fn field_f64(raw: &[Value], index: usize, field: &'static str) -> Result<f64, DecodeError> {
    value_at(raw, index)?
        .as_f64()
        .ok_or(DecodeError::type_mismatch(index, field, "number"))
}

fn field_i64(raw: &[Value], index: usize, field: &'static str) -> Result<i64, DecodeError> {
    value_at(raw, index)?
        .as_i64()
        .ok_or(DecodeError::type_mismatch(index, field, "integer"))
}

fn field_u16(raw: &[Value], index: usize, field: &'static str) -> Result<u16, DecodeError> {
    u16::try_from(field_i64(raw, index, field)?)
        .map_err(|_| DecodeError::type_mismatch(index, field, "unsigned integer"))
}

fn field_u32(raw: &[Value], index: usize, field: &'static str) -> Result<u32, DecodeError> {
    u32::try_from(field_i64(raw, index, field)?)
        .map_err(|_| DecodeError::type_mismatch(index, field, "unsigned integer"))
}

/// Epoch seconds arrive as integers but appear as floats in some
/// historical exports, so both are accepted here. No other slot coerces.
#[allow(clippy::cast_possible_truncation)]
fn field_epoch(raw: &[Value], index: usize, field: &'static str) -> Result<i64, DecodeError> {
    let value = value_at(raw, index)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|secs| secs as i64))
        .ok_or(DecodeError::type_mismatch(index, field, "epoch number"))
}
