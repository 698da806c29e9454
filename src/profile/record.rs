//! The flat record form of a profile used for ingestion and export.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A level as ingested or exported.
///
/// Missing values are `NaN` in memory and `null` (or absent) when serialized. When `enabled` is
/// not given the level is enabled if its pressure is greater than 300 hPa.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawLevel {
    /// Pressure in hPa
    #[serde(with = "nullable", default = "missing")]
    pub pressure: f64,
    /// Geopotential height in meters
    #[serde(with = "nullable", default = "missing")]
    pub height: f64,
    /// Temperature in C
    #[serde(with = "nullable", default = "missing")]
    pub temp: f64,
    /// Dew point in C
    #[serde(with = "nullable", default = "missing")]
    pub dewpt: f64,
    /// Direction the wind blows from in degrees
    #[serde(with = "nullable", default = "missing")]
    pub winddir: f64,
    /// Wind speed in km/h
    #[serde(with = "nullable", default = "missing")]
    pub windspd: f64,
    /// Explicit enabled flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

fn missing() -> f64 {
    std::f64::NAN
}

impl RawLevel {
    /// Create a new record without an explicit enabled flag.
    pub fn new(
        pressure: f64,
        height: f64,
        temp: f64,
        dewpt: f64,
        winddir: f64,
        windspd: f64,
    ) -> Self {
        RawLevel {
            pressure,
            height,
            temp,
            dewpt,
            winddir,
            windspd,
            enabled: None,
        }
    }

    /// Builder method to set the enabled flag.
    pub fn with_enabled(self, enabled: bool) -> Self {
        RawLevel {
            enabled: Some(enabled),
            ..self
        }
    }
}

impl Default for RawLevel {
    fn default() -> Self {
        RawLevel::new(
            missing(),
            missing(),
            missing(),
            missing(),
            missing(),
            missing(),
        )
    }
}

/// A whole sounding as ingested or exported, with optional metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundingRecord {
    /// Description of where the data came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Valid time of the sounding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_time: Option<NaiveDateTime>,
    /// The levels, in the order they were supplied.
    pub levels: Vec<RawLevel>,
}

mod nullable {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(val: &f64, s: S) -> Result<S::Ok, S::Error> {
        if val.is_finite() {
            s.serialize_some(val)
        } else {
            s.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(std::f64::NAN))
    }
}
