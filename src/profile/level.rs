use super::record::RawLevel;
use crate::wind::wind_components;
use metfor::{Celsius, HectoPascal, Meters, MetersPSec, Quantity, WindUV};
use optional::Optioned;
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// Stable identity of a level within a profile.
///
/// Identities are handed out in increasing order and never reused, so an id held across edits
/// either still names the same level or names nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(u64);

impl From<u64> for LevelId {
    fn from(id: u64) -> Self {
        LevelId(id)
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The editable attributes of a level.
///
/// The string forms match the field names of [`RawLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
pub enum Attribute {
    /// Pressure in hPa
    #[strum(serialize = "pressure")]
    Pressure,
    /// Geopotential height in meters
    #[strum(serialize = "height")]
    Height,
    /// Temperature in C
    #[strum(serialize = "temp")]
    Temperature,
    /// Dew point in C
    #[strum(serialize = "dewpt")]
    DewPoint,
    /// Direction the wind blows from in degrees
    #[strum(serialize = "winddir")]
    WindDirection,
    /// Wind speed in km/h
    #[strum(serialize = "windspd")]
    WindSpeed,
}

/// One row of a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    id: LevelId,
    enabled: bool,
    /// Pressure in hPa
    pub pressure: Optioned<HectoPascal>,
    /// Geopotential height in meters
    pub height: Optioned<Meters>,
    /// Temperature in C
    pub temperature: Optioned<Celsius>,
    /// Dew point in C
    pub dew_point: Optioned<Celsius>,
    /// Direction the wind blows from in degrees
    pub wind_direction: Optioned<f64>,
    /// Wind speed in km/h
    pub wind_speed: Optioned<f64>,
}

#[inline]
fn present(val: f64) -> Option<f64> {
    if val.is_finite() {
        Some(val)
    } else {
        None
    }
}

impl Level {
    pub(crate) fn new(id: LevelId, enabled: bool, values: [Option<f64>; 6]) -> Self {
        let [pressure, height, temperature, dew_point, wind_direction, wind_speed] = values;
        let opt = |val: Option<f64>| val.and_then(present);

        Level {
            id,
            enabled,
            pressure: Optioned::from(opt(pressure).map(HectoPascal)),
            height: Optioned::from(opt(height).map(Meters)),
            temperature: Optioned::from(opt(temperature).map(Celsius)),
            dew_point: Optioned::from(opt(dew_point).map(Celsius)),
            wind_direction: Optioned::from(opt(wind_direction)),
            wind_speed: Optioned::from(opt(wind_speed)),
        }
    }

    /// Build a level from an ingested record. Without an explicit flag, levels below 300 hPa
    /// start out enabled.
    pub(crate) fn from_raw(id: LevelId, raw: &RawLevel) -> Self {
        let enabled = raw
            .enabled
            .unwrap_or_else(|| raw.pressure.is_finite() && raw.pressure > 300.0);

        Level::new(
            id,
            enabled,
            [
                Some(raw.pressure),
                Some(raw.height),
                Some(raw.temp),
                Some(raw.dewpt),
                Some(raw.winddir),
                Some(raw.windspd),
            ],
        )
    }

    pub(crate) fn to_raw(&self) -> RawLevel {
        let val = |attr| self.get(attr).unwrap_or(std::f64::NAN);

        RawLevel {
            pressure: val(Attribute::Pressure),
            height: val(Attribute::Height),
            temp: val(Attribute::Temperature),
            dewpt: val(Attribute::DewPoint),
            winddir: val(Attribute::WindDirection),
            windspd: val(Attribute::WindSpeed),
            enabled: Some(self.enabled),
        }
    }

    /// The identity of this level.
    pub fn id(&self) -> LevelId {
        self.id
    }

    /// Whether this level takes part in analysis.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Get the value of an attribute, `None` if it is missing.
    pub fn get(&self, attr: Attribute) -> Option<f64> {
        use self::Attribute::*;

        match attr {
            Pressure => self.pressure.into_option().map(|p| p.unpack()),
            Height => self.height.into_option().map(|h| h.unpack()),
            Temperature => self.temperature.into_option().map(|t| t.unpack()),
            DewPoint => self.dew_point.into_option().map(|t| t.unpack()),
            WindDirection => self.wind_direction.into_option(),
            WindSpeed => self.wind_speed.into_option(),
        }
    }

    /// Set the value of an attribute, non-finite values mark it as missing.
    pub(crate) fn set(&mut self, attr: Attribute, value: f64) {
        use self::Attribute::*;

        let val = present(value);
        match attr {
            Pressure => self.pressure = Optioned::from(val.map(HectoPascal)),
            Height => self.height = Optioned::from(val.map(Meters)),
            Temperature => self.temperature = Optioned::from(val.map(Celsius)),
            DewPoint => self.dew_point = Optioned::from(val.map(Celsius)),
            WindDirection => self.wind_direction = Optioned::from(val),
            WindSpeed => self.wind_speed = Optioned::from(val),
        }
    }

    /// The wind as components, if both direction and speed are present.
    pub fn wind(&self) -> Option<WindUV<MetersPSec>> {
        let dir = self.wind_direction.into_option()?;
        let spd = self.wind_speed.into_option()?;

        Some(wind_components(dir, spd))
    }
}
