//! Accessor closures the index engine uses to look at a profile.
use crate::{
    error::{AnalysisError, Result},
    thermo,
};
use metfor::{Celsius, HectoPascal, Meters, MetersPSec, WindUV};

/// A fallible lookup by pressure.
pub type PressureFn<'a, T> = Box<dyn Fn(HectoPascal) -> Result<T> + 'a>;

/// A fallible lookup by height.
pub type HeightFn<'a, T> = Box<dyn Fn(Meters) -> Result<T> + 'a>;

/// The vertical extent of the enabled part of a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Pressure of the top (lowest pressure) enabled level.
    pub top_pressure: HectoPascal,
    /// Pressure of the surface (highest pressure) enabled level.
    pub surface_pressure: HectoPascal,
    /// Height of the surface level, if it was reported.
    pub surface_height: Option<Meters>,
}

impl Bounds {
    /// Height of the surface, or an error if it is missing.
    pub fn surface_height(&self) -> Result<Meters> {
        self.surface_height.ok_or(AnalysisError::MissingValue)
    }
}

/// Pointwise lookups into a profile, bound to an immutable snapshot of it.
///
/// The index functions only ever see a profile through these, so tests and callers can supply
/// analytic profiles as plain closures.
pub struct Accessors<'a> {
    /// Temperature at a pressure.
    pub temperature: PressureFn<'a, Celsius>,
    /// Dew point at a pressure.
    pub dew_point: PressureFn<'a, Celsius>,
    /// Geopotential height at a pressure.
    pub height: PressureFn<'a, Meters>,
    /// Wind speed (km/h) at a pressure.
    pub wind_speed: PressureFn<'a, f64>,
    /// Wind direction (degrees) at a pressure.
    pub wind_direction: PressureFn<'a, f64>,
    /// Wind vector at a height.
    pub wind: HeightFn<'a, WindUV<MetersPSec>>,
    /// Extent of the profile.
    pub bounds: Bounds,
}

impl<'a> Accessors<'a> {
    /// Environmental virtual temperature at `pressure`.
    pub fn virtual_temperature(&self, pressure: HectoPascal) -> Result<Celsius> {
        let t = (self.temperature)(pressure)?;
        let td = (self.dew_point)(pressure)?;

        Ok(thermo::virtual_temperature(t, td, pressure))
    }

    /// Height above the surface of the level at `pressure`.
    pub fn height_agl(&self, pressure: HectoPascal) -> Result<Meters> {
        let sfc = self.bounds.surface_height()?;
        let h = (self.height)(pressure)?;

        Ok(Meters(h.0 - sfc.0))
    }
}

impl<'a> std::fmt::Debug for Accessors<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accessors")
            .field("bounds", &self.bounds)
            .finish()
    }
}
