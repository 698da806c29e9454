use super::level::{Attribute, Level};
use crate::{
    accessors::{Accessors, Bounds},
    error::{AnalysisError, Result},
    interpolation::{value_at, wind_at_height, wind_at_pressure, PRESSURE_EPS},
};
use metfor::{Celsius, HectoPascal, Meters, MetersPSec, Quantity, WindUV};
use std::cmp::Ordering;
use tracing::warn;

/// An immutable copy of the enabled levels of a profile, sorted by ascending pressure.
///
/// Snapshots own their data, so they can be handed to another thread while the profile keeps
/// being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSnapshot {
    levels: Vec<Level>,
}

impl ProfileSnapshot {
    /// Collect the enabled levels with a pressure, sorted by ascending pressure.
    ///
    /// The sort is stable, so duplicate pressures keep their raw order.
    pub(crate) fn from_levels(levels: &[Level]) -> Self {
        let mut enabled: Vec<Level> = levels
            .iter()
            .filter(|lvl| lvl.is_enabled() && lvl.pressure.is_some())
            .cloned()
            .collect();

        enabled.sort_by(|a, b| {
            a.pressure
                .unpack()
                .partial_cmp(&b.pressure.unpack())
                .unwrap_or(Ordering::Equal)
        });

        for (a, b) in enabled.iter().zip(enabled.iter().skip(1)) {
            if (a.pressure.unpack().unpack() - b.pressure.unpack().unpack()).abs() < PRESSURE_EPS {
                warn!(
                    first = %a.id(),
                    second = %b.id(),
                    pressure = a.pressure.unpack().unpack(),
                    "duplicate pressure among enabled levels"
                );
            }
        }

        ProfileSnapshot { levels: enabled }
    }

    /// The enabled levels, sorted by ascending pressure.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Number of enabled levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether there are no enabled levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The enabled level with the lowest pressure.
    #[doc(alias = "first")]
    pub fn top_level(&self) -> Option<&Level> {
        self.levels.first()
    }

    /// The enabled level with the highest pressure.
    #[doc(alias = "last")]
    pub fn surface_level(&self) -> Option<&Level> {
        self.levels.last()
    }

    /// Interpolate an attribute at `pressure`, linearly in pressure.
    pub fn value_at(&self, pressure: HectoPascal, attr: Attribute) -> Result<f64> {
        value_at(&self.levels, pressure, attr)
    }

    /// Interpolate the wind at `pressure`.
    pub fn wind_at_pressure(&self, pressure: HectoPascal) -> Result<WindUV<MetersPSec>> {
        wind_at_pressure(&self.levels, pressure)
    }

    /// Interpolate the wind at `height`, linearly in height.
    pub fn wind_at(&self, height: Meters) -> Result<WindUV<MetersPSec>> {
        wind_at_height(&self.levels, height)
    }

    /// The vertical extent of the snapshot.
    pub fn bounds(&self) -> Result<Bounds> {
        let top = self.top_level().ok_or(AnalysisError::NotEnoughData)?;
        let sfc = self.surface_level().ok_or(AnalysisError::NotEnoughData)?;

        Ok(Bounds {
            top_pressure: top.pressure.into_option().ok_or(AnalysisError::MissingValue)?,
            surface_pressure: sfc.pressure.into_option().ok_or(AnalysisError::MissingValue)?,
            surface_height: sfc.height.into_option(),
        })
    }

    /// Accessor closures bound to this snapshot, for the index functions.
    pub fn accessors(&self) -> Result<Accessors<'_>> {
        let bounds = self.bounds()?;

        Ok(Accessors {
            temperature: Box::new(move |p: HectoPascal| {
                self.value_at(p, Attribute::Temperature).map(Celsius)
            }),
            dew_point: Box::new(move |p: HectoPascal| {
                self.value_at(p, Attribute::DewPoint).map(Celsius)
            }),
            height: Box::new(move |p: HectoPascal| {
                self.value_at(p, Attribute::Height).map(Meters)
            }),
            wind_speed: Box::new(move |p: HectoPascal| self.value_at(p, Attribute::WindSpeed)),
            wind_direction: Box::new(move |p: HectoPascal| {
                self.value_at(p, Attribute::WindDirection)
            }),
            wind: Box::new(move |h: Meters| self.wind_at(h)),
            bounds,
        })
    }
}
