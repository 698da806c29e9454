//! Lazily evaluated parcel paths on a fixed pressure grid.
//!
//! Every iterator yields `(pressure, temperature)` pairs starting at the launch level and stepping
//! up by a fixed pressure increment. Grid points are computed as `start - k * step` so that long
//! ascents do not accumulate rounding error. The iterators are cheap to clone, and a clone taken
//! before iterating can be used to restart the ascent from the beginning.
use crate::{
    interpolation::PRESSURE_EPS,
    thermo::{
        moist_adiabatic_lapse_rate, potential_temperature, temperature_from_theta,
        virtual_temperature, G0, RD,
    },
};
use metfor::{Celsius, HectoPascal, Kelvin, Quantity};

/// A point on a parcel path.
pub type ParcelPoint = (HectoPascal, Celsius);

// Pressure of the k-th grid point, or None once past the end of the ascent.
#[inline]
fn grid_point(start: f64, end: f64, step: f64, k: usize) -> Option<f64> {
    let p = start - k as f64 * step;

    if step.is_nan() || step <= 0.0 || p < end - PRESSURE_EPS || p < step {
        None
    } else {
        Some(p)
    }
}

/// Snap a lifting condensation level onto the ascent grid.
///
/// Returns the first grid point at or above (lower pressure than) `lcl`, or `start` if the LCL
/// is at or below the launch level.
pub fn lcl_on_grid(start: HectoPascal, lcl: HectoPascal, step: f64) -> HectoPascal {
    let (start, lcl) = (start.unpack(), lcl.unpack());

    if lcl >= start || step.is_nan() || step <= 0.0 {
        return HectoPascal(start);
    }

    let k = ((start - lcl) / step - 1.0e-9).ceil().max(0.0);
    HectoPascal(start - k * step)
}

/// Dry adiabatic ascent, conserving potential temperature.
#[derive(Debug, Clone)]
pub struct DryAscent {
    start: f64,
    end: f64,
    step: f64,
    theta: Kelvin,
    next_idx: usize,
}

/// Lift a parcel dry adiabatically from `(pressure, temperature)` up to `end`.
pub fn lift_dry_parcel(
    temperature: Celsius,
    pressure: HectoPascal,
    end: HectoPascal,
    step: f64,
) -> DryAscent {
    DryAscent {
        start: pressure.unpack(),
        end: end.unpack(),
        step,
        theta: potential_temperature(temperature, pressure),
        next_idx: 0,
    }
}

impl Iterator for DryAscent {
    type Item = ParcelPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let p = grid_point(self.start, self.end, self.step, self.next_idx)?;
        self.next_idx += 1;

        let p = HectoPascal(p);
        Some((p, temperature_from_theta(self.theta, p)))
    }
}

/// Saturated ascent, integrating the moist adiabatic lapse rate one step at a time.
///
/// Each step recomputes the lapse rate from the current temperature and pressure, then cools the
/// parcel by that rate times the hypsometric thickness of the step. The thickness uses the
/// current (saturated) temperature over the whole step.
#[derive(Debug, Clone)]
pub struct SaturatedAscent {
    start: f64,
    end: f64,
    step: f64,
    temperature: f64,
    next_idx: usize,
}

/// Lift a saturated parcel pseudo-adiabatically from `(pressure, temperature)` up to `end`.
pub fn lift_saturated_parcel(
    temperature: Celsius,
    pressure: HectoPascal,
    end: HectoPascal,
    step: f64,
) -> SaturatedAscent {
    SaturatedAscent {
        start: pressure.unpack(),
        end: end.unpack(),
        step,
        temperature: temperature.unpack(),
        next_idx: 0,
    }
}

impl Iterator for SaturatedAscent {
    type Item = ParcelPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.temperature.is_finite() {
            return None;
        }
        let p = grid_point(self.start, self.end, self.step, self.next_idx)?;
        self.next_idx += 1;

        let t = self.temperature;
        if let Some(p_next) = grid_point(self.start, self.end, self.step, self.next_idx) {
            let gamma = moist_adiabatic_lapse_rate(Celsius(t), HectoPascal(p));

            // Virtual temperature held constant over the step gives the hypsometric thickness
            // in closed form.
            let tv = virtual_temperature(Celsius(t), Celsius(t), HectoPascal(p)).unpack() + 273.15;
            let dz = RD / G0 * tv * (p / p_next).ln();

            self.temperature = t - gamma * dz;
        }

        Some((HectoPascal(p), Celsius(t)))
    }
}

/// Which part of its path a [`ParcelAscent`] is on.
#[derive(Debug, Clone)]
pub enum AscentStage {
    /// Below the lifting condensation level.
    DryAscent(DryAscent),
    /// Above the lifting condensation level.
    MoistAscent(SaturatedAscent),
    /// Finished.
    Terminated,
}

/// A full parcel path, dry adiabatic to the LCL and saturated above it.
///
/// The LCL is snapped onto the pressure grid (see [`lcl_on_grid`]). The dry stage runs through
/// that grid point and the saturated stage continues from the dry temperature there, so the LCL
/// point is yielded exactly once.
#[derive(Debug, Clone)]
pub struct ParcelAscent {
    stage: AscentStage,
    lcl: HectoPascal,
    end: HectoPascal,
    step: f64,
    last: Option<ParcelPoint>,
}

/// Lift a parcel from `(pressure, temperature)` to `end`, condensing at `lcl`.
pub fn lift_parcel(
    temperature: Celsius,
    pressure: HectoPascal,
    end: HectoPascal,
    lcl: HectoPascal,
    step: f64,
) -> ParcelAscent {
    let lcl = lcl_on_grid(pressure, lcl, step);
    let dry_end = if lcl > end { lcl } else { end };

    ParcelAscent {
        stage: AscentStage::DryAscent(lift_dry_parcel(temperature, pressure, dry_end, step)),
        lcl,
        end,
        step,
        last: None,
    }
}

impl ParcelAscent {
    /// The stage the ascent is currently in.
    pub fn stage(&self) -> &AscentStage {
        &self.stage
    }

    /// The lifting condensation level as snapped onto the pressure grid.
    pub fn lcl(&self) -> HectoPascal {
        self.lcl
    }
}

impl Iterator for ParcelAscent {
    type Item = ParcelPoint;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.stage {
                AscentStage::DryAscent(dry) => {
                    if let Some(pnt) = dry.next() {
                        self.last = Some(pnt);
                        return Some(pnt);
                    }

                    self.stage = match self.last {
                        Some((p, t)) if (p.unpack() - self.lcl.unpack()).abs() < PRESSURE_EPS => {
                            let mut moist = lift_saturated_parcel(t, p, self.end, self.step);
                            // The LCL was already yielded by the dry stage.
                            moist.next();
                            AscentStage::MoistAscent(moist)
                        }
                        _ => AscentStage::Terminated,
                    };
                }
                AscentStage::MoistAscent(moist) => match moist.next() {
                    Some(pnt) => return Some(pnt),
                    None => self.stage = AscentStage::Terminated,
                },
                AscentStage::Terminated => return None,
            }
        }
    }
}
