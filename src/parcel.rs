//! Parcels and the layers they are drawn from.
use crate::{
    accessors::{Accessors, Bounds},
    config::AnalysisConfig,
    error::{AnalysisError, Result},
    interpolation::{linear_interp, PRESSURE_EPS},
    thermo::{
        dew_point_from_mixing_ratio, equivalent_potential_temperature, lifted_condensation_level,
        mixing_ratio, potential_temperature, temperature_from_theta, virtual_temperature,
    },
};
use metfor::{Celsius, HectoPascal, Kelvin, Quantity};

mod ascent;

pub use self::ascent::{
    lcl_on_grid, lift_dry_parcel, lift_parcel, lift_saturated_parcel, AscentStage, DryAscent,
    ParcelAscent, ParcelPoint, SaturatedAscent,
};

/// Variables defining a parcel as used in parcel analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parcel {
    /// Temperature
    pub temperature: Celsius,
    /// Pressure
    pub pressure: HectoPascal,
    /// Dew point
    pub dew_point: Celsius,
}

impl Parcel {
    /// Get the potential temperature of the parcel.
    pub fn theta(&self) -> Kelvin {
        potential_temperature(self.temperature, self.pressure)
    }

    /// Get the equivalent potential temperature of the parcel.
    pub fn theta_e(&self) -> Kelvin {
        equivalent_potential_temperature(self.temperature, self.dew_point, self.pressure)
    }

    /// Get the mixing ratio of the parcel in g/kg.
    pub fn mixing_ratio(&self) -> f64 {
        mixing_ratio(self.dew_point, self.pressure)
    }

    /// Get the virtual temperature of the parcel.
    pub fn virtual_temperature(&self) -> Celsius {
        virtual_temperature(self.temperature, self.dew_point, self.pressure)
    }

    /// Pressure at the lifting condensation level of the parcel.
    pub fn lcl_pressure(&self) -> Result<HectoPascal> {
        lifted_condensation_level(self.pressure, self.temperature, self.dew_point)
    }

    /// Lift this parcel from its own level to `end`.
    pub fn lift(&self, end: HectoPascal, step: f64) -> Result<ParcelAscent> {
        let lcl = self.lcl_pressure()?;
        Ok(lift_parcel(
            self.temperature,
            self.pressure,
            end,
            lcl,
            step,
        ))
    }

    /// Virtual temperature of the parcel at a point along its path.
    ///
    /// Below the LCL the parcel keeps its mixing ratio, above it the parcel is saturated, so the
    /// dew point is the lesser of the path temperature and the dew point of the original mixing
    /// ratio at that pressure.
    pub fn path_virtual_temperature(&self, pnt: ParcelPoint) -> Result<Celsius> {
        let (p, t) = pnt;
        let td = dew_point_from_mixing_ratio(self.mixing_ratio(), p)?;
        let td = if td > t { t } else { td };

        Ok(virtual_temperature(t, td, p))
    }

    /// Virtual temperature of the parcel after lifting it to `target`.
    ///
    /// The parcel is lifted one step past the target and its temperature is interpolated between
    /// the bracketing grid points.
    pub fn virtual_temperature_at(&self, target: HectoPascal, step: f64) -> Result<Celsius> {
        if target.unpack() > self.pressure.unpack() + PRESSURE_EPS {
            return Err(AnalysisError::PressureOutOfRange(target.unpack()));
        }

        let tgt = target.unpack();
        let mut prev: Option<ParcelPoint> = None;
        for (p, t) in self.lift(HectoPascal(tgt - step), step)? {
            if (p.unpack() - tgt).abs() < PRESSURE_EPS {
                return self.path_virtual_temperature((p, t));
            }

            if let Some((p0, t0)) = prev {
                if p0.unpack() > tgt && p.unpack() < tgt {
                    let t_tgt =
                        linear_interp(tgt, p0.unpack(), p.unpack(), t0.unpack(), t.unpack());
                    return self.path_virtual_temperature((target, Celsius(t_tgt)));
                }
            }

            prev = Some((p, t));
        }

        Err(AnalysisError::NotEnoughData)
    }
}

/// Pressures from `start` up to `end` in steps of `step`, inclusive of `end` when it falls on the
/// grid.
pub(crate) fn pressure_scan(
    start: HectoPascal,
    end: HectoPascal,
    step: f64,
) -> Result<impl Iterator<Item = HectoPascal>> {
    if step.is_nan() || step <= 0.0 {
        return Err(AnalysisError::InvalidInput);
    }

    let (start, end) = (start.unpack(), end.unpack());
    Ok((0..)
        .map(move |k| start - f64::from(k) * step)
        .take_while(move |&p| p >= end - PRESSURE_EPS)
        .map(HectoPascal))
}

/// Create a parcel from the environment at `pressure`.
pub fn parcel_at(pressure: HectoPascal, acc: &Accessors) -> Result<Parcel> {
    Ok(Parcel {
        temperature: (acc.temperature)(pressure)?,
        pressure,
        dew_point: (acc.dew_point)(pressure)?,
    })
}

/// Get a surface parcel.
pub fn surface_parcel(acc: &Accessors) -> Result<Parcel> {
    parcel_at(acc.bounds.surface_pressure, acc)
}

/// Pressure of the level with the highest equivalent potential temperature in the low levels.
///
/// The layer is scanned from the surface upward in steps of `scan_step`, stopping at
/// `most_unstable_top` or the top of the profile. Ties go to the lowest level.
pub fn most_unstable_pressure<T, Td>(
    f_t: T,
    f_td: Td,
    bounds: &Bounds,
    config: &AnalysisConfig,
) -> Result<HectoPascal>
where
    T: Fn(HectoPascal) -> Result<Celsius>,
    Td: Fn(HectoPascal) -> Result<Celsius>,
{
    let top = if bounds.top_pressure.unpack() > config.most_unstable_top {
        bounds.top_pressure
    } else {
        HectoPascal(config.most_unstable_top)
    };

    let mut best: Option<(HectoPascal, f64)> = None;
    for p in pressure_scan(bounds.surface_pressure, top, config.scan_step)? {
        let theta_e = equivalent_potential_temperature(f_t(p)?, f_td(p)?, p).unpack();

        if best.map_or(true, |(_, max_theta_e)| theta_e > max_theta_e) {
            best = Some((p, theta_e));
        }
    }

    best.map(|(p, _)| p).ok_or(AnalysisError::NotEnoughData)
}

/// Get the most unstable parcel.
///
/// This is the parcel with the highest equivalent potential temperature between the surface and
/// `most_unstable_top`.
pub fn most_unstable_parcel(acc: &Accessors, config: &AnalysisConfig) -> Result<Parcel> {
    let p = most_unstable_pressure(&acc.temperature, &acc.dew_point, &acc.bounds, config)?;
    parcel_at(p, acc)
}

/// Create a mixed layer parcel.
///
/// The potential temperature and mixing ratio are averaged over the lowest `mixed_layer_depth`
/// hPa of the profile, sampled every `scan_step` hPa, and the parcel is brought to the surface
/// pressure.
pub fn mixed_layer_parcel(acc: &Accessors, config: &AnalysisConfig) -> Result<Parcel> {
    let sfc = acc.bounds.surface_pressure;
    let top = HectoPascal(
        (sfc.unpack() - config.mixed_layer_depth).max(acc.bounds.top_pressure.unpack()),
    );

    let (sum_theta, sum_mw, count) = pressure_scan(sfc, top, config.scan_step)?.try_fold(
        (0.0, 0.0, 0usize),
        |(sum_theta, sum_mw, count), p| -> Result<(f64, f64, usize)> {
            let t = (acc.temperature)(p)?;
            let td = (acc.dew_point)(p)?;

            Ok((
                sum_theta + potential_temperature(t, p).unpack(),
                sum_mw + mixing_ratio(td, p),
                count + 1,
            ))
        },
    )?;

    if count == 0 {
        return Err(AnalysisError::NotEnoughData);
    }

    let n = count as f64;
    let temperature = temperature_from_theta(Kelvin(sum_theta / n), sfc);
    let dew_point = dew_point_from_mixing_ratio(sum_mw / n, sfc)?;
    let dew_point = if dew_point > temperature {
        temperature
    } else {
        dew_point
    };

    Ok(Parcel {
        temperature,
        pressure: sfc,
        dew_point,
    })
}
