//! Thermodynamic functions used by the parcel model and the indexes.
//!
//! These are pure scalar formulas. They are total over the range of values found in the
//! troposphere, and may return non-finite values (or a `Domain` error where noted) outside of it.
//! Vapor pressure uses the empirical Magnus/Tetens form `6.11 * 10^(7.5 T / (237.3 + T))` so the
//! dew point inversions below are closed form.
use crate::error::{AnalysisError, Result};
use metfor::{Celsius, HectoPascal, Kelvin, Quantity};

/// Gas constant for dry air (J / kg / K).
pub const RD: f64 = 287.04;
/// Specific heat of dry air at constant pressure (J / kg / K).
pub const CP: f64 = 1005.7;
/// Standard gravity (m / s^2).
pub const G0: f64 = 9.80665;
/// Latent heat of vaporization (J / kg).
pub const LV: f64 = 2.501e6;
/// Ratio of the gas constants of dry air and water vapor.
pub const EPSILON: f64 = 0.622;
/// Poisson constant, Rd / cp, as used by Bolton (1980).
pub const KAPPA: f64 = 0.2854;
/// Reference pressure for potential temperatures.
pub const P0: HectoPascal = HectoPascal(1000.0);

const ZERO_C: f64 = 273.15;
const WET_BULB_ITERATIONS: usize = 50;

/// Saturated vapor pressure over liquid water at temperature `t`.
#[inline]
pub fn saturated_vapor_pressure(t: Celsius) -> HectoPascal {
    let t = t.unpack();
    HectoPascal(6.11 * 10.0f64.powf(7.5 * t / (237.3 + t)))
}

/// Vapor pressure of air with the given dew point.
#[inline]
pub fn vapor_pressure(dew_point: Celsius) -> HectoPascal {
    saturated_vapor_pressure(dew_point)
}

/// Mixing ratio in g/kg.
#[inline]
pub fn mixing_ratio(dew_point: Celsius, pressure: HectoPascal) -> f64 {
    let e = vapor_pressure(dew_point).unpack();
    621.97 * e / (pressure.unpack() - e)
}

/// Saturated mixing ratio in g/kg.
#[inline]
pub fn saturated_mixing_ratio(t: Celsius, pressure: HectoPascal) -> f64 {
    mixing_ratio(t, pressure)
}

/// Relative humidity as a fraction, the ratio of the mixing ratio to the saturated mixing ratio.
#[inline]
pub fn relative_humidity(t: Celsius, dew_point: Celsius, pressure: HectoPascal) -> f64 {
    mixing_ratio(dew_point, pressure) / saturated_mixing_ratio(t, pressure)
}

/// Dew point from temperature and relative humidity (as a fraction).
///
/// Fails with a `Domain` error if the humidity is not positive.
pub fn dew_point_from_rh(t: Celsius, rh: f64) -> Result<Celsius> {
    dew_point_from_vapor_pressure(rh * saturated_vapor_pressure(t).unpack())
}

/// Dew point of air with mixing ratio `mw` (g/kg) at `pressure`.
///
/// This is how a parcel's dew point changes as it is lifted without condensation.
pub fn dew_point_from_mixing_ratio(mw: f64, pressure: HectoPascal) -> Result<Celsius> {
    let p = pressure.unpack();
    dew_point_from_vapor_pressure(mw * p / (621.97 + mw))
}

fn dew_point_from_vapor_pressure(e: f64) -> Result<Celsius> {
    let x = e / 6.11;
    if x.is_nan() || x <= 0.0 {
        return Err(AnalysisError::Domain("vapor pressure must be positive"));
    }

    let l = x.log10();
    Ok(Celsius(237.3 * l / (7.5 - l)))
}

/// Virtual temperature.
#[inline]
pub fn virtual_temperature(t: Celsius, dew_point: Celsius, pressure: HectoPascal) -> Celsius {
    let e = vapor_pressure(dew_point).unpack();
    Celsius((t.unpack() + ZERO_C) / (1.0 - 0.379 * e / pressure.unpack()) - ZERO_C)
}

/// Potential temperature referenced to 1000 hPa.
#[inline]
pub fn potential_temperature(t: Celsius, pressure: HectoPascal) -> Kelvin {
    Kelvin((t.unpack() + ZERO_C) * (P0.unpack() / pressure.unpack()).powf(KAPPA))
}

/// Temperature at `pressure` for air with potential temperature `theta`.
#[inline]
pub fn temperature_from_theta(theta: Kelvin, pressure: HectoPascal) -> Celsius {
    Celsius(theta.unpack() * (pressure.unpack() / P0.unpack()).powf(KAPPA) - ZERO_C)
}

/// Equivalent potential temperature from Bolton (1980), equations 15 and 43.
pub fn equivalent_potential_temperature(
    t: Celsius,
    dew_point: Celsius,
    pressure: HectoPascal,
) -> Kelvin {
    let t_k = t.unpack() + ZERO_C;
    let mw = mixing_ratio(dew_point, pressure);
    let t_l = bolton_lcl_temperature(t_k, dew_point.unpack() + ZERO_C);

    let theta_l = t_k * (P0.unpack() / pressure.unpack()).powf(KAPPA * (1.0 - 0.28e-3 * mw));

    Kelvin(theta_l * ((3.376 / t_l - 0.00254) * mw * (1.0 + 0.81e-3 * mw)).exp())
}

/// Wet bulb temperature.
///
/// Solved with a fixed number of iterations of a psychrometric weighted average between the dry
/// bulb and dew point temperatures, where the weight on the dew point is the slope of the
/// saturation curve between the current estimate and the dew point. There is no convergence
/// check; the result always lies between the dew point and the temperature.
pub fn wet_bulb_temperature(t: Celsius, dew_point: Celsius, pressure: HectoPascal) -> Celsius {
    let (t, td) = (t.unpack(), dew_point.unpack());
    let gamma = 0.00066 * pressure.unpack();

    let mut tw = t;
    for _ in 0..WET_BULB_ITERATIONS {
        let mid = (tw + td) / 2.0;
        let es = saturated_vapor_pressure(Celsius(mid)).unpack();
        let delta = 4098.0 * es / (mid + 237.3).powi(2);

        tw = (gamma * t + delta * td) / (gamma + delta);
    }

    Celsius(tw)
}

/// Temperature at the lifted condensation level.
///
/// Fails with a `Domain` error for supersaturated input.
pub fn lcl_temperature(t: Celsius, dew_point: Celsius) -> Result<Kelvin> {
    if t < dew_point {
        return Err(AnalysisError::Domain("temperature is below the dew point"));
    }

    Ok(Kelvin(bolton_lcl_temperature(
        t.unpack() + ZERO_C,
        dew_point.unpack() + ZERO_C,
    )))
}

// Bolton (1980) equation 15, all values in Kelvin.
#[inline]
fn bolton_lcl_temperature(t_k: f64, td_k: f64) -> f64 {
    1.0 / (1.0 / (td_k - 56.0) + (t_k / td_k).ln() / 800.0) + 56.0
}

/// Pressure at the lifted condensation level.
///
/// Found by holding potential temperature constant from the starting level to the LCL
/// temperature.
pub fn lifted_condensation_level(
    pressure: HectoPascal,
    t: Celsius,
    dew_point: Celsius,
) -> Result<HectoPascal> {
    let t_lcl = lcl_temperature(t, dew_point)?.unpack();
    let t_k = t.unpack() + ZERO_C;

    Ok(HectoPascal(pressure.unpack() * (t_lcl / t_k).powf(1.0 / KAPPA)))
}

/// Saturated adiabatic lapse rate in K/m.
pub fn moist_adiabatic_lapse_rate(t: Celsius, pressure: HectoPascal) -> f64 {
    let t_k = t.unpack() + ZERO_C;
    let rs = saturated_mixing_ratio(t, pressure) / 1000.0;

    G0 * (1.0 + LV * rs / (RD * t_k)) / (CP + LV * LV * rs * EPSILON / (RD * t_k * t_k))
}
