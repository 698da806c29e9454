//! Numerical integration.
use crate::{
    error::{AnalysisError, Result},
    thermo::{virtual_temperature, G0, RD},
};
use metfor::{Celsius, HectoPascal, Meters, Quantity};

/// Composite Simpson's rule over `2 * m` sub-intervals of `[a, b]`.
///
/// The integrand is fallible so that profile lookups can fail part way through, the first error
/// is returned.
pub fn simpson<F>(f: F, a: f64, b: f64, m: usize) -> Result<f64>
where
    F: Fn(f64) -> Result<f64>,
{
    if m == 0 {
        return Err(AnalysisError::InvalidInput);
    }

    let n = 2 * m;
    let h = (b - a) / n as f64;

    let mut sum = f(a)? + f(b)?;
    for i in 1..n {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f(a + i as f64 * h)?;
    }

    Ok(sum * h / 3.0)
}

/// Thickness of the layer between two pressure levels from the hypsometric equation.
///
/// Integrates `(Rd / g0) * Tv(p) / p` from `p_top` to `p_bottom` with [`simpson`], where the
/// virtual temperature comes from the temperature and dew point accessors.
pub fn hypsometric_thickness<T, Td>(
    p_bottom: HectoPascal,
    p_top: HectoPascal,
    f_t: T,
    f_td: Td,
    m: usize,
) -> Result<Meters>
where
    T: Fn(HectoPascal) -> Result<Celsius>,
    Td: Fn(HectoPascal) -> Result<Celsius>,
{
    let integrand = |p: f64| -> Result<f64> {
        let pressure = HectoPascal(p);
        let tv = virtual_temperature(f_t(pressure)?, f_td(pressure)?, pressure);

        Ok(RD / G0 * (tv.unpack() + 273.15) / p)
    };

    simpson(integrand, p_top.unpack(), p_bottom.unpack(), m).map(Meters)
}
