//! Wind conversions, layer mean winds, shear, storm motion, and helicity.
use crate::{
    config::AnalysisConfig,
    error::{AnalysisError, Result},
    integrate::simpson,
};
use itertools::Itertools;
use metfor::{IntHelicityM2pS2, Meters, MetersPSec, Quantity, WindUV};

/// Convert a direction (degrees, the direction the wind blows from) and speed in km/h into
/// components in m/s.
#[inline]
pub fn wind_components(direction: f64, speed_kmh: f64) -> WindUV<MetersPSec> {
    let spd = speed_kmh / 3.6;
    let (sin, cos) = direction.to_radians().sin_cos();

    WindUV {
        u: MetersPSec(-spd * sin),
        v: MetersPSec(-spd * cos),
    }
}

/// Convert wind components into a direction in degrees, in `[0, 360)`, and a speed.
///
/// A calm wind has a direction of 0.
#[inline]
pub fn direction_speed(wind: WindUV<MetersPSec>) -> (f64, MetersPSec) {
    let (u, v) = (wind.u.unpack(), wind.v.unpack());
    let spd = u.hypot(v);

    if spd == 0.0 {
        return (0.0, MetersPSec(0.0));
    }

    let dir = (-u).atan2(-v).to_degrees();
    let dir = if dir < 0.0 { dir + 360.0 } else { dir };

    (dir, MetersPSec(spd))
}

/// Calculate the mean wind in a layer.
///
/// This is NOT the pressure weighted mean, each component is integrated over height with
/// Simpson's rule and divided by the depth of the layer.
pub fn mean_wind<W>(f_wind: W, bottom: Meters, top: Meters, m: usize) -> Result<WindUV<MetersPSec>>
where
    W: Fn(Meters) -> Result<WindUV<MetersPSec>>,
{
    let (z0, z1) = (bottom.unpack(), top.unpack());
    let depth = z1 - z0;
    if depth <= 0.0 {
        return Err(AnalysisError::InvalidInput);
    }

    let iu = simpson(|z| f_wind(Meters(z)).map(|w| w.u.unpack()), z0, z1, m)?;
    let iv = simpson(|z| f_wind(Meters(z)).map(|w| w.v.unpack()), z0, z1, m)?;

    Ok(WindUV {
        u: MetersPSec(iu / depth),
        v: MetersPSec(iv / depth),
    })
}

/// Magnitude of the vector difference between the winds at the top and bottom of a layer.
pub fn bulk_shear<W>(f_wind: W, bottom: Meters, top: Meters) -> Result<MetersPSec>
where
    W: Fn(Meters) -> Result<WindUV<MetersPSec>>,
{
    let WindUV { u: u0, v: v0 } = f_wind(bottom)?;
    let WindUV { u: u1, v: v1 } = f_wind(top)?;

    Ok(MetersPSec((u1 - u0).unpack().hypot((v1 - v0).unpack())))
}

/// Right and left mover supercell motions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StormMotion {
    /// Right moving supercell motion
    pub right: WindUV<MetersPSec>,
    /// Left moving supercell motion
    pub left: WindUV<MetersPSec>,
}

/// Calculate the super cell storm motion using the "id" method.
///
/// The mean wind of the lowest 6 km above the surface is deviated by `storm_deviation` m/s
/// perpendicular to the shear between the mean winds of the 5.5-6 km and 0-0.5 km layers.
pub fn bunkers_storm_motion<W>(
    f_wind: W,
    surface_height: Meters,
    config: &AnalysisConfig,
) -> Result<StormMotion>
where
    W: Fn(Meters) -> Result<WindUV<MetersPSec>>,
{
    let sfc = surface_height.unpack();
    let agl = |h: f64| Meters(sfc + h);
    let m = config.mean_wind_subintervals;

    let WindUV {
        u: mean_u,
        v: mean_v,
    } = mean_wind(&f_wind, agl(0.0), agl(6000.0), m)?;

    let bottom = mean_wind(&f_wind, agl(0.0), agl(500.0), m)?;
    let top = mean_wind(&f_wind, agl(5500.0), agl(6000.0), m)?;
    let (shear_u, shear_v) = (top.u - bottom.u, top.v - bottom.v);

    let shear = shear_u.unpack().hypot(shear_v.unpack());
    if shear == 0.0 {
        return Err(AnalysisError::Domain("no shear to deviate the storm motion from"));
    }

    let scale = config.storm_deviation / shear;
    let (delta_u, delta_v) = (shear_v * scale, -shear_u * scale);

    Ok(StormMotion {
        right: WindUV {
            u: mean_u + delta_u,
            v: mean_v + delta_v,
        },
        left: WindUV {
            u: mean_u - delta_u,
            v: mean_v - delta_v,
        },
    })
}

/// Storm relative helicity of a layer.
///
/// The hodograph is sampled at evenly spaced heights no more than `step` meters apart, and the
/// helicity is the discrete sum over consecutive pairs of storm relative winds.
pub fn sr_helicity<W>(
    f_wind: W,
    bottom: Meters,
    top: Meters,
    storm_motion: WindUV<MetersPSec>,
    step: f64,
) -> Result<IntHelicityM2pS2>
where
    W: Fn(Meters) -> Result<WindUV<MetersPSec>>,
{
    let (z0, z1) = (bottom.unpack(), top.unpack());
    if step.is_nan() || step <= 0.0 || z1 < z0 {
        return Err(AnalysisError::InvalidInput);
    }

    let n = ((z1 - z0) / step).ceil().max(1.0) as usize;
    let dz = (z1 - z0) / n as f64;
    let (cu, cv) = (storm_motion.u.unpack(), storm_motion.v.unpack());

    let winds: Vec<(f64, f64)> = (0..=n)
        // Evenly spaced heights through the layer
        .map(|k| Meters(z0 + k as f64 * dz))
        // Storm relative wind at each height
        .map(|z| f_wind(z).map(|w| (w.u.unpack() - cu, w.v.unpack() - cv)))
        .collect::<Result<_>>()?;

    let helicity = winds
        .iter()
        .tuple_windows::<(_, _)>()
        .map(|(&(u0, v0), &(u1, v1))| u1 * v0 - u0 * v1)
        .sum();

    Ok(IntHelicityM2pS2(helicity))
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_components() {
        let WindUV { u, v } = wind_components(270.0, 36.0);
        assert_abs_diff_eq!(u.unpack(), 10.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(v.unpack(), 0.0, epsilon = 1.0e-9);

        let WindUV { u, v } = wind_components(180.0, 36.0);
        assert_abs_diff_eq!(u.unpack(), 0.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(v.unpack(), 10.0, epsilon = 1.0e-9);

        let (dir, spd) = direction_speed(wind_components(225.0, 72.0));
        assert_abs_diff_eq!(dir, 225.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(spd.unpack(), 20.0, epsilon = 1.0e-9);

        let (dir, _) = direction_speed(wind_components(0.0, 10.0));
        assert!(dir < 1.0e-9 || (360.0 - dir) < 1.0e-9);

        assert_eq!(
            direction_speed(WindUV {
                u: MetersPSec(0.0),
                v: MetersPSec(0.0)
            }),
            (0.0, MetersPSec(0.0))
        );
    }

    fn linear_hodograph(z: Meters) -> Result<WindUV<MetersPSec>> {
        // Unidirectional westerly shear, 10 m/s per km.
        Ok(WindUV {
            u: MetersPSec(z.unpack() / 100.0),
            v: MetersPSec(0.0),
        })
    }

    fn veering_hodograph(z: Meters) -> Result<WindUV<MetersPSec>> {
        // Half circle turning clockwise from southerly to northerly through westerly.
        let angle = std::f64::consts::PI * z.unpack() / 3000.0;
        Ok(WindUV {
            u: MetersPSec(10.0 * angle.sin()),
            v: MetersPSec(10.0 * angle.cos()),
        })
    }

    #[test]
    fn test_mean_wind_and_shear() {
        let mean = mean_wind(linear_hodograph, Meters(0.0), Meters(6000.0), 10).unwrap();
        assert_abs_diff_eq!(mean.u.unpack(), 30.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(mean.v.unpack(), 0.0, epsilon = 1.0e-9);

        let shear = bulk_shear(linear_hodograph, Meters(0.0), Meters(6000.0)).unwrap();
        assert_abs_diff_eq!(shear.unpack(), 60.0, epsilon = 1.0e-9);

        assert!(mean_wind(linear_hodograph, Meters(10.0), Meters(10.0), 10).is_err());
    }

    #[test]
    fn test_bunkers_unidirectional() {
        let config = AnalysisConfig::default();
        let motion = bunkers_storm_motion(linear_hodograph, Meters(0.0), &config).unwrap();

        // Right mover deviates to the right of (south of) the westerly shear.
        assert_abs_diff_eq!(motion.right.u.unpack(), 30.0, epsilon = 1.0e-6);
        assert_abs_diff_eq!(motion.right.v.unpack(), -7.5, epsilon = 1.0e-6);
        assert_abs_diff_eq!(motion.left.v.unpack(), 7.5, epsilon = 1.0e-6);

        let calm = |_z: Meters| -> Result<WindUV<MetersPSec>> {
            Ok(WindUV {
                u: MetersPSec(5.0),
                v: MetersPSec(5.0),
            })
        };
        assert!(bunkers_storm_motion(calm, Meters(0.0), &config).is_err());
    }

    #[test]
    fn test_helicity() {
        let still = WindUV {
            u: MetersPSec(0.0),
            v: MetersPSec(0.0),
        };

        // Straight hodograph through the storm motion has no streamwise vorticity.
        let straight =
            sr_helicity(linear_hodograph, Meters(0.0), Meters(3000.0), still, 20.0).unwrap();
        assert_abs_diff_eq!(straight.unpack(), 0.0, epsilon = 1.0e-9);

        // Veering winds give positive helicity, twice the area swept by the hodograph.
        let veering =
            sr_helicity(veering_hodograph, Meters(0.0), Meters(3000.0), still, 20.0).unwrap();
        assert!(veering.unpack() > 0.0);
        assert_abs_diff_eq!(
            veering.unpack(),
            std::f64::consts::PI * 100.0,
            epsilon = 0.1
        );

        assert!(sr_helicity(veering_hodograph, Meters(0.0), Meters(3000.0), still, 0.0).is_err());
    }
}
