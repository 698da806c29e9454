use crate::{
    error::{AnalysisError, Result},
    profile::{Attribute, Level},
    wind::direction_speed,
};
use itertools::Itertools;
use metfor::{HectoPascal, Meters, MetersPSec, Quantity, WindUV};

/// Two pressures closer than this are the same level.
pub(crate) const PRESSURE_EPS: f64 = 1.0e-6;

// What kind of bracket is this?
enum BracketType<Y> {
    Bracket((f64, Y), (f64, Y)),
    EndEqual(Y),
}

/// Find the points bracketing `target` and interpolate between them.
///
/// Points may be ordered either way, but must be monotonic in x. A point that matches the target
/// exactly is returned as is, so stored values come back unchanged at their own coordinate.
fn bracket_interpolate<Y, I, F>(pnts: I, target: f64, lerp: F) -> Option<Y>
where
    Y: Copy,
    I: Iterator<Item = (f64, Y)> + Clone,
    F: Fn(f64, Y, Y) -> Y,
{
    let is_target = |x: f64| (x - target).abs() < PRESSURE_EPS;

    // A lone point has no pairs to look at.
    if pnts.clone().nth(1).is_none() {
        return pnts
            .clone()
            .next()
            .and_then(|(x, y)| if is_target(x) { Some(y) } else { None });
    }

    let make_bracket = |pnt_0: (f64, Y), pnt_1: (f64, Y)| -> Option<BracketType<Y>> {
        let (x0, y0) = pnt_0;
        let (x1, y1) = pnt_1;

        if is_target(x0) {
            Some(BracketType::EndEqual(y0))
        } else if is_target(x1) {
            Some(BracketType::EndEqual(y1))
        } else if (x0 < target && x1 > target) || (x0 > target && x1 < target) {
            Some(BracketType::Bracket(pnt_0, pnt_1))
        } else {
            None
        }
    };

    pnts.tuple_windows::<(_, _)>()
        .filter_map(|(pnt_0, pnt_1)| make_bracket(pnt_0, pnt_1))
        .nth(0)
        .map(|bracket| match bracket {
            BracketType::Bracket((x0, y0), (x1, y1)) => lerp((target - x0) / (x1 - x0), y0, y1),
            BracketType::EndEqual(y) => y,
        })
}

/// Straight line interpolation between two points.
#[inline]
pub(crate) fn linear_interp(x_val: f64, x1: f64, x2: f64, y1: f64, y2: f64) -> f64 {
    debug_assert!(x1 != x2);
    y1 + (x_val - x1) * (y2 - y1) / (x2 - x1)
}

#[inline]
fn lerp_scalar(w: f64, y0: f64, y1: f64) -> f64 {
    y0 + w * (y1 - y0)
}

#[inline]
fn lerp_uv(w: f64, uv0: (f64, f64), uv1: (f64, f64)) -> (f64, f64) {
    (lerp_scalar(w, uv0.0, uv1.0), lerp_scalar(w, uv0.1, uv1.1))
}

#[inline]
fn uv_tuple(uv: WindUV<MetersPSec>) -> (f64, f64) {
    (uv.u.unpack(), uv.v.unpack())
}

/// Fail unless `target` is between the lowest and highest pressures of `levels`, which must be
/// sorted by ascending pressure.
fn check_pressure_range(levels: &[Level], target: HectoPascal) -> Result<()> {
    let top = levels
        .first()
        .and_then(|lvl| lvl.pressure.into_option())
        .ok_or(AnalysisError::NotEnoughData)?;
    let bottom = levels
        .last()
        .and_then(|lvl| lvl.pressure.into_option())
        .ok_or(AnalysisError::NotEnoughData)?;

    let tgt = target.unpack();
    if !tgt.is_finite() || tgt < top.unpack() - PRESSURE_EPS || tgt > bottom.unpack() + PRESSURE_EPS
    {
        return Err(AnalysisError::PressureOutOfRange(tgt));
    }

    Ok(())
}

/// Interpolate an attribute linearly in pressure.
///
/// Only levels where the attribute is present take part, so a gap in one column does not hide
/// the others. Wind direction and speed are interpolated through their components.
pub(crate) fn value_at(levels: &[Level], target: HectoPascal, attr: Attribute) -> Result<f64> {
    check_pressure_range(levels, target)?;

    let tgt = target.unpack();
    let pnts = levels.iter().filter_map(|lvl| {
        lvl.pressure
            .into_option()
            .and_then(|p| lvl.get(attr).map(|val| (p.unpack(), val)))
    });

    match attr {
        Attribute::WindDirection | Attribute::WindSpeed => {
            if let Some((_, val)) = pnts.clone().find(|(p, _)| (p - tgt).abs() < PRESSURE_EPS) {
                return Ok(val);
            }

            let (dir, spd) = direction_speed(wind_at_pressure(levels, target)?);
            if attr == Attribute::WindDirection {
                Ok(dir)
            } else {
                Ok(spd.unpack() * 3.6)
            }
        }
        _ => bracket_interpolate(pnts, tgt, lerp_scalar).ok_or(AnalysisError::MissingValue),
    }
}

/// Interpolate the wind linearly in pressure, component by component.
pub(crate) fn wind_at_pressure(levels: &[Level], target: HectoPascal) -> Result<WindUV<MetersPSec>> {
    check_pressure_range(levels, target)?;

    let pnts = levels.iter().filter_map(|lvl| {
        lvl.pressure
            .into_option()
            .and_then(|p| lvl.wind().map(|uv| (p.unpack(), uv_tuple(uv))))
    });

    bracket_interpolate(pnts, target.unpack(), lerp_uv)
        .map(|(u, v)| WindUV {
            u: MetersPSec(u),
            v: MetersPSec(v),
        })
        .ok_or(AnalysisError::MissingValue)
}

/// Interpolate the wind linearly in height, component by component.
pub(crate) fn wind_at_height(levels: &[Level], target: Meters) -> Result<WindUV<MetersPSec>> {
    let pnts = levels.iter().filter_map(|lvl| {
        lvl.height
            .into_option()
            .and_then(|h| lvl.wind().map(|uv| (h.unpack(), uv_tuple(uv))))
    });

    if pnts.clone().next().is_none() {
        return Err(AnalysisError::NotEnoughData);
    }

    bracket_interpolate(pnts, target.unpack(), lerp_uv)
        .map(|(u, v)| WindUV {
            u: MetersPSec(u),
            v: MetersPSec(v),
        })
        .ok_or(AnalysisError::HeightOutOfRange(target.unpack()))
}

/// Interpolate a stored level's attributes to a point a fraction `w` of the way from `a` to `b`.
///
/// `w` outside of `[0, 1]` extrapolates, e.g. `w = -1` gives `2a - b`. Any attribute missing
/// from either level is missing in the result.
pub(crate) fn blend_levels(a: &Level, b: &Level, w: f64) -> [Option<f64>; 6] {
    let scalar = |attr: Attribute| -> Option<f64> {
        a.get(attr)
            .and_then(|va| b.get(attr).map(|vb| lerp_scalar(w, va, vb)))
    };

    let (dir, spd) = match (a.wind(), b.wind()) {
        (Some(wa), Some(wb)) => {
            let (u, v) = lerp_uv(w, uv_tuple(wa), uv_tuple(wb));
            let (dir, spd) = direction_speed(WindUV {
                u: MetersPSec(u),
                v: MetersPSec(v),
            });
            (Some(dir), Some(spd.unpack() * 3.6))
        }
        _ => (None, None),
    };

    [
        scalar(Attribute::Pressure),
        scalar(Attribute::Height),
        scalar(Attribute::Temperature),
        scalar(Attribute::DewPoint),
        dir,
        spd,
    ]
}
