//! Indexes that are specific to a sounding, but not a particular parcel analysis of that sounding.
//!
//! The simple stability indexes read the profile only at mandatory levels. They take the
//! temperature, dew point, height, or wind accessors directly so they can be evaluated against
//! any profile, including analytic ones.
use crate::{
    accessors::Bounds,
    config::AnalysisConfig,
    error::Result,
    integrate::simpson,
    parcel::Parcel,
    thermo::{mixing_ratio, G0},
};
use metfor::{Celsius, HectoPascal, IntHelicityM2pS2, JpKg, Meters, MetersPSec, Mm, Quantity};

const KMH_PER_KNOT: f64 = 1.852;

// Values at a mandatory level, unpacked.
#[inline]
fn at<F, T>(f: &F, p: f64) -> Result<f64>
where
    F: Fn(HectoPascal) -> Result<T>,
    T: Quantity,
{
    f(HectoPascal(p)).map(|val| val.unpack())
}

/// The K-Index, `T850 + Td850 + Td700 - T700 - T500`.
pub fn k_index<T, Td>(f_t: T, f_td: Td) -> Result<f64>
where
    T: Fn(HectoPascal) -> Result<Celsius>,
    Td: Fn(HectoPascal) -> Result<Celsius>,
{
    let t850 = at(&f_t, 850.0)?;
    let td850 = at(&f_td, 850.0)?;
    let t700 = at(&f_t, 700.0)?;
    let td700 = at(&f_td, 700.0)?;
    let t500 = at(&f_t, 500.0)?;

    Ok(t850 + td850 + td700 - t700 - t500)
}

/// Total Totals, `T850 + Td850 - 2 T500`.
pub fn total_totals<T, Td>(f_t: T, f_td: Td) -> Result<f64>
where
    T: Fn(HectoPascal) -> Result<Celsius>,
    Td: Fn(HectoPascal) -> Result<Celsius>,
{
    let t850 = at(&f_t, 850.0)?;
    let td850 = at(&f_td, 850.0)?;
    let t500 = at(&f_t, 500.0)?;

    Ok(t850 + td850 - 2.0 * t500)
}

/// Vertical Totals, `T850 - T500`.
pub fn vertical_totals<T>(f_t: T) -> Result<f64>
where
    T: Fn(HectoPascal) -> Result<Celsius>,
{
    Ok(at(&f_t, 850.0)? - at(&f_t, 500.0)?)
}

/// Cross Totals, `Td850 - T500`.
pub fn cross_totals<T, Td>(f_t: T, f_td: Td) -> Result<f64>
where
    T: Fn(HectoPascal) -> Result<Celsius>,
    Td: Fn(HectoPascal) -> Result<Celsius>,
{
    Ok(at(&f_td, 850.0)? - at(&f_t, 500.0)?)
}

/// Severe Weather Threat index.
///
/// `12 Td850 + 20 (TT - 49) + 2 f850 + f500 + 125 (sin(d500 - d850) + 0.2)` with wind speeds in
/// knots. Negative dew point and Total Totals terms are dropped, and the shear term only counts
/// for veering winds of at least 15 knots at both levels, from 130-250 degrees at 850 hPa and
/// 210-310 degrees at 500 hPa.
pub fn sweat<T, Td, S, D>(f_t: T, f_td: Td, f_spd: S, f_dir: D) -> Result<f64>
where
    T: Fn(HectoPascal) -> Result<Celsius>,
    Td: Fn(HectoPascal) -> Result<Celsius>,
    S: Fn(HectoPascal) -> Result<f64>,
    D: Fn(HectoPascal) -> Result<f64>,
{
    let td850 = at(&f_td, 850.0)?;
    let tt = total_totals(&f_t, &f_td)?;

    let f850 = f_spd(HectoPascal(850.0))? / KMH_PER_KNOT;
    let f500 = f_spd(HectoPascal(500.0))? / KMH_PER_KNOT;
    let d850 = f_dir(HectoPascal(850.0))?;
    let d500 = f_dir(HectoPascal(500.0))?;

    let moisture_term = 12.0 * td850.max(0.0);
    let tt_term = 20.0 * (tt - 49.0).max(0.0);
    let wind_term = 2.0 * f850 + f500;

    let veering = (130.0..=250.0).contains(&d850)
        && (210.0..=310.0).contains(&d500)
        && d500 - d850 > 0.0
        && f850 >= 15.0
        && f500 >= 15.0;
    let shear_term = if veering {
        125.0 * ((d500 - d850).to_radians().sin() + 0.2)
    } else {
        0.0
    };

    Ok(moisture_term + tt_term + wind_term + shear_term)
}

/// The Boyden index, `0.1 (Z700 - Z1000) - T700 - 200`.
pub fn boyden<T, Z>(f_t: T, f_z: Z) -> Result<f64>
where
    T: Fn(HectoPascal) -> Result<Celsius>,
    Z: Fn(HectoPascal) -> Result<Meters>,
{
    let z700 = at(&f_z, 700.0)?;
    let z1000 = at(&f_z, 1000.0)?;
    let t700 = at(&f_t, 700.0)?;

    Ok(0.1 * (z700 - z1000) - t700 - 200.0)
}

/// Precipitable water (mm)
///
/// The mixing ratio is integrated over pressure from the top of the profile to the surface.
pub fn precipitable_water<Td>(f_td: Td, bounds: &Bounds, config: &AnalysisConfig) -> Result<Mm>
where
    Td: Fn(HectoPascal) -> Result<Celsius>,
{
    let integrated_mw = simpson(
        |p| f_td(HectoPascal(p)).map(|td| mixing_ratio(td, HectoPascal(p))),
        bounds.top_pressure.unpack(),
        bounds.surface_pressure.unpack(),
        config.precipitable_water_subintervals,
    )?;

    Ok(Mm(0.1 / G0 * integrated_mw))
}

/// The lifted index, the virtual temperature of `parcel` lifted to 500 hPa minus the
/// environmental temperature at 500 hPa. Positive values mean a parcel warmer than its
/// surroundings.
pub fn lifted_index<T>(parcel: &Parcel, f_t: T, config: &AnalysisConfig) -> Result<f64>
where
    T: Fn(HectoPascal) -> Result<Celsius>,
{
    let target = HectoPascal(500.0);
    let env_t = at(&f_t, 500.0)?;
    let pcl_vt = parcel.virtual_temperature_at(target, config.parcel_step)?;

    Ok(pcl_vt.unpack() - env_t)
}

/// The Showalter index, the lifted index of a parcel starting at 850 hPa.
pub fn showalter<T, Td>(f_t: T, f_td: Td, config: &AnalysisConfig) -> Result<f64>
where
    T: Fn(HectoPascal) -> Result<Celsius>,
    Td: Fn(HectoPascal) -> Result<Celsius>,
{
    let pressure = HectoPascal(850.0);
    let parcel = Parcel {
        pressure,
        temperature: f_t(pressure)?,
        dew_point: f_td(pressure)?,
    };

    lifted_index(&parcel, f_t, config)
}

/// Energy Helicity Index, `CAPE * SRH / 160,000`.
#[inline]
pub fn energy_helicity_index(cape: JpKg, srh: IntHelicityM2pS2) -> f64 {
    cape.unpack() * srh.unpack() / 160_000.0
}

/// Supercell Composite Parameter.
///
/// `(muCAPE / 1000) (ESRH / 50) (EBWD term)`, where the bulk wind difference term is 0 below
/// 10 m/s, 1 above 20 m/s, and `EBWD / 20` in between.
pub fn supercell_composite(mu_cape: JpKg, esrh: IntHelicityM2pS2, ebwd: MetersPSec) -> f64 {
    let ebwd = ebwd.unpack();
    let shear_term = if ebwd < 10.0 {
        0.0
    } else if ebwd > 20.0 {
        1.0
    } else {
        ebwd / 20.0
    };

    mu_cape.unpack() / 1000.0 * esrh.unpack() / 50.0 * shear_term
}

/// Fixed layer Significant Tornado Parameter.
///
/// `(sbCAPE / 1500) (LCL term) (SRH1 / 150) (shear term)`. The LCL term is 1 below 1000 m AGL,
/// 0 above 2000 m, and `(2000 - LCL) / 1000` in between. The shear term uses the 0-6 km bulk
/// shear, 0 below 12.5 m/s, 1.5 above 30 m/s, and `shear / 20` in between.
pub fn significant_tornado(
    sb_cape: JpKg,
    lcl_height_agl: Meters,
    srh_1km: IntHelicityM2pS2,
    shear_6km: MetersPSec,
) -> f64 {
    let lcl = lcl_height_agl.unpack();
    let lcl_term = if lcl < 1000.0 {
        1.0
    } else if lcl > 2000.0 {
        0.0
    } else {
        (2000.0 - lcl) / 1000.0
    };

    let shear = shear_6km.unpack();
    let shear_term = if shear < 12.5 {
        0.0
    } else if shear > 30.0 {
        1.5
    } else {
        shear / 20.0
    };

    sb_cape.unpack() / 1500.0 * lcl_term * srh_1km.unpack() / 150.0 * shear_term
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::AnalysisError, parcel::surface_parcel, test_data, thermo::vapor_pressure};
    use approx::assert_abs_diff_eq;

    fn table(p: HectoPascal, rows: &[(f64, f64)]) -> Result<f64> {
        rows.iter()
            .find(|(rp, _)| (*rp - p.unpack()).abs() < 1.0e-9)
            .map(|&(_, val)| val)
            .ok_or(AnalysisError::PressureOutOfRange(p.unpack()))
    }

    #[test]
    fn test_k_index_scenario() {
        let snd = test_data::k_index_scenario().snapshot();
        let acc = snd.accessors().unwrap();

        let k = k_index(&acc.temperature, &acc.dew_point).unwrap();
        assert_abs_diff_eq!(k, 20.0);

        assert_abs_diff_eq!(
            total_totals(&acc.temperature, &acc.dew_point).unwrap(),
            45.0
        );
        assert_abs_diff_eq!(vertical_totals(&acc.temperature).unwrap(), 25.0);
        assert_abs_diff_eq!(cross_totals(&acc.temperature, &acc.dew_point).unwrap(), 20.0);
    }

    #[test]
    fn test_k_index_missing_level() {
        let f_t = |p: HectoPascal| table(p, &[(850.0, 15.0), (700.0, 5.0)]).map(Celsius);
        let f_td = |p: HectoPascal| table(p, &[(850.0, 10.0), (700.0, -10.0)]).map(Celsius);

        assert_eq!(
            k_index(f_t, f_td),
            Err(AnalysisError::PressureOutOfRange(500.0))
        );
    }

    #[test]
    fn test_sweat() {
        let f_t = |p: HectoPascal| table(p, &[(850.0, 20.0), (500.0, -15.0)]).map(Celsius);
        let f_td = |p: HectoPascal| table(p, &[(850.0, 16.0), (500.0, -30.0)]).map(Celsius);
        let f_spd = |p: HectoPascal| table(p, &[(850.0, 30.0 * 1.852), (500.0, 50.0 * 1.852)]);
        let f_dir = |p: HectoPascal| table(p, &[(850.0, 200.0), (500.0, 230.0)]);

        // TT = 20 + 16 + 30 = 66
        let expected = 12.0 * 16.0 + 20.0 * 17.0 + 60.0 + 50.0 + 125.0 * (0.5 + 0.2);
        let val = sweat(f_t, f_td, f_spd, f_dir).unwrap();
        assert_abs_diff_eq!(val, expected, epsilon = 1.0e-9);

        // Backing winds drop the shear term.
        let backing = |p: HectoPascal| table(p, &[(850.0, 240.0), (500.0, 220.0)]);
        let val = sweat(f_t, f_td, f_spd, backing).unwrap();
        assert_abs_diff_eq!(val, 12.0 * 16.0 + 20.0 * 17.0 + 60.0 + 50.0, epsilon = 1.0e-9);
    }

    #[test]
    fn test_boyden() {
        let f_t = |p: HectoPascal| table(p, &[(700.0, 4.0)]).map(Celsius);
        let f_z = |p: HectoPascal| table(p, &[(1000.0, 100.0), (700.0, 3100.0)]).map(Meters);

        assert_abs_diff_eq!(boyden(f_t, f_z).unwrap(), 96.0, epsilon = 1.0e-9);
    }

    #[test]
    fn test_precipitable_water() {
        let config = AnalysisConfig::default();
        let bounds = Bounds {
            top_pressure: HectoPascal(300.0),
            surface_pressure: HectoPascal(1000.0),
            surface_height: Some(Meters(0.0)),
        };

        let dry = precipitable_water(|_p| Ok(Celsius(-60.0)), &bounds, &config).unwrap();
        assert!(dry.unpack() < 1.0);

        // With a constant dew point the vapor pressure is constant, and the integral of the
        // mixing ratio 621.97 e / (p - e) has a closed form.
        let td = Celsius(15.0);
        let e = vapor_pressure(td).unpack();
        let expected = 0.1 / G0 * 621.97 * e * ((1000.0 - e) / (300.0 - e)).ln();

        let moist = precipitable_water(|_p| Ok(td), &bounds, &config).unwrap();
        assert_abs_diff_eq!(moist.unpack(), expected, epsilon = 1.0e-4);
        assert!(moist.unpack() > 130.0 && moist.unpack() < 140.0);
    }

    #[test]
    fn test_lifted_index_and_showalter() {
        let config = AnalysisConfig::default();

        let snd = test_data::standard().snapshot();
        let acc = snd.accessors().unwrap();
        let pcl = surface_parcel(&acc).unwrap();
        let li = lifted_index(&pcl, &acc.temperature, &config).unwrap();
        assert!(li > 3.0);

        // Parcel minus environment.
        let pcl_vt = pcl
            .virtual_temperature_at(HectoPascal(500.0), config.parcel_step)
            .unwrap();
        let env_t = (acc.temperature)(HectoPascal(500.0)).unwrap();
        assert_abs_diff_eq!(li, pcl_vt.unpack() - env_t.unpack(), epsilon = 1.0e-12);
        assert!(showalter(&acc.temperature, &acc.dew_point, &config).is_ok());

        let snd = test_data::isothermal().snapshot();
        let acc = snd.accessors().unwrap();
        let pcl = surface_parcel(&acc).unwrap();
        assert!(lifted_index(&pcl, &acc.temperature, &config).unwrap() < 0.0);
    }

    #[test]
    fn test_composites() {
        assert_abs_diff_eq!(
            energy_helicity_index(JpKg(2000.0), IntHelicityM2pS2(200.0)),
            2.5
        );

        let scp = supercell_composite(JpKg(2000.0), IntHelicityM2pS2(100.0), MetersPSec(25.0));
        assert_abs_diff_eq!(scp, 4.0);
        let scp = supercell_composite(JpKg(2000.0), IntHelicityM2pS2(100.0), MetersPSec(15.0));
        assert_abs_diff_eq!(scp, 3.0);
        let scp = supercell_composite(JpKg(2000.0), IntHelicityM2pS2(100.0), MetersPSec(5.0));
        assert_abs_diff_eq!(scp, 0.0);

        let stp = significant_tornado(
            JpKg(1500.0),
            Meters(800.0),
            IntHelicityM2pS2(150.0),
            MetersPSec(20.0),
        );
        assert_abs_diff_eq!(stp, 1.0);
        let stp = significant_tornado(
            JpKg(1500.0),
            Meters(1500.0),
            IntHelicityM2pS2(150.0),
            MetersPSec(40.0),
        );
        assert_abs_diff_eq!(stp, 0.75);
        let stp = significant_tornado(
            JpKg(3000.0),
            Meters(2500.0),
            IntHelicityM2pS2(300.0),
            MetersPSec(40.0),
        );
        assert_abs_diff_eq!(stp, 0.0);
    }
}
