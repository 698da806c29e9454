//! Create and analyze a profile from lifting a parcel.
use crate::{
    accessors::Accessors,
    config::AnalysisConfig,
    error::{AnalysisError, Result},
    integrate::hypsometric_thickness,
    interpolation::{linear_interp, PRESSURE_EPS},
    parcel::Parcel,
    thermo::{lcl_temperature, G0},
};
use metfor::{Celsius, HectoPascal, JpKg, Meters, Quantity};
use tracing::trace;

/// Hold profiles for a parcel and it's environment.
#[derive(Debug, Clone, Default)]
pub struct ParcelProfile {
    /// Pressure profile
    pub pressure: Vec<HectoPascal>,
    /// Parcel virtual temperature profile
    pub parcel_t: Vec<Celsius>,
    /// Environment virtual temperature profile
    pub environment_t: Vec<Celsius>,
}

/// Parcel analysis, this is a way to package the analysis of a parcel.
///
/// These are done by converting the profiles to virtual temperature. It is assumed the reason for
/// lifting the parcel and doing the analysis is related to bouyancy and some kind of convection
/// or stability analysis.
#[derive(Debug, Clone)]
pub struct ParcelAscentAnalysis {
    // The orginal parcel and profile
    parcel: Parcel,
    profile: ParcelProfile,

    // Indicies from analysis
    cape: JpKg,
    cin: JpKg,
    lcl_pressure: HectoPascal,             // plotting on skew-t
    lcl_temperature: Celsius,              // ice or ice/water cloud?
    lcl_height_agl: Option<Meters>,        // cloud base for aviation
    lfc_pressure: Option<HectoPascal>,     // plotting on skew-t
    el_pressure: Option<HectoPascal>,      // plotting on skew-t
}

impl ParcelAscentAnalysis {
    /// Get the CAPE.
    pub fn cape(&self) -> JpKg {
        self.cape
    }

    /// Get the CIN.
    pub fn cin(&self) -> JpKg {
        self.cin
    }

    /// Get the LCL pressure level.
    pub fn lcl_pressure(&self) -> HectoPascal {
        self.lcl_pressure
    }

    /// Get the temperature at the LCL.
    pub fn lcl_temperature(&self) -> Celsius {
        self.lcl_temperature
    }

    /// Get the LCL height AGL.
    pub fn lcl_height_agl(&self) -> Option<Meters> {
        self.lcl_height_agl
    }

    /// Get the pressure at the LFC.
    pub fn lfc_pressure(&self) -> Option<HectoPascal> {
        self.lfc_pressure
    }

    /// Get the pressure at the equilibrium level.
    pub fn el_pressure(&self) -> Option<HectoPascal> {
        self.el_pressure
    }

    /// Retrieve the parcel's profile
    #[inline]
    pub fn profile(&self) -> &ParcelProfile {
        &self.profile
    }

    /// Retrieve the original parcel.
    #[inline]
    pub fn parcel(&self) -> &Parcel {
        &self.parcel
    }
}

/// Running sums of positive and negative buoyant energy.
///
/// Negative energy is held back until positive energy is found above it, so negative area above
/// the last buoyant layer never counts as CIN.
#[derive(Debug, Clone, Copy, Default)]
struct EnergyAccumulator {
    cape: f64,
    cin: f64,
    pending: f64,
}

impl EnergyAccumulator {
    fn add(&mut self, energy: f64) {
        if energy > 0.0 {
            self.cape += energy;
            self.cin += self.pending;
            self.pending = 0.0;
        } else {
            self.pending += energy;
        }
    }
}

// Buoyancy of the parcel relative to the environment in m/s^2.
#[inline]
fn buoyancy(parcel_vt: Celsius, env_vt: Celsius) -> f64 {
    let env_k = env_vt.unpack() + 273.15;
    G0 * (parcel_vt.unpack() + 273.15 - env_k) / env_k
}

/// Lift a parcel for a convective parcel analysis.
///
/// The parcel is lifted on a fixed pressure grid from its own level to the top of the profile.
/// At every step the buoyancy is computed from the parcel and environment virtual temperatures,
/// and the energy of the step is the mean buoyancy of its ends times the hypsometric thickness of
/// the environment over the step. The LFC is the first level where the buoyancy turns positive
/// and the EL the last level where it turns negative, both interpolated linearly in pressure. A
/// parcel that regains buoyancy above its last negative crossing keeps that crossing as its EL.
pub fn lift_parcel(
    parcel: Parcel,
    acc: &Accessors,
    config: &AnalysisConfig,
) -> Result<ParcelAscentAnalysis> {
    let top = acc.bounds.top_pressure;
    if parcel.pressure.unpack() > acc.bounds.surface_pressure.unpack() + PRESSURE_EPS
        || parcel.pressure.unpack() < top.unpack() - PRESSURE_EPS
    {
        return Err(AnalysisError::PressureOutOfRange(parcel.pressure.unpack()));
    }

    let lcl_pressure = parcel.lcl_pressure()?;
    let lcl_temperature = Celsius::from(lcl_temperature(parcel.temperature, parcel.dew_point)?);
    let lcl_height_agl = acc.height_agl(lcl_pressure).ok();

    let mut profile = ParcelProfile::default();
    let mut energy = EnergyAccumulator::default();
    let mut lfc_pressure: Option<HectoPascal> = None;
    let mut el_pressure: Option<HectoPascal> = None;
    let mut prev: Option<(HectoPascal, f64)> = None;

    let ascent = parcel.lift(top, config.parcel_step)?;

    for (i, (p, t)) in ascent.enumerate() {
        // The first point is the parcel's own level.
        let pcl_vt = if i == 0 {
            parcel.virtual_temperature()
        } else {
            parcel.path_virtual_temperature((p, t))?
        };
        let env_vt = acc.virtual_temperature(p)?;
        let b = buoyancy(pcl_vt, env_vt);

        profile.pressure.push(p);
        profile.parcel_t.push(pcl_vt);
        profile.environment_t.push(env_vt);

        match prev {
            None => {
                if b > 0.0 {
                    lfc_pressure = Some(p);
                }
            }
            Some((p0, b0)) => {
                let dz = hypsometric_thickness(
                    p0,
                    p,
                    &acc.temperature,
                    &acc.dew_point,
                    config.step_subintervals,
                )?;
                energy.add(0.5 * (b0 + b) * dz.unpack());

                let crossing = || HectoPascal(linear_interp(0.0, b0, b, p0.unpack(), p.unpack()));
                if b0 <= 0.0 && b > 0.0 && lfc_pressure.is_none() {
                    lfc_pressure = Some(crossing());
                } else if b0 > 0.0 && b <= 0.0 {
                    el_pressure = Some(crossing());
                }
            }
        }

        prev = Some((p, b));
    }

    if profile.pressure.is_empty() {
        return Err(AnalysisError::NotEnoughData);
    }

    trace!(
        pressure = parcel.pressure.unpack(),
        cape = energy.cape,
        cin = energy.cin,
        "lifted parcel"
    );

    Ok(ParcelAscentAnalysis {
        parcel,
        profile,
        cape: JpKg(energy.cape),
        cin: JpKg(energy.cin),
        lcl_pressure,
        lcl_temperature,
        lcl_height_agl,
        lfc_pressure,
        el_pressure,
    })
}

/// Convective available potential energy and convective inhibition of a parcel.
pub fn cape_cin(parcel: Parcel, acc: &Accessors, config: &AnalysisConfig) -> Result<(JpKg, JpKg)> {
    let anal = lift_parcel(parcel, acc, config)?;
    Ok((anal.cape(), anal.cin()))
}
