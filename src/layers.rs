//! Layers found by scanning a profile, currently the effective inflow layer.
use crate::{
    accessors::Accessors,
    config::AnalysisConfig,
    error::Result,
    integrate::hypsometric_thickness,
    parcel::{parcel_at, pressure_scan},
    parcel_profile::lift_parcel,
};
use itertools::Itertools;
use metfor::{Celsius, HectoPascal, Meters, Quantity};
use tracing::debug;

/// A layer in the atmosphere described by the pressures at the top and bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    /// Pressure at the bottom of the layer.
    pub bottom: HectoPascal,
    /// Pressure at the top of the layer.
    pub top: HectoPascal,
}

impl Layer {
    /// Get the height thickness from the hypsometric equation.
    pub fn thickness<T, Td>(&self, f_t: T, f_td: Td, m: usize) -> Result<Meters>
    where
        T: Fn(HectoPascal) -> Result<Celsius>,
        Td: Fn(HectoPascal) -> Result<Celsius>,
    {
        hypsometric_thickness(self.bottom, self.top, f_t, f_td, m)
    }

    /// Get the pressure thickness.
    pub fn pressure_thickness(&self) -> f64 {
        self.bottom.unpack() - self.top.unpack()
    }
}

/// All layers where a parcel lifted from each level has enough CAPE with little enough CIN.
///
/// The profile is scanned from the surface to the top in steps of `scan_step`, and each run of
/// consecutive qualifying levels makes a layer. A level qualifies when its CAPE is greater than
/// `inflow_min_cape` and its CIN is greater than `inflow_min_cin`. A level where the parcel cannot
/// be lifted does not qualify.
pub fn effective_inflow_layers(acc: &Accessors, config: &AnalysisConfig) -> Result<Vec<Layer>> {
    let levels: Vec<(HectoPascal, bool)> = pressure_scan(
        acc.bounds.surface_pressure,
        acc.bounds.top_pressure,
        config.scan_step,
    )?
    // Lift a parcel from every level and check its CAPE and CIN against the thresholds
    .map(|p| {
        let qualifies = parcel_at(p, acc)
            .and_then(|pcl| lift_parcel(pcl, acc, config))
            .map(|anal| {
                anal.cape().unpack() > config.inflow_min_cape
                    && anal.cin().unpack() > config.inflow_min_cin
            })
            .unwrap_or_else(|err| {
                debug!(pressure = p.unpack(), error = %err, "no inflow parcel");
                false
            });

        (p, qualifies)
    })
    .collect();

    let layers: Vec<Layer> = levels
        .into_iter()
        .group_by(|&(_, qualifies)| qualifies)
        .into_iter()
        // Only keep the runs that meet the criteria
        .filter(|(qualifies, _)| *qualifies)
        // Runs are bottom up, so the first is the bottom and the last is the top
        .filter_map(|(_, mut run)| {
            let (bottom, _) = run.next()?;
            let top = run.last().map(|(p, _)| p).unwrap_or(bottom);
            Some(Layer { bottom, top })
        })
        .collect();

    debug!(count = layers.len(), "effective inflow layers");
    Ok(layers)
}

/// The effective inflow layer, the thickest of the [`effective_inflow_layers`].
///
/// Ties go to the lowest layer. `None` if no level qualifies.
pub fn effective_inflow_layer(acc: &Accessors, config: &AnalysisConfig) -> Result<Option<Layer>> {
    thickest_layer(
        effective_inflow_layers(acc, config)?,
        &acc.temperature,
        &acc.dew_point,
        config.step_subintervals,
    )
}

// The layer with the greatest hypsometric thickness, the first one wins ties.
fn thickest_layer<T, Td>(
    layers: impl IntoIterator<Item = Layer>,
    f_t: T,
    f_td: Td,
    m: usize,
) -> Result<Option<Layer>>
where
    T: Fn(HectoPascal) -> Result<Celsius>,
    Td: Fn(HectoPascal) -> Result<Celsius>,
{
    let mut thickest: Option<(Layer, f64)> = None;

    for layer in layers {
        let dz = layer.thickness(&f_t, &f_td, m)?.unpack();

        if thickest.map_or(true, |(_, max_dz)| dz > max_dz) {
            thickest = Some((layer, dz));
        }
    }

    Ok(thickest.map(|(layer, _)| layer))
}
