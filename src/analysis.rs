//! Data type and methods for building and describing an analysis.
//!
//! The battery evaluates every [`Index`] independently. An index that cannot be computed is kept
//! as [`IndexValue::Undefined`] with the error that stopped it, and the rest of the battery goes
//! on without it.
use std::{collections::BTreeMap, fmt};

use metfor::{IntHelicityM2pS2, Meters, MetersPSec, Quantity};
use strum::IntoEnumIterator;
use tracing::debug;

use crate::{
    accessors::Accessors,
    config::AnalysisConfig,
    error::{AnalysisError, Result},
    indexes::{
        boyden, cross_totals, energy_helicity_index, k_index, lifted_index, precipitable_water,
        showalter, significant_tornado, supercell_composite, sweat, total_totals, vertical_totals,
    },
    keys::Index,
    layers::{effective_inflow_layer, Layer},
    parcel::{mixed_layer_parcel, most_unstable_parcel, surface_parcel, Parcel},
    parcel_profile::{lift_parcel, ParcelAscentAnalysis},
    profile::ProfileSnapshot,
    wind::{bulk_shear, bunkers_storm_motion, direction_speed, sr_helicity, StormMotion},
};

/// The value of one index in an [`Analysis`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndexValue {
    /// The index was computed.
    Defined(f64),
    /// The index could not be computed, and this is why.
    Undefined(AnalysisError),
}

impl IndexValue {
    /// The value, if it is defined.
    pub fn value(&self) -> Option<f64> {
        match self {
            IndexValue::Defined(val) => Some(*val),
            IndexValue::Undefined(_) => None,
        }
    }

    /// Whether the index was computed.
    pub fn is_defined(&self) -> bool {
        matches!(self, IndexValue::Defined(_))
    }
}

impl From<Result<f64>> for IndexValue {
    fn from(res: Result<f64>) -> Self {
        match res {
            Ok(val) => IndexValue::Defined(val),
            Err(err) => IndexValue::Undefined(err),
        }
    }
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexValue::Defined(val) => fmt::Display::fmt(val, f),
            IndexValue::Undefined(_) => f.write_str("undefined"),
        }
    }
}

/// Convenient package for the full battery of indexes computed from one profile snapshot.
///
/// The parcel analyses, storm motion, and effective inflow layer are computed once and shared by
/// every index that depends on them. When one of them fails, every dependent index reports the
/// same error.
#[derive(Debug, Clone)]
pub struct Analysis {
    values: BTreeMap<Index, IndexValue>,

    // Shared intermediate results
    surface: Result<ParcelAscentAnalysis>,
    mixed_layer: Result<ParcelAscentAnalysis>,
    most_unstable: Result<ParcelAscentAnalysis>,
    storm_motion: Result<StormMotion>,
    effective_inflow: Result<Option<Layer>>,
}

impl Analysis {
    /// Run the battery on a snapshot.
    ///
    /// A snapshot too small to analyze still produces an analysis, with every index undefined.
    pub fn compute(snd: &ProfileSnapshot, config: &AnalysisConfig) -> Self {
        match snd.accessors() {
            Ok(acc) => Self::compute_with(&acc, config),
            Err(err) => Self::undefined(err),
        }
    }

    /// Run the battery on a set of accessors.
    pub fn compute_with(acc: &Accessors, config: &AnalysisConfig) -> Self {
        let battery = Battery::new(acc, config);

        let values = Index::iter()
            .map(|idx| {
                let val = IndexValue::from(battery.index(idx));
                if let IndexValue::Undefined(err) = val {
                    debug!(index = %idx, error = %err, "index undefined");
                }
                (idx, val)
            })
            .collect();

        Analysis {
            values,
            surface: battery.surface,
            mixed_layer: battery.mixed_layer,
            most_unstable: battery.most_unstable,
            storm_motion: battery.storm_motion,
            effective_inflow: battery.effective_inflow,
        }
    }

    fn undefined(err: AnalysisError) -> Self {
        debug!(error = %err, "profile cannot be analyzed");

        Analysis {
            values: Index::iter()
                .map(|idx| (idx, IndexValue::Undefined(err)))
                .collect(),
            surface: Err(err),
            mixed_layer: Err(err),
            most_unstable: Err(err),
            storm_motion: Err(err),
            effective_inflow: Err(err),
        }
    }

    /// Get the value of an index.
    pub fn get(&self, idx: Index) -> IndexValue {
        self.values
            .get(&idx)
            .copied()
            .unwrap_or(IndexValue::Undefined(AnalysisError::MissingValue))
    }

    /// Get the value of an index if it is defined.
    pub fn value(&self, idx: Index) -> Option<f64> {
        self.get(idx).value()
    }

    /// Iterate over every index in the battery, in the order of [`Index`].
    pub fn iter(&self) -> impl Iterator<Item = (Index, IndexValue)> + '_ {
        self.values.iter().map(|(idx, val)| (*idx, *val))
    }

    /// The analysis of the surface parcel.
    pub fn surface_parcel_analysis(&self) -> Result<&ParcelAscentAnalysis> {
        shared(&self.surface)
    }

    /// The analysis of the mixed layer parcel.
    pub fn mixed_layer_parcel_analysis(&self) -> Result<&ParcelAscentAnalysis> {
        shared(&self.mixed_layer)
    }

    /// The analysis of the most unstable parcel.
    pub fn most_unstable_parcel_analysis(&self) -> Result<&ParcelAscentAnalysis> {
        shared(&self.most_unstable)
    }

    /// The Bunkers storm motions.
    pub fn storm_motion(&self) -> Result<StormMotion> {
        shared(&self.storm_motion).map(|sm| *sm)
    }

    /// The effective inflow layer, `None` if no level qualifies.
    pub fn effective_inflow_layer(&self) -> Result<Option<Layer>> {
        shared(&self.effective_inflow).map(|layer| *layer)
    }
}

#[inline]
fn shared<T>(res: &Result<T>) -> Result<&T> {
    res.as_ref().map_err(|err| *err)
}

#[inline]
fn above(h: Meters, dz: f64) -> Meters {
    Meters(h.unpack() + dz)
}

// Everything needed to evaluate a single index.
struct Battery<'a, 'b> {
    acc: &'a Accessors<'b>,
    config: &'a AnalysisConfig,

    surface: Result<ParcelAscentAnalysis>,
    mixed_layer: Result<ParcelAscentAnalysis>,
    most_unstable: Result<ParcelAscentAnalysis>,
    storm_motion: Result<StormMotion>,
    effective_inflow: Result<Option<Layer>>,
}

impl<'a, 'b> Battery<'a, 'b> {
    fn new(acc: &'a Accessors<'b>, config: &'a AnalysisConfig) -> Self {
        let lift = |pcl: Parcel| lift_parcel(pcl, acc, config);

        let surface = surface_parcel(acc).and_then(lift);
        let mixed_layer = mixed_layer_parcel(acc, config).and_then(lift);
        let most_unstable = most_unstable_parcel(acc, config).and_then(lift);
        let storm_motion = acc
            .bounds
            .surface_height()
            .and_then(|sfc| bunkers_storm_motion(&acc.wind, sfc, config));
        let effective_inflow = effective_inflow_layer(acc, config);

        Battery {
            acc,
            config,
            surface,
            mixed_layer,
            most_unstable,
            storm_motion,
            effective_inflow,
        }
    }

    fn index(&self, idx: Index) -> Result<f64> {
        use crate::keys::Index::*;

        let acc = self.acc;
        let config = self.config;

        match idx {
            SurfaceCape => Ok(shared(&self.surface)?.cape().unpack()),
            SurfaceCin => Ok(shared(&self.surface)?.cin().unpack()),
            SurfaceLclPressure => Ok(shared(&self.surface)?.lcl_pressure().unpack()),
            SurfaceLclHeight => shared(&self.surface)?
                .lcl_height_agl()
                .map(|h| h.unpack())
                .ok_or(AnalysisError::MissingValue),
            SurfaceLfcPressure => shared(&self.surface)?
                .lfc_pressure()
                .map(|p| p.unpack())
                .ok_or(AnalysisError::MissingValue),
            SurfaceElPressure => shared(&self.surface)?
                .el_pressure()
                .map(|p| p.unpack())
                .ok_or(AnalysisError::MissingValue),
            MixedLayerCape => Ok(shared(&self.mixed_layer)?.cape().unpack()),
            MixedLayerCin => Ok(shared(&self.mixed_layer)?.cin().unpack()),
            MostUnstablePressure => Ok(shared(&self.most_unstable)?.parcel().pressure.unpack()),
            MostUnstableCape => Ok(shared(&self.most_unstable)?.cape().unpack()),
            MostUnstableCin => Ok(shared(&self.most_unstable)?.cin().unpack()),
            LiftedIndex => lifted_index(&surface_parcel(acc)?, &acc.temperature, config),
            Showalter => showalter(&acc.temperature, &acc.dew_point, config),
            KIndex => k_index(&acc.temperature, &acc.dew_point),
            TotalTotals => total_totals(&acc.temperature, &acc.dew_point),
            VerticalTotals => vertical_totals(&acc.temperature),
            CrossTotals => cross_totals(&acc.temperature, &acc.dew_point),
            Sweat => sweat(
                &acc.temperature,
                &acc.dew_point,
                &acc.wind_speed,
                &acc.wind_direction,
            ),
            Boyden => boyden(&acc.temperature, &acc.height),
            PrecipitableWater => {
                precipitable_water(&acc.dew_point, &acc.bounds, config).map(|pw| pw.unpack())
            }
            BulkShear1km => self.fixed_layer_shear(1000.0).map(|v| v.unpack()),
            BulkShear6km => self.fixed_layer_shear(6000.0).map(|v| v.unpack()),
            EffectiveBulkShear => self.effective_bulk_shear().map(|v| v.unpack()),
            Srh1km => self.fixed_layer_helicity(1000.0).map(|v| v.unpack()),
            Srh3km => self.fixed_layer_helicity(3000.0).map(|v| v.unpack()),
            EffectiveSrh => self.effective_helicity().map(|v| v.unpack()),
            Ehi1km => {
                let cape = shared(&self.surface)?.cape();
                let srh = self.fixed_layer_helicity(1000.0)?;
                Ok(energy_helicity_index(cape, srh))
            }
            Ehi3km => {
                let cape = shared(&self.surface)?.cape();
                let srh = self.fixed_layer_helicity(3000.0)?;
                Ok(energy_helicity_index(cape, srh))
            }
            Scp => {
                let cape = shared(&self.most_unstable)?.cape();
                let esrh = self.effective_helicity()?;
                let ebwd = self.effective_bulk_shear()?;
                Ok(supercell_composite(cape, esrh, ebwd))
            }
            Stp => {
                let sb = shared(&self.surface)?;
                let lcl = sb.lcl_height_agl().ok_or(AnalysisError::MissingValue)?;
                let srh = self.fixed_layer_helicity(1000.0)?;
                let shear = self.fixed_layer_shear(6000.0)?;
                Ok(significant_tornado(sb.cape(), lcl, srh, shear))
            }
            EffectiveInflowBottom => Ok(self.inflow_layer()?.bottom.unpack()),
            EffectiveInflowTop => Ok(self.inflow_layer()?.top.unpack()),
            BunkersRightDirection => Ok(direction_speed(shared(&self.storm_motion)?.right).0),
            BunkersRightSpeed => Ok(direction_speed(shared(&self.storm_motion)?.right)
                .1
                .unpack()),
            BunkersLeftDirection => Ok(direction_speed(shared(&self.storm_motion)?.left).0),
            BunkersLeftSpeed => Ok(direction_speed(shared(&self.storm_motion)?.left)
                .1
                .unpack()),
        }
    }

    // The selected effective inflow layer, an error if there is none.
    fn inflow_layer(&self) -> Result<Layer> {
        let layer: Option<Layer> = *shared(&self.effective_inflow)?;
        layer.ok_or(AnalysisError::MissingValue)
    }

    // Bulk shear from the surface to `depth` meters above it.
    fn fixed_layer_shear(&self, depth: f64) -> Result<MetersPSec> {
        let sfc = self.acc.bounds.surface_height()?;
        bulk_shear(&self.acc.wind, sfc, above(sfc, depth))
    }

    // Right mover helicity from the surface to `depth` meters above it.
    fn fixed_layer_helicity(&self, depth: f64) -> Result<IntHelicityM2pS2> {
        let sfc = self.acc.bounds.surface_height()?;
        let storm = shared(&self.storm_motion)?.right;

        sr_helicity(
            &self.acc.wind,
            sfc,
            above(sfc, depth),
            storm,
            self.config.helicity_step,
        )
    }

    // Right mover helicity over the effective inflow layer, 0 without a layer.
    fn effective_helicity(&self) -> Result<IntHelicityM2pS2> {
        let layer = match shared(&self.effective_inflow)? {
            Some(layer) => layer,
            None => return Ok(IntHelicityM2pS2(0.0)),
        };

        let bottom = (self.acc.height)(layer.bottom)?;
        let top = (self.acc.height)(layer.top)?;
        let storm = shared(&self.storm_motion)?.right;

        sr_helicity(&self.acc.wind, bottom, top, storm, self.config.helicity_step)
    }

    // Bulk shear from the base of the effective inflow layer to half way up to the most unstable
    // parcel's equilibrium level, 0 without a layer.
    fn effective_bulk_shear(&self) -> Result<MetersPSec> {
        let layer = match shared(&self.effective_inflow)? {
            Some(layer) => layer,
            None => return Ok(MetersPSec(0.0)),
        };

        let base = (self.acc.height)(layer.bottom)?;
        let el = shared(&self.most_unstable)?
            .el_pressure()
            .ok_or(AnalysisError::MissingValue)?;
        let el_height = (self.acc.height)(el)?;
        let top = above(base, 0.5 * (el_height.unpack() - base.unpack()));

        bulk_shear(&self.acc.wind, base, top)
    }
}
