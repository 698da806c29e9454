//! Tunable numerics for the analysis.
use serde::{Deserialize, Serialize};

/// Step sizes, thresholds, and integration accuracy used by the index engine.
///
/// Unset fields fall back to their defaults when deserializing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Fixed pressure step (hPa) used when lifting parcels.
    pub parcel_step: f64,
    /// Simpson half-intervals used for the hypsometric thickness of a single parcel step.
    pub step_subintervals: usize,
    /// Simpson half-intervals used for precipitable water.
    pub precipitable_water_subintervals: usize,
    /// Simpson half-intervals used for layer mean winds.
    pub mean_wind_subintervals: usize,
    /// Pressure step (hPa) of the most unstable and effective inflow layer scans.
    pub scan_step: f64,
    /// Top (hPa) of the most unstable parcel search.
    pub most_unstable_top: f64,
    /// Depth (hPa) of the mixed layer parcel.
    pub mixed_layer_depth: f64,
    /// Minimum CAPE (J/kg) for a level to be part of the effective inflow layer.
    pub inflow_min_cape: f64,
    /// Minimum (most negative) CIN (J/kg) for a level to be part of the effective inflow layer.
    pub inflow_min_cin: f64,
    /// Deviation (m/s) of the Bunkers storm motion from the mean wind.
    pub storm_deviation: f64,
    /// Height step (m) of the storm relative helicity sum.
    pub helicity_step: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            parcel_step: 1.0,
            step_subintervals: 1,
            precipitable_water_subintervals: 200,
            mean_wind_subintervals: 60,
            scan_step: 5.0,
            most_unstable_top: 500.0,
            mixed_layer_depth: 100.0,
            inflow_min_cape: 100.0,
            inflow_min_cin: -250.0,
            storm_deviation: 7.5,
            helicity_step: 20.0,
        }
    }
}
