#![warn(missing_docs)]
//! Editable atmospheric sounding profiles and the convective indexes derived from them.
//!
//! A [`Profile`] owns the levels of a sounding in the order they were ingested. Levels can be
//! edited, inserted, deleted, and enabled or disabled, and every edit rebuilds the cache of
//! enabled levels sorted by pressure before observers registered with [`Profile::subscribe`]
//! are notified.
//!
//! Analysis never touches a live profile. A [`ProfileSnapshot`] is an immutable copy that can be
//! sent to another thread, and its [`Accessors`] are the closures every index function reads the
//! profile through. [`Analysis::compute`] runs the whole battery, reporting any index that cannot
//! be computed as [`IndexValue::Undefined`] without stopping the others.
//!
//! ```
//! use sounding_workbench::{Analysis, AnalysisConfig, Index, Profile, RawLevel};
//!
//! let profile = Profile::new(vec![
//!     RawLevel::new(1000.0, 100.0, 25.0, 20.0, 180.0, 20.0),
//!     RawLevel::new(850.0, 1500.0, 15.0, 10.0, 220.0, 40.0),
//!     RawLevel::new(700.0, 3100.0, 5.0, -10.0, 250.0, 60.0),
//!     RawLevel::new(500.0, 5800.0, -10.0, -30.0, 270.0, 90.0),
//! ]);
//!
//! let anal = Analysis::compute(&profile.snapshot(), &AnalysisConfig::default());
//! assert_eq!(anal.value(Index::KIndex), Some(20.0));
//! ```

//
// API
//
pub use crate::{
    accessors::{Accessors, Bounds, HeightFn, PressureFn},
    analysis::{Analysis, IndexValue},
    config::AnalysisConfig,
    error::{AnalysisError, ErrorKind, Result},
    indexes::{
        boyden, cross_totals, energy_helicity_index, k_index, lifted_index, precipitable_water,
        showalter, significant_tornado, supercell_composite, sweat, total_totals, vertical_totals,
    },
    keys::Index,
    layers::{effective_inflow_layer, effective_inflow_layers, Layer},
    parcel::{
        mixed_layer_parcel, most_unstable_parcel, most_unstable_pressure, parcel_at,
        surface_parcel, Parcel,
    },
    parcel_profile::{cape_cin, lift_parcel, ParcelAscentAnalysis, ParcelProfile},
    profile::{
        Attribute, Level, LevelId, Profile, ProfileSnapshot, RawLevel, SoundingRecord,
        SubscriptionId,
    },
    wind::{
        bulk_shear, bunkers_storm_motion, direction_speed, mean_wind, sr_helicity,
        wind_components, StormMotion,
    },
};

pub mod integrate;
pub mod parcel;
pub mod thermo;

//
// Internal use only
//

mod accessors;
mod analysis;
mod config;
mod error;
mod indexes;
mod interpolation;
mod keys;
mod layers;
mod parcel_profile;
mod profile;
mod wind;

#[cfg(test)]
mod test_data;
