//! An editable vertical profile of the atmosphere.
//!
//! A [`Profile`] keeps its levels in the order they were supplied (surface first is the usual
//! convention), along with a cache of the enabled levels sorted by ascending pressure that all
//! queries and analysis run against. Every edit rebuilds that cache and then notifies the
//! subscribed observers.
use crate::{
    error::{AnalysisError, Result},
    interpolation::blend_levels,
};
use chrono::NaiveDateTime;
use metfor::{HectoPascal, Meters, MetersPSec, WindUV};
use std::fmt;
use tracing::{debug, trace, warn};

pub use self::{
    level::{Attribute, Level, LevelId},
    record::{RawLevel, SoundingRecord},
    snapshot::ProfileSnapshot,
};

mod level;
mod record;
mod snapshot;

/// Handle returned by [`Profile::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Observer = Box<dyn FnMut(&Profile)>;

#[derive(Debug, Clone, Copy)]
enum Side {
    Above,
    Below,
}

impl Side {
    fn opposite(self) -> Self {
        match self {
            Side::Above => Side::Below,
            Side::Below => Side::Above,
        }
    }
}

/// A sounding that can be edited level by level.
///
/// # Examples
///
/// ```rust
/// use sounding_workbench::{Attribute, Profile, RawLevel};
/// use metfor::HectoPascal;
///
/// let mut profile = Profile::new(vec![
///     RawLevel::new(1000.0, 100.0, 25.0, 20.0, 180.0, 20.0),
///     RawLevel::new(850.0, 1500.0, 15.0, 10.0, 225.0, 40.0),
/// ]);
///
/// let t = profile.value_at(HectoPascal(925.0), Attribute::Temperature).unwrap();
/// assert!((t - 20.0).abs() < 1.0e-9);
///
/// let id = profile.levels()[1].id();
/// profile.disable_level(id).unwrap();
/// assert_eq!(profile.enabled_levels().len(), 1);
/// ```
pub struct Profile {
    levels: Vec<Level>,
    enabled: ProfileSnapshot,
    next_id: u64,

    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: usize,

    // Description of the source of the sounding.
    source: Option<String>,
    // Valid time of sounding
    valid_time: Option<NaiveDateTime>,
}

impl Profile {
    /// Create a profile from raw levels, kept in the order given.
    pub fn new<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = RawLevel>,
    {
        let levels: Vec<Level> = raw
            .into_iter()
            .enumerate()
            .map(|(i, raw)| Level::from_raw(LevelId::from(i as u64), &raw))
            .collect();
        let next_id = levels.len() as u64;
        let enabled = ProfileSnapshot::from_levels(&levels);

        debug!(
            levels = levels.len(),
            enabled = enabled.len(),
            "created profile"
        );

        Profile {
            levels,
            enabled,
            next_id,
            observers: vec![],
            next_subscription: 0,
            source: None,
            valid_time: None,
        }
    }

    /// Create a profile from a record, keeping its metadata.
    pub fn from_record(record: SoundingRecord) -> Self {
        let SoundingRecord {
            source,
            valid_time,
            levels,
        } = record;

        Profile::new(levels)
            .with_source_description(source)
            .with_valid_time(valid_time)
    }

    /// Add a source description to this profile.
    #[inline]
    pub fn with_source_description<S>(mut self, desc: S) -> Self
    where
        Option<String>: From<S>,
    {
        self.source = Option::from(desc);
        self
    }

    /// Retrieve a source description for this profile.
    #[inline]
    pub fn source_description(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Builder method for the valid time of the profile.
    #[inline]
    pub fn with_valid_time<T>(mut self, valid_time: T) -> Self
    where
        Option<NaiveDateTime>: From<T>,
    {
        self.valid_time = Option::from(valid_time);
        self
    }

    /// Get the valid time of the profile.
    #[inline]
    pub fn valid_time(&self) -> Option<NaiveDateTime> {
        self.valid_time
    }

    /// All levels in raw order, enabled or not.
    #[inline]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Look up a level by identity.
    pub fn level(&self, id: LevelId) -> Result<&Level> {
        self.index_of(id).map(|i| &self.levels[i])
    }

    /// The enabled levels sorted by ascending pressure.
    #[inline]
    pub fn enabled_levels(&self) -> &[Level] {
        self.enabled.levels()
    }

    /// The enabled level with the lowest pressure.
    #[doc(alias = "first")]
    pub fn top_level(&self) -> Option<&Level> {
        self.enabled.top_level()
    }

    /// The enabled level with the highest pressure.
    #[doc(alias = "last")]
    pub fn surface_level(&self) -> Option<&Level> {
        self.enabled.surface_level()
    }

    /// Interpolate an attribute at `pressure` from the enabled levels.
    ///
    /// Exact at a level's own pressure, fails with `PressureOutOfRange` outside of the enabled
    /// levels.
    pub fn value_at(&self, pressure: HectoPascal, attr: Attribute) -> Result<f64> {
        self.enabled.value_at(pressure, attr)
    }

    /// Interpolate the wind at `pressure` from the enabled levels.
    pub fn wind_at_pressure(&self, pressure: HectoPascal) -> Result<WindUV<MetersPSec>> {
        self.enabled.wind_at_pressure(pressure)
    }

    /// Interpolate the wind at `height` from the enabled levels.
    pub fn wind_at(&self, height: Meters) -> Result<WindUV<MetersPSec>> {
        self.enabled.wind_at(height)
    }

    /// An immutable copy of the enabled levels for analysis.
    pub fn snapshot(&self) -> ProfileSnapshot {
        self.enabled.clone()
    }

    /// Every level in raw order as records, with an explicit enabled flag.
    pub fn export(&self) -> Vec<RawLevel> {
        self.levels.iter().map(Level::to_raw).collect()
    }

    /// Export the profile and its metadata.
    pub fn to_record(&self) -> SoundingRecord {
        SoundingRecord {
            source: self.source.clone(),
            valid_time: self.valid_time,
            levels: self.export(),
        }
    }

    /// Include a level in analysis.
    pub fn enable_level(&mut self, id: LevelId) -> Result<()> {
        self.set_enabled(id, true)
    }

    /// Exclude a level from analysis, keeping it in the profile.
    pub fn disable_level(&mut self, id: LevelId) -> Result<()> {
        self.set_enabled(id, false)
    }

    /// Set whether a level takes part in analysis.
    pub fn set_enabled(&mut self, id: LevelId, enabled: bool) -> Result<()> {
        let i = self.index_of(id)?;
        self.levels[i].set_enabled(enabled);
        trace!(level_id = %id, enabled, "set enabled");

        self.commit();
        Ok(())
    }

    /// Remove a level from the profile, returning it.
    pub fn delete_level(&mut self, id: LevelId) -> Result<Level> {
        let i = self.index_of(id)?;
        let removed = self.levels.remove(i);
        trace!(level_id = %id, "deleted level");

        self.commit();
        Ok(removed)
    }

    /// Change one attribute of a level. A non-finite value marks the attribute as missing.
    ///
    /// Changing the pressure re-sorts the enabled levels.
    pub fn change_attribute(&mut self, id: LevelId, attr: Attribute, value: f64) -> Result<()> {
        let i = self.index_of(id)?;
        self.levels[i].set(attr, value);
        trace!(level_id = %id, attribute = %attr, value, "changed attribute");

        self.commit();
        Ok(())
    }

    /// Insert a new level after `id` in raw order, which is above it for surface first profiles.
    ///
    /// The new level is the midpoint of `id` and the nearest level with a lower pressure. When
    /// `id` is the last level in raw order it is instead the linear extrapolation `2a - b` past
    /// `id`, away from the level before it.
    pub fn insert_above(&mut self, id: LevelId) -> Result<LevelId> {
        let i = self.index_of(id)?;
        let values = self.new_level_values(i, Side::Above)?;
        self.insert_new(i + 1, i, values)
    }

    /// Insert a new level before `id` in raw order, which is below it for surface first profiles.
    ///
    /// The counterpart of [`Profile::insert_above`], interpolating towards the nearest level with
    /// a higher pressure.
    pub fn insert_below(&mut self, id: LevelId) -> Result<LevelId> {
        let i = self.index_of(id)?;
        let values = self.new_level_values(i, Side::Below)?;
        self.insert_new(i, i, values)
    }

    /// Register an observer, called after every edit with the updated profile.
    ///
    /// Observers run in the order they subscribed.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Profile) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));

        id
    }

    /// Remove an observer, returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub_id, _)| *sub_id != id);

        self.observers.len() != before
    }

    fn new_level_values(&self, i: usize, side: Side) -> Result<[Option<f64>; 6]> {
        let target = &self.levels[i];
        let raw = |j: Option<usize>| j.and_then(|j| self.levels.get(j));
        let (outer, inner) = match side {
            Side::Above => (raw(Some(i + 1)), raw(i.checked_sub(1))),
            Side::Below => (raw(i.checked_sub(1)), raw(Some(i + 1))),
        };

        let outer = match outer {
            Some(outer) => outer,
            None => {
                let inner = inner.ok_or(AnalysisError::NotEnoughData)?;
                return Ok(blend_levels(target, inner, -1.0));
            }
        };

        let values = match (
            self.pressure_neighbor(i, side),
            self.pressure_neighbor(i, side.opposite()),
        ) {
            (Some(j), _) => blend_levels(target, &self.levels[j], 0.5),
            // Nothing further in that direction, so extend the pressure trend past the target.
            (None, Some(j)) => blend_levels(target, &self.levels[j], -1.0),
            (None, None) => blend_levels(target, outer, 0.5),
        };

        Ok(values)
    }

    // Index of the level closest in pressure to level `i` on the given side of it.
    fn pressure_neighbor(&self, i: usize, side: Side) -> Option<usize> {
        let target = self.levels[i].get(Attribute::Pressure)?;

        self.levels
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .filter_map(|(j, lvl)| lvl.get(Attribute::Pressure).map(|p| (j, p)))
            .filter(|&(_, p)| match side {
                Side::Above => p < target,
                Side::Below => p > target,
            })
            .min_by(|a, b| (a.1 - target).abs().total_cmp(&(b.1 - target).abs()))
            .map(|(j, _)| j)
    }

    fn index_of(&self, id: LevelId) -> Result<usize> {
        self.levels
            .iter()
            .position(|lvl| lvl.id() == id)
            .ok_or(AnalysisError::UnknownLevel(id))
    }

    fn insert_new(&mut self, at: usize, like: usize, values: [Option<f64>; 6]) -> Result<LevelId> {
        let id = LevelId::from(self.next_id);
        self.next_id += 1;

        let mut enabled = self.levels[like].is_enabled();
        match values[0] {
            Some(p) if p > 0.0 => {}
            _ => {
                warn!(level_id = %id, "inserted level has no usable pressure, disabling it");
                enabled = false;
            }
        }

        self.levels.insert(at, Level::new(id, enabled, values));
        trace!(level_id = %id, index = at, "inserted level");

        self.commit();
        Ok(id)
    }

    fn commit(&mut self) {
        self.enabled = ProfileSnapshot::from_levels(&self.levels);
        trace!(enabled = self.enabled.len(), "rebuilt enabled levels");

        // Observers get a shared view of the whole profile, so take them out while they run.
        let mut observers = std::mem::take(&mut self.observers);
        for (_, observer) in observers.iter_mut() {
            observer(self);
        }

        // Keep anything subscribed while notifying.
        observers.append(&mut self.observers);
        self.observers = observers;
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("source", &self.source)
            .field("valid_time", &self.valid_time)
            .field("levels", &self.levels)
            .field("observers", &self.observers.len())
            .finish()
    }
}
