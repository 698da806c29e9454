use metfor::{HectoPascal, Quantity};
use sounding_workbench::{AnalysisError, Attribute, ErrorKind, LevelId, Profile};
use std::{cell::RefCell, rc::Rc};
use strum::IntoEnumIterator;

// Every attribute of every enabled level, in pressure order. Missing values compare as `None`.
fn enabled_values(profile: &Profile) -> Vec<(LevelId, Vec<Option<f64>>)> {
    profile
        .enabled_levels()
        .iter()
        .map(|lvl| (lvl.id(), Attribute::iter().map(|attr| lvl.get(attr)).collect()))
        .collect()
}

fn pressure_of(profile: &Profile, id: LevelId) -> f64 {
    profile
        .level(id)
        .unwrap()
        .get(Attribute::Pressure)
        .unwrap()
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_interpolation_exact_at_levels(profile: &Profile) {
    assert!(profile.enabled_levels().len() >= 2);

    for lvl in profile.enabled_levels() {
        let p = lvl.pressure.unpack();

        for attr in Attribute::iter().filter(|attr| *attr != Attribute::Pressure) {
            if let Some(stored) = lvl.get(attr) {
                let val = profile.value_at(p, attr).unwrap();
                assert_eq!(val, stored, "{} at {} hPa", attr, p.unpack());
            }
        }
    }
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_lookup_outside_enabled_range(profile: &Profile) {
    let sfc = profile.surface_level().unwrap().pressure.unpack().unpack();
    let top = profile.top_level().unwrap().pressure.unpack().unpack();

    for &p in &[sfc + 0.5, top - 0.5] {
        let err = profile
            .value_at(HectoPascal(p), Attribute::Temperature)
            .unwrap_err();
        assert_eq!(err, AnalysisError::PressureOutOfRange(p));
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    assert!(profile
        .value_at(HectoPascal(0.5 * (sfc + top)), Attribute::Temperature)
        .is_ok());
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_insert_delete_round_trip(profile: &mut Profile) {
    let before = enabled_values(profile);
    let raw_before: Vec<LevelId> = profile.levels().iter().map(|lvl| lvl.id()).collect();

    for &id in &raw_before {
        let new_id = profile.insert_below(id).unwrap();
        assert!(profile.level(new_id).is_ok());
        profile.delete_level(new_id).unwrap();
        assert_eq!(enabled_values(profile), before);

        let new_id = profile.insert_above(id).unwrap();
        profile.delete_level(new_id).unwrap();
        assert_eq!(enabled_values(profile), before);
    }

    let raw_after: Vec<LevelId> = profile.levels().iter().map(|lvl| lvl.id()).collect();
    assert_eq!(raw_after, raw_before);
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_disable_is_soft_delete(profile: &mut Profile) {
    let sfc = *profile.surface_level().unwrap();
    let sfc_p = pressure_of(profile, sfc.id());
    let count = profile.enabled_levels().len();

    profile.disable_level(sfc.id()).unwrap();

    assert_eq!(profile.enabled_levels().len(), count - 1);
    assert_ne!(profile.surface_level().unwrap().id(), sfc.id());
    assert!(profile
        .enabled_levels()
        .iter()
        .all(|lvl| lvl.id() != sfc.id()));
    assert_eq!(
        profile.value_at(HectoPascal(sfc_p), Attribute::Temperature),
        Err(AnalysisError::PressureOutOfRange(sfc_p))
    );

    // Still stored, untouched.
    let stored = profile.level(sfc.id()).unwrap();
    assert!(!stored.is_enabled());
    for attr in Attribute::iter() {
        assert_eq!(stored.get(attr), sfc.get(attr));
    }

    profile.enable_level(sfc.id()).unwrap();
    assert_eq!(profile.surface_level().unwrap().id(), sfc.id());
    assert_eq!(profile.enabled_levels().len(), count);
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_observers_see_every_edit(profile: &mut Profile) {
    let seen = Rc::new(RefCell::new(vec![]));

    let log = Rc::clone(&seen);
    profile.subscribe(move |p: &Profile| log.borrow_mut().push(p.enabled_levels().len()));

    let count = profile.enabled_levels().len();
    let sfc = profile.surface_level().unwrap().id();

    profile.disable_level(sfc).unwrap();
    profile.enable_level(sfc).unwrap();
    let new_id = profile.insert_above(sfc).unwrap();
    profile
        .change_attribute(new_id, Attribute::Temperature, 100.0)
        .unwrap();
    profile.delete_level(new_id).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 5);
    assert_eq!(seen[0], count - 1);
    assert_eq!(seen[1], count);
    assert_eq!(seen[4], count);
}
