use approx::assert_abs_diff_eq;
use metfor::Quantity;
use sounding_workbench::{
    cape_cin, k_index, precipitable_water, surface_parcel, Analysis, AnalysisConfig, Attribute,
    Index, Profile,
};
use strum::IntoEnumIterator;

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_battery_is_complete(profile: &Profile) {
    let anal = Analysis::compute(&profile.snapshot(), &AnalysisConfig::default());

    assert_eq!(anal.iter().count(), Index::iter().count());
    for (idx, val) in anal.iter() {
        if let Some(v) = val.value() {
            assert!(v.is_finite(), "{} = {}", idx, v);
        }
    }

    assert!(anal.value(Index::KIndex).is_some());
    assert!(anal.value(Index::SurfaceCape).unwrap() >= 0.0);
    assert!(anal.value(Index::SurfaceCin).unwrap() <= 0.0);
    assert!(anal.value(Index::PrecipitableWater).unwrap() > 0.0);
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_battery_matches_direct_calls(profile: &Profile) {
    let config = AnalysisConfig::default();
    let snd = profile.snapshot();
    let acc = snd.accessors().unwrap();
    let anal = Analysis::compute(&snd, &config);

    let k = k_index(&acc.temperature, &acc.dew_point).unwrap();
    assert_eq!(anal.value(Index::KIndex), Some(k));

    let (cape, cin) = cape_cin(surface_parcel(&acc).unwrap(), &acc, &config).unwrap();
    assert_eq!(anal.value(Index::SurfaceCape), Some(cape.unpack()));
    assert_eq!(anal.value(Index::SurfaceCin), Some(cin.unpack()));

    let pw = precipitable_water(&acc.dew_point, &acc.bounds, &config).unwrap();
    assert_eq!(anal.value(Index::PrecipitableWater), Some(pw.unpack()));
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_edits_change_the_analysis(profile: &mut Profile) {
    let config = AnalysisConfig::default();

    let before = profile.snapshot();
    let k_before = Analysis::compute(&before, &config)
        .value(Index::KIndex)
        .unwrap();

    let id = profile
        .levels()
        .iter()
        .find(|lvl| lvl.get(Attribute::Pressure) == Some(850.0))
        .map(|lvl| lvl.id())
        .unwrap();
    let t850 = profile.level(id).unwrap().get(Attribute::Temperature).unwrap();
    profile
        .change_attribute(id, Attribute::Temperature, t850 + 5.0)
        .unwrap();

    let k_after = Analysis::compute(&profile.snapshot(), &config)
        .value(Index::KIndex)
        .unwrap();
    assert_abs_diff_eq!(k_after - k_before, 5.0, epsilon = 1.0e-9);

    // The old snapshot does not see the edit.
    let k_old = Analysis::compute(&before, &config)
        .value(Index::KIndex)
        .unwrap();
    assert_eq!(k_old, k_before);
}
