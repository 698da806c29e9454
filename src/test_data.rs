//! Data used in tests.
use crate::profile::{Profile, RawLevel};

// pressure (hPa), height (m), temperature (C), dew point (C), direction (deg), speed (km/h)
type Row = (f64, f64, f64, f64, f64, f64);

fn build(rows: &[Row], force_enabled: bool) -> Profile {
    Profile::new(rows.iter().map(|&(p, z, t, td, dir, spd)| {
        let lvl = RawLevel::new(p, z, t, td, dir, spd);
        if force_enabled {
            lvl.with_enabled(true)
        } else {
            lvl
        }
    }))
}

/// A warm, moist, unstable warm season sounding with veering winds, from the surface to 100 hPa.
///
/// Every level is explicitly enabled so the profile extends above 300 hPa.
pub fn standard() -> Profile {
    const ROWS: &[Row] = &[
        (1000.0, 110.0, 30.0, 22.0, 170.0, 20.0),
        (975.0, 335.0, 28.5, 21.0, 180.0, 30.0),
        (950.0, 565.0, 26.5, 20.0, 190.0, 40.0),
        (925.0, 800.0, 24.5, 19.0, 200.0, 50.0),
        (900.0, 1040.0, 22.5, 17.5, 210.0, 55.0),
        (850.0, 1530.0, 18.0, 14.0, 220.0, 60.0),
        (800.0, 2045.0, 14.5, 10.0, 230.0, 65.0),
        (750.0, 2580.0, 11.0, 5.0, 235.0, 70.0),
        (700.0, 3140.0, 7.0, 0.0, 240.0, 75.0),
        (650.0, 3730.0, 3.0, -6.0, 245.0, 80.0),
        (600.0, 4350.0, -1.5, -12.0, 250.0, 85.0),
        (550.0, 5010.0, -6.0, -18.0, 255.0, 90.0),
        (500.0, 5710.0, -11.0, -25.0, 260.0, 95.0),
        (450.0, 6470.0, -17.0, -32.0, 260.0, 100.0),
        (400.0, 7290.0, -23.5, -38.0, 265.0, 110.0),
        (350.0, 8190.0, -31.0, -44.0, 265.0, 120.0),
        (300.0, 9200.0, -39.5, -50.0, 270.0, 130.0),
        (250.0, 10360.0, -48.5, -57.0, 270.0, 140.0),
        (200.0, 11760.0, -55.0, -65.0, 270.0, 130.0),
        (150.0, 13550.0, -58.0, -75.0, 275.0, 110.0),
        (100.0, 16100.0, -62.0, -85.0, 280.0, 90.0),
    ];

    build(ROWS, true).with_source_description("standard unstable profile".to_owned())
}

/// An isothermal (20C), dry profile from 1000 to 350 hPa. It is absolutely stable.
pub fn isothermal() -> Profile {
    const ROWS: &[Row] = &[
        (1000.0, 0.0, 20.0, 0.0, 180.0, 10.0),
        (950.0, 441.0, 20.0, 0.0, 190.0, 18.0),
        (900.0, 905.0, 20.0, 0.0, 200.0, 26.0),
        (850.0, 1397.0, 20.0, 0.0, 210.0, 34.0),
        (800.0, 1918.0, 20.0, 0.0, 220.0, 42.0),
        (750.0, 2472.0, 20.0, 0.0, 230.0, 50.0),
        (700.0, 3065.0, 20.0, 0.0, 240.0, 58.0),
        (650.0, 3702.0, 20.0, 0.0, 250.0, 66.0),
        (600.0, 4390.0, 20.0, 0.0, 260.0, 74.0),
        (550.0, 5138.0, 20.0, 0.0, 270.0, 82.0),
        (500.0, 5957.0, 20.0, 0.0, 270.0, 90.0),
        (450.0, 6862.0, 20.0, 0.0, 270.0, 98.0),
        (400.0, 7875.0, 20.0, 0.0, 270.0, 106.0),
        (350.0, 9022.0, 20.0, 0.0, 270.0, 114.0),
    ];

    build(ROWS, false)
}

/// Four mandatory levels, surface first, with a K-index of 20.
pub fn k_index_scenario() -> Profile {
    const ROWS: &[Row] = &[
        (1000.0, 100.0, 25.0, 20.0, 180.0, 20.0),
        (850.0, 1500.0, 15.0, 10.0, 220.0, 40.0),
        (700.0, 3100.0, 5.0, -10.0, 250.0, 60.0),
        (500.0, 5800.0, -10.0, -30.0, 270.0, 90.0),
    ];

    build(ROWS, false)
}

/// A dry surface layer under a moist layer at 900 hPa, so the most unstable parcel is aloft.
pub fn most_unstable_aloft() -> Profile {
    const ROWS: &[Row] = &[
        (1000.0, 100.0, 20.0, 10.0, 160.0, 15.0),
        (950.0, 540.0, 18.0, 10.0, 170.0, 25.0),
        (900.0, 1000.0, 20.0, 18.0, 190.0, 35.0),
        (850.0, 1480.0, 14.0, 4.0, 210.0, 45.0),
        (700.0, 3080.0, 4.0, -6.0, 240.0, 60.0),
        (500.0, 5750.0, -12.0, -25.0, 260.0, 80.0),
        (400.0, 7320.0, -24.0, -38.0, 265.0, 95.0),
    ];

    build(ROWS, false)
}

/// A moist surface layer capped by a warm nose at 700 hPa, over a cold upper profile. A surface
/// parcel is buoyant below the nose, negative through it, and buoyant again to the top.
pub fn warm_nose() -> Profile {
    const ROWS: &[Row] = &[
        (1000.0, 100.0, 30.0, 24.0, 180.0, 20.0),
        (850.0, 1520.0, 18.0, 10.0, 210.0, 40.0),
        (700.0, 3160.0, 22.0, 0.0, 240.0, 60.0),
        (600.0, 4410.0, -5.0, -20.0, 250.0, 70.0),
        (400.0, 7330.0, -30.0, -45.0, 260.0, 90.0),
    ];

    build(ROWS, true)
}

/// The warm nose profile with a warm layer on top, so the upper buoyant layer also ends.
pub fn two_buoyant_layers() -> Profile {
    const ROWS: &[Row] = &[
        (1000.0, 100.0, 30.0, 24.0, 180.0, 20.0),
        (850.0, 1520.0, 18.0, 10.0, 210.0, 40.0),
        (700.0, 3160.0, 22.0, 0.0, 240.0, 60.0),
        (600.0, 4410.0, -5.0, -20.0, 250.0, 70.0),
        (400.0, 7330.0, -30.0, -45.0, 260.0, 90.0),
        (300.0, 9300.0, -5.0, -40.0, 270.0, 110.0),
    ];

    build(ROWS, true)
}
