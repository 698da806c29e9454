use sounding_workbench::{Profile, SoundingRecord};
use std::{fs::File, io::BufReader, path::PathBuf, sync::Once};

pub mod edit_tests;
pub mod index_tests;

#[allow(unused_macros)] // False alarm
macro_rules! test_file {
    ($test_mod_name:ident, $fname:expr) => {
        mod $test_mod_name {
            use super::utils;
            use sounding_workbench::Profile;

            fn load_data() -> Profile {
                utils::init_logging();
                utils::load_test_file($fname)
            }

            mod editing {
                use super::load_data;
                use crate::utils::edit_tests;

                #[test]
                fn interpolation_exact_at_levels() {
                    edit_tests::test_interpolation_exact_at_levels(&load_data());
                }

                #[test]
                fn lookup_outside_enabled_range() {
                    edit_tests::test_lookup_outside_enabled_range(&load_data());
                }

                #[test]
                fn insert_then_delete_round_trip() {
                    edit_tests::test_insert_delete_round_trip(&mut load_data());
                }

                #[test]
                fn disable_is_soft_delete() {
                    edit_tests::test_disable_is_soft_delete(&mut load_data());
                }

                #[test]
                fn observers_see_every_edit() {
                    edit_tests::test_observers_see_every_edit(&mut load_data());
                }
            }

            mod indexes {
                use super::load_data;
                use crate::utils::index_tests;

                #[test]
                fn battery_is_complete() {
                    index_tests::test_battery_is_complete(&load_data());
                }

                #[test]
                fn battery_matches_direct_calls() {
                    index_tests::test_battery_matches_direct_calls(&load_data());
                }

                #[test]
                fn edits_change_the_analysis() {
                    index_tests::test_edits_change_the_analysis(&mut load_data());
                }
            }
        }
    };
}

static LOGGING: Once = Once::new();

/// Send library log output to the test harness. Set `RUST_LOG` to see it.
#[allow(dead_code)]
pub fn init_logging() {
    LOGGING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

#[allow(dead_code)]
pub fn load_all_test_files() -> [Profile; 2] {
    [
        load_test_file("standard.json"),
        load_test_file("shallow.json"),
    ]
}

#[allow(dead_code)]
pub fn load_test_record(fname: &str) -> SoundingRecord {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);

    let f = File::open(&test_path).expect(&format!("Error opening file: {:#?}", test_path));
    serde_json::from_reader(BufReader::new(f))
        .expect(&format!("Error parsing file: {:#?}", test_path))
}

#[allow(dead_code)]
pub fn load_test_file(fname: &str) -> Profile {
    Profile::from_record(load_test_record(fname))
}
