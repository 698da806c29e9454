use sounding_workbench::{Profile, SoundingRecord};
use std::{fs::File, io::BufReader, path::PathBuf};

pub fn load_all_test_files() -> [Profile; 2] {
    let snd1 = load_test_file("standard.json");
    let snd2 = load_test_file("shallow.json");

    [snd1, snd2]
}

fn load_test_file(fname: &str) -> Profile {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);

    let f = File::open(&test_path).expect(&format!("Error opening file: {:#?}", test_path));
    let record: SoundingRecord = serde_json::from_reader(BufReader::new(f))
        .expect(&format!("Error parsing file: {:#?}", test_path));

    Profile::from_record(record)
}
