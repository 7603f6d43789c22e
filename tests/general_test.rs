use info_markup::{Configuration, Reader};
use miette::Report;
use std::fs;

fn fixture_config() -> Configuration {
    let mut config = Configuration::default();
    config.add_unit_scale("s", 1.0);
    config.add_unit_scale("ms", 0.001);
    config
}

#[test]
fn test_all_info_files() {
    let tests_dir = "./tests/ok";
    let entries = fs::read_dir(tests_dir).expect("Failed to read tests/ok directory");
    let mut parsed = 0;

    for entry in entries {
        let entry = entry.expect("Failed to read directory entry");
        let path = entry.path();

        if path.is_file() && path.extension().is_some_and(|ext| ext == "info") {
            println!("Reading file: {:?}", path);
            let mut reader = Reader::open(&path, fixture_config())
                .unwrap_or_else(|err| panic!("Failed to open {:?}: {}", path, err));

            loop {
                match reader.read() {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(err) => panic!("Failed to read {:?}. Error: {:?}", path, Report::new(err)),
                }
            }
            assert_eq!(reader.scope_count(), 0, "{:?} left scopes open", path);
            parsed += 1;
        }
    }

    assert!(parsed >= 2, "expected fixture documents in tests/ok");
}
