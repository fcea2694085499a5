//! Integration tests for config loading from fixture files.
//!
//! These tests verify that the sample config file matches what the `cardsort` config module reads.

use std::fs;
use std::path::Path;

/// Read the sample config file content.
fn read_sample_config() -> String {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    fs::read_to_string(config_path).expect("Failed to read sample config file")
}

#[test]
fn sample_config_file_exists() {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    assert!(config_path.exists(), "Sample config file should exist");
}

#[test]
fn sample_config_is_valid_toml() {
    let config_content = read_sample_config();
    let result: Result<toml::Value, _> = toml::from_str(&config_content);
    assert!(result.is_ok(), "Sample config should be valid TOML: {:?}", result.err());
}

#[test]
fn cardsort_section_has_expected_structure() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    let cardsort = value.get("cardsort").expect("should have cardsort section");

    for key in ["data_dir", "output_dir_name", "dryrun", "verbose", "log", "log_dir"] {
        assert!(cardsort.get(key).is_some(), "cardsort section should have {key}");
    }
}

#[test]
fn config_values_have_correct_types() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    let cardsort = value.get("cardsort").expect("should have cardsort section");

    // Check boolean types
    assert!(cardsort.get("dryrun").unwrap().is_bool());
    assert!(cardsort.get("verbose").unwrap().is_bool());
    assert!(cardsort.get("log").unwrap().is_bool());

    // Check string types
    assert!(cardsort.get("data_dir").unwrap().is_str());
    assert!(cardsort.get("output_dir_name").unwrap().is_str());
    assert!(cardsort.get("log_dir").unwrap().is_str());
}

#[test]
fn output_dir_name_is_single_folder() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    let name = value["cardsort"]["output_dir_name"].as_str().expect("should be a string");
    assert!(!name.trim().is_empty());
    assert!(!name.contains(['/', '\\']));
}
