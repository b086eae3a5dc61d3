//! Comprehensive unit tests for validation.rs module

use ad_performance_eda::validation::InputValidator;
use std::path::Path;

#[test]
fn test_validate_data_path_valid() {
    assert!(InputValidator::validate_data_path(Path::new("online_advertising_performance_data.csv")).is_ok());
}

#[test]
fn test_validate_data_path_missing_file_is_accepted() {
    // Existence is checked by the loader
    assert!(InputValidator::validate_data_path(Path::new("/nonexistent/ads.csv")).is_ok());
}

#[test]
fn test_validate_data_path_empty() {
    assert!(InputValidator::validate_data_path(Path::new("")).is_err());
}

#[test]
fn test_validate_data_path_with_null_byte() {
    assert!(InputValidator::validate_data_path(Path::new("ads\0.csv")).is_err());
}

#[test]
fn test_validate_data_path_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert!(InputValidator::validate_data_path(dir.path()).is_err());
}

#[test]
fn test_validate_output_directory_valid() {
    assert!(InputValidator::validate_output_directory(Path::new("./charts")).is_ok());
}

#[test]
fn test_validate_output_directory_existing_dir() {
    let dir = tempfile::tempdir().unwrap();
    assert!(InputValidator::validate_output_directory(dir.path()).is_ok());
}

#[test]
fn test_validate_output_directory_is_file() {
    let file = tempfile::NamedTempFile::new().unwrap();
    assert!(InputValidator::validate_output_directory(file.path()).is_err());
}

#[test]
fn test_validate_output_directory_empty() {
    assert!(InputValidator::validate_output_directory(Path::new(" ")).is_err());
}

#[test]
fn test_validate_top_n_bounds() {
    assert!(InputValidator::validate_top_n(0).is_err());
    assert!(InputValidator::validate_top_n(1).is_ok());
    assert!(InputValidator::validate_top_n(10_000).is_ok());
    assert!(InputValidator::validate_top_n(10_001).is_err());
}

#[test]
fn test_validate_chart_dimensions() {
    assert!(InputValidator::validate_chart_dimensions(1200, 500).is_ok());
    assert!(InputValidator::validate_chart_dimensions(200, 8000).is_ok());
    assert!(InputValidator::validate_chart_dimensions(199, 500).is_err());
    assert!(InputValidator::validate_chart_dimensions(1200, 8001).is_err());
}

#[test]
fn test_validate_year() {
    assert!(InputValidator::validate_year(2025).is_ok());
    assert!(InputValidator::validate_year(1900).is_ok());
    assert!(InputValidator::validate_year(2100).is_ok());
    assert!(InputValidator::validate_year(1899).is_err());
    assert!(InputValidator::validate_year(2101).is_err());
}
