//! Tests for error types

use downforce::Error;

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("must pass a lift range or a downforce range".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid input"));
    assert!(error_str.contains("downforce range"));
}

#[test]
fn test_config_write_error() {
    let error = Error::ConfigWrite("vehicle template has no 'Value' column".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Vehicle config write failed"));
    assert!(error_str.contains("'Value'"));
}

#[test]
fn test_simulation_failure_error() {
    let error = Error::SimulationFailure("simulate lap: 'matlab' exited with 1".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Simulation failed"));
    assert!(error_str.contains("Check the simulator output directory"));
}

#[test]
fn test_search_divergence_error() {
    let error = Error::SearchDivergence {
        index: 3,
        samples: 4,
        start: -1.0,
        end: -10.0,
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Search diverged"));
    assert!(error_str.contains("sample 3 of 4"));
    assert!(error_str.contains("[-1, -10]"));
    assert!(error_str.contains("extend"));
}

#[test]
fn test_storage_error() {
    let error = Error::StorageError("file not found".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Storage error"));
    assert!(error_str.contains("file not found"));
}

#[test]
fn test_config_error() {
    let error = Error::Config("search.samples must be at least 3, got 2".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Configuration error"));
    assert!(error_str.contains("search.samples"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
}

#[test]
fn test_manifest_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: Error = json_error.into();
    assert!(matches!(error, Error::StorageError(ref msg) if msg.starts_with("session manifest")));
}

#[test]
fn test_other_error() {
    let error = Error::Other("custom error".to_string());
    assert_eq!(format!("{error}"), "custom error");
}

#[test]
fn test_error_debug() {
    let error = Error::InvalidInput("debug test".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("InvalidInput"));
}
