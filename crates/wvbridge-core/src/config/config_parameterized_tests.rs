#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// Parameterized config JSON parsing tests
// ============================================================================

#[test_case(r#"{"log_level": "info"}"#, LogLevel::Info)]
#[test_case(r#"{"log_level": "debug"}"#, LogLevel::Debug)]
#[test_case(r#"{"log_level": "warn"}"#, LogLevel::Warn)]
#[test_case(r#"{"log_level": "error"}"#, LogLevel::Error)]
#[test_case(r#"{"log_level": "trace"}"#, LogLevel::Trace)]
fn BridgeConfig___log_level_json___parses_correctly(json: &str, expected: LogLevel) {
    let config = BridgeConfig::from_json(json.as_bytes()).unwrap();
    assert_eq!(config.level(), expected);
}

#[test_case(r#"{"min_evaluate_api_level": 17}"#, 17)]
#[test_case(r#"{"min_evaluate_api_level": 19}"#, 19)]
#[test_case(r#"{}"#, 19)]
fn BridgeConfig___min_evaluate_api_level_json___parses_correctly(json: &str, expected: u32) {
    let config = BridgeConfig::from_json(json.as_bytes()).unwrap();
    assert_eq!(config.min_evaluate_api_level, expected);
}

#[test_case(r#"{"worker_threads": 1}"#, Some(1))]
#[test_case(r#"{"worker_threads": 4}"#, Some(4))]
#[test_case(r#"{}"#, None)]
fn BridgeConfig___worker_threads_json___parses_correctly(
    json: &str,
    expected_threads: Option<usize>,
) {
    let config = BridgeConfig::from_json(json.as_bytes()).unwrap();
    assert_eq!(config.worker_threads, expected_threads);
}

#[test_case("verbose")]
#[test_case("")]
#[test_case("loud")]
fn BridgeConfig___validate___rejects_unknown_log_level(level: &str) {
    let config = BridgeConfig {
        log_level: level.to_string(),
        ..Default::default()
    };
    assert!(config.validate().is_err());
}
