#![allow(non_snake_case)]

use super::*;

#[test]
fn BridgeConfig___default___has_expected_values() {
    let config = BridgeConfig::default();

    assert_eq!(config.entrypoint, "window.nsWebViewInterface");
    assert_eq!(config.scheme_prefix, "js2ios:");
    assert_eq!(config.min_evaluate_api_level, 19);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.shutdown_timeout_ms, 5000);
    assert!(config.worker_threads.is_none());
    assert!(config.init_src.is_none());
}

#[test]
fn BridgeConfig___from_empty_bytes___returns_defaults() {
    let config = BridgeConfig::from_json(&[]).unwrap();

    assert_eq!(config.entrypoint, "window.nsWebViewInterface");
}

#[test]
fn BridgeConfig___from_json___parses_entrypoint() {
    let json = r#"{"entrypoint": "window.bridge"}"#;

    let config = BridgeConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(config.entrypoint, "window.bridge");
    assert_eq!(config.scheme_prefix, "js2ios:");
}

#[test]
fn BridgeConfig___from_json___invalid_json_returns_error() {
    let result = BridgeConfig::from_json(b"{not json");

    assert!(result.is_err());
}

#[test]
fn BridgeConfig___builder_chain___combines_options() {
    let config = BridgeConfig::new()
        .with_entrypoint("window.app")
        .with_scheme_prefix("app2host:")
        .with_init_src("https://example.com/index.html");

    assert_eq!(config.entrypoint, "window.app");
    assert_eq!(config.scheme_prefix, "app2host:");
    assert_eq!(
        config.init_src.as_deref(),
        Some("https://example.com/index.html")
    );
}

#[test]
fn BridgeConfig___level___unknown_name_falls_back_to_info() {
    let config = BridgeConfig {
        log_level: "chatty".to_string(),
        ..Default::default()
    };

    assert_eq!(config.level(), LogLevel::Info);
}

#[test]
fn BridgeConfig___shutdown_timeout___converts_millis() {
    let config = BridgeConfig {
        shutdown_timeout_ms: 250,
        ..Default::default()
    };

    assert_eq!(config.shutdown_timeout(), std::time::Duration::from_millis(250));
}

#[test]
fn BridgeConfig___validate___default_is_valid() {
    assert!(BridgeConfig::default().validate().is_ok());
}

#[test]
fn BridgeConfig___validate___empty_entrypoint_rejected() {
    let config = BridgeConfig::new().with_entrypoint("  ");

    let result = config.validate();

    assert!(matches!(result, Err(BridgeError::ConfigError(_))));
}

#[test]
fn BridgeConfig___validate___empty_scheme_prefix_rejected() {
    let config = BridgeConfig::new().with_scheme_prefix("");

    let result = config.validate();

    assert!(matches!(result, Err(BridgeError::ConfigError(_))));
}
