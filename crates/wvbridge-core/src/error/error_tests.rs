#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test]
fn BridgeError___reserved_event_name___displays_name() {
    let err = BridgeError::ReservedEventName("_jsCallResponse".into());

    let display = err.to_string();

    assert_eq!(display, "_jsCallResponse eventName is reserved for internal use");
}

#[test]
fn BridgeError___remote_call___displays_response() {
    let err = BridgeError::RemoteCall(serde_json::json!("boom"));

    let display = err.to_string();

    assert_eq!(display, "remote call failed: \"boom\"");
}

#[test_case(BridgeError::Destroyed, "bridge destroyed" ; "destroyed")]
#[test_case(BridgeError::TransportError("detached".into()), "transport error: detached" ; "transport")]
#[test_case(BridgeError::ConfigError("bad".into()), "configuration error: bad" ; "config")]
fn BridgeError___display___describes_variant(err: BridgeError, expected: &str) {
    assert_eq!(err.to_string(), expected);
}

#[test]
fn BridgeError___from_serde_error___converts_to_serialization_error() {
    let json_err = serde_json::from_str::<String>("invalid").unwrap_err();

    let bridge_err: BridgeError = json_err.into();

    assert!(matches!(bridge_err, BridgeError::SerializationError(_)));
}
