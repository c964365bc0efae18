//! Property-based tests for the payload codec and wire messages
//!
//! Tests that decoding never panics on arbitrary input, that encoded values
//! decode back to the same structure, and that rendered instructions keep
//! their payload intact.

use proptest::prelude::*;
use serde_json::Value;
use wvbridge_transport::{CallResponse, Instruction, JsonCodec, Parsed};

// Strategy: Generate JSON values including nested containers
fn arb_json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|i| Value::Number(i.into())),
        ".*".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z_\"\\\\ ]{0,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

// Strategy: Generate names that may contain characters needing escapes
fn arb_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_\"'\\\\ \u{2028}]{0,40}"
}

/// Pull the argument list back out of a rendered instruction
fn rendered_args<'a>(script: &'a str, entrypoint: &str, method: &str) -> &'a str {
    let prefix = format!("{}.{}(", entrypoint, method);
    script
        .strip_prefix(prefix.as_str())
        .and_then(|rest| rest.strip_suffix(");"))
        .expect("rendered instruction should have the call shape")
}

proptest! {
    /// Property: parse never panics and reports malformed input with the sentinel
    #[test]
    fn proptest_parse_never_panics(raw in ".*") {
        let codec = JsonCodec::new();
        let parsed = codec.parse(&raw);
        let strict = serde_json::from_str::<Value>(&raw).is_ok();
        prop_assert_eq!(parsed.is_malformed(), !strict);
    }

    /// Property: parse(serialize(parse(s))) is the same structure as parse(s)
    #[test]
    fn proptest_parse_serialize_roundtrip(value in arb_json_value()) {
        let codec = JsonCodec::new();
        let text = serde_json::to_string(&value).expect("value should encode");

        let first = codec.parse(&text).into_value().expect("well-formed input");
        let encoded = codec.serialize(&first).expect("decoded value should encode");
        let second = codec.parse(&encoded).into_value().expect("re-encoded input");

        prop_assert_eq!(first, second);
    }

    /// Property: script encoding decodes to the original value
    #[test]
    fn proptest_script_encoding_preserves_value(value in arb_json_value()) {
        let codec = JsonCodec::new();
        let encoded = codec.serialize_for_script(&value).expect("should encode");

        prop_assert!(!encoded.contains('\u{2028}'), "encoded output contains raw U+2028");
        prop_assert_eq!(codec.parse(&encoded), Parsed::Value(value));
    }

    /// Property: emit instructions carry name and payload as a JSON argument list
    #[test]
    fn proptest_emit_instruction_preserves_arguments(
        name in arb_name(),
        payload in arb_json_value()
    ) {
        let script = Instruction::emit(name.clone(), payload.clone())
            .render("window.peer")
            .expect("should render");

        let args = rendered_args(&script, "window.peer", "_onNativeEvent");
        let decoded: Value = serde_json::from_str(&format!("[{}]", args))
            .expect("argument list should be valid JSON");

        prop_assert_eq!(decoded, Value::Array(vec![Value::String(name), payload]));
    }

    /// Property: call responses survive a JSON round trip through from_payload
    #[test]
    fn proptest_call_response_roundtrip(
        bridge in 1u64..1000,
        seq in 1u64..1_000_000,
        is_error in any::<bool>(),
        response in arb_json_value()
    ) {
        let original = CallResponse {
            request_id: format!("{}#{}", bridge, seq),
            is_error,
            response,
        };
        let json = original.to_json().expect("should encode");
        let payload: Value = serde_json::from_str(&json).expect("should decode");

        prop_assert_eq!(CallResponse::from_payload(&payload), Some(original));
    }
}

#[test]
fn test_empty_payload_is_malformed() {
    assert!(JsonCodec::new().parse("").is_malformed());
}

#[test]
fn test_whitespace_wrapped_json_is_value() {
    let parsed = JsonCodec::new().parse("  [1, 2]  ");
    assert_eq!(parsed, Parsed::Value(serde_json::json!([1, 2])));
}
