//! Payload codec
//!
//! Inbound payloads are decoded defensively: malformed JSON becomes
//! [`Parsed::Malformed`] instead of an error. Outbound values are encoded as
//! canonical JSON that can be spliced into a generated script.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use wvbridge_core::BridgeError;

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            CodecError::Deserialization(err.to_string())
        } else {
            CodecError::Serialization(err.to_string())
        }
    }
}

impl From<CodecError> for BridgeError {
    fn from(err: CodecError) -> Self {
        BridgeError::SerializationError(err.to_string())
    }
}

/// Outcome of decoding an inbound payload
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// The payload was well-formed JSON
    Value(Value),
    /// The payload could not be decoded
    Malformed,
}

impl Parsed {
    /// Check if decoding failed
    pub fn is_malformed(&self) -> bool {
        matches!(self, Parsed::Malformed)
    }

    /// Get the decoded value, if any
    pub fn into_value(self) -> Option<Value> {
        match self {
            Parsed::Value(v) => Some(v),
            Parsed::Malformed => None,
        }
    }

    /// Get the decoded value, or `raw` itself as a JSON string
    pub fn or_raw(self, raw: &str) -> Value {
        match self {
            Parsed::Value(v) => v,
            Parsed::Malformed => Value::String(raw.to_string()),
        }
    }
}

/// JSON codec implementation using serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create a new JSON codec
    pub fn new() -> Self {
        Self
    }

    /// Decode a raw payload, never failing
    pub fn parse(&self, raw: &str) -> Parsed {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Parsed::Value(value),
            Err(_) => Parsed::Malformed,
        }
    }

    /// Encode a value as compact JSON
    ///
    /// Strings are always emitted as JSON string literals, so embedded quotes
    /// and backslashes are escaped.
    pub fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError> {
        serde_json::to_string(value).map_err(Into::into)
    }

    /// Encode a value for embedding in a script fragment
    ///
    /// Same as [`serialize`](Self::serialize), but U+2028 and U+2029 are
    /// escaped: they are valid inside JSON strings but terminate lines in
    /// pre-ES2019 script engines.
    pub fn serialize_for_script<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<String, CodecError> {
        let json = self.serialize(value)?;
        if json.contains(&['\u{2028}', '\u{2029}'][..]) {
            Ok(json.replace('\u{2028}', "\\u2028").replace('\u{2029}', "\\u2029"))
        } else {
            Ok(json)
        }
    }

    /// Decode a JSON string to a typed value
    pub fn decode_str<T: DeserializeOwned>(&self, data: &str) -> Result<T, CodecError> {
        serde_json::from_str(data).map_err(Into::into)
    }
}
