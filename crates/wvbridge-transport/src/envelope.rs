//! Wire messages exchanged with the web view peer
//!
//! Outbound traffic is a script [`Instruction`] evaluated against the peer's
//! entrypoint object. Inbound call results arrive as a [`CallResponse`]
//! payload on the reserved call-response event.

use crate::codec::{CodecError, JsonCodec};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Instruction handed to a transport for execution in the web view
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Deliver a fire-and-forget event to the peer
    EmitEvent { event_name: String, payload: Value },

    /// Invoke a global function in the peer, tagging its answer with `request_id`
    CallFunction {
        request_id: String,
        function_name: String,
        args: Vec<Value>,
    },

    /// Ask the peer for a queued message body by its response id
    ///
    /// Used by interception-based transports, where the URL that signals the
    /// host is too small to carry the payload itself.
    FetchResponse { response_id: Value },
}

impl Instruction {
    /// Create an emit instruction
    pub fn emit(event_name: impl Into<String>, payload: Value) -> Self {
        Instruction::EmitEvent {
            event_name: event_name.into(),
            payload,
        }
    }

    /// Create a call instruction
    pub fn call(
        request_id: impl Into<String>,
        function_name: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        Instruction::CallFunction {
            request_id: request_id.into(),
            function_name: function_name.into(),
            args,
        }
    }

    /// Create a fetch instruction
    pub fn fetch(response_id: Value) -> Self {
        Instruction::FetchResponse { response_id }
    }

    /// Name of the peer method this instruction invokes
    pub fn method(&self) -> &'static str {
        match self {
            Instruction::EmitEvent { .. } => "_onNativeEvent",
            Instruction::CallFunction { .. } => "_callJSFunction",
            Instruction::FetchResponse { .. } => "_getIOSResponse",
        }
    }

    /// Render the script text for the given peer entrypoint
    ///
    /// Every argument, names included, is encoded as JSON so quotes inside
    /// event names, function names or payloads cannot break the script.
    pub fn render(&self, entrypoint: &str) -> Result<String, CodecError> {
        let codec = JsonCodec::new();
        let args = match self {
            Instruction::EmitEvent {
                event_name,
                payload,
            } => format!(
                "{},{}",
                codec.serialize_for_script(event_name)?,
                codec.serialize_for_script(payload)?
            ),
            Instruction::CallFunction {
                request_id,
                function_name,
                args,
            } => format!(
                "{},{},{}",
                codec.serialize_for_script(request_id)?,
                codec.serialize_for_script(function_name)?,
                codec.serialize_for_script(args)?
            ),
            Instruction::FetchResponse { response_id } => {
                codec.serialize_for_script(response_id)?
            }
        };
        Ok(format!("{}.{}({});", entrypoint, self.method(), args))
    }
}

/// Answer to a remote function call, sent by the peer on the call-response event
///
/// Wire shape: `{ "reqId": string, "isError": boolean, "response": any }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResponse {
    /// Correlation id the call was issued with
    #[serde(rename = "reqId")]
    pub request_id: String,

    /// Whether the peer's function threw
    #[serde(rename = "isError", default)]
    pub is_error: bool,

    /// Return value or error value
    #[serde(default)]
    pub response: Value,
}

impl CallResponse {
    /// Create a success response
    pub fn success(request_id: impl Into<String>, response: Value) -> Self {
        Self {
            request_id: request_id.into(),
            is_error: false,
            response,
        }
    }

    /// Create an error response
    pub fn error(request_id: impl Into<String>, response: Value) -> Self {
        Self {
            request_id: request_id.into(),
            is_error: true,
            response,
        }
    }

    /// Extract a response from a decoded inbound payload
    ///
    /// Lenient about what peers actually send: a numeric `reqId` is accepted,
    /// and `isError` is read by truthiness. Returns `None` when the payload is
    /// not an object or carries no usable `reqId`.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let obj = payload.as_object()?;
        let request_id = match obj.get("reqId")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let is_error = obj.get("isError").is_some_and(is_truthy);
        let response = obj.get("response").cloned().unwrap_or(Value::Null);
        Some(Self {
            request_id,
            is_error,
            response,
        })
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
