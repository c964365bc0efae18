//! # wvbridge
//!
//! A bidirectional message bridge between a native host and the content of an
//! embedded web view.
//!
//! wvbridge provides:
//! - Named events in both directions, with ordered listeners that can stop
//!   propagation
//! - Remote function calls into the page, answered through success and error
//!   callbacks or a future
//! - Transports for script-evaluating hosts and URL-interception hosts
//! - Logging callbacks to the host
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use wvbridge::prelude::*;
//!
//! let bridge = EvaluateScriptTransport::connect(
//!     Arc::new(my_web_view),
//!     ProcessState::global(),
//!     BridgeConfig::default(),
//! )?;
//!
//! bridge.on_fn("loaded", |page: &Value| {
//!     tracing::info!(%page, "page loaded");
//! })?;
//!
//! bridge.emit("theme", &json!({"dark": true}))?;
//!
//! bridge.call_remote_function(
//!     "getTitle",
//!     &Value::Null,
//!     CallCallbacks::new()
//!         .on_success(|title| tracing::info!(%title, "title"))
//!         .on_error(|err| tracing::warn!(%err, "getTitle failed")),
//! )?;
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`wvbridge_core`] - Errors, configuration and bridge lifecycle
//! - [`wvbridge_transport`] - Payload codec, wire instructions and the transport trait
//! - [`wvbridge_dispatch`] - The bridge, call correlation and event routing
//! - [`wvbridge_platform`] - Concrete web view transports
//! - [`wvbridge_runtime`] - Tokio runtime for deferred transports
//! - [`wvbridge_logging`] - Forwarding `tracing` events to the host

// Re-export core types
pub use wvbridge_core::{
    BridgeConfig, BridgeError, BridgeResult, BridgeState, CALL_RESPONSE_EVENT, LogLevel,
};

// Re-export transport types
pub use wvbridge_transport::{
    CallResponse, Execution, InboundHandler, Instruction, JsonCodec, Parsed, TransportAdapter,
    TransportError,
};

// Re-export the bridge
pub use wvbridge_dispatch::{
    Bridge, CallCallbacks, CallId, InboundOutcome, Listener, OutboundCall, ProcessState,
    Propagation, Resolution, ResponseFuture,
};

// Re-export platform transports
pub use wvbridge_platform::{
    AsyncScriptHost, EvaluateScriptTransport, Interception, JsInterface, SchemeInterceptTransport,
    ScriptHost,
};

// Re-export runtime and logging
pub use wvbridge_logging::{
    HostLoggingLayer, LogCallback, LogCallbackManager, ReloadHandle, init_logging,
    init_logging_from_config,
};
pub use wvbridge_runtime::{AsyncRuntime, DeferredExecutor, RuntimeConfig};

// Re-export common dependencies that hosts need
pub use async_trait::async_trait;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;

/// Prelude module for convenient imports.
///
/// Use `use wvbridge::prelude::*;` to import commonly used types.
pub mod prelude {
    // Bridge and its callbacks
    pub use crate::{
        Bridge, BridgeConfig, BridgeError, BridgeResult, BridgeState, CallCallbacks, Execution,
        Listener, ProcessState, Propagation,
    };

    // Transports
    pub use crate::{
        AsyncScriptHost, EvaluateScriptTransport, SchemeInterceptTransport, ScriptHost,
        TransportAdapter, TransportError, async_trait,
    };

    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
}
