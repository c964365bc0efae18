//! wvbridge-platform - Transports for concrete web view hosts
//!
//! Two ways of reaching a web view are supported:
//! - [`EvaluateScriptTransport`]: the host evaluates scripts synchronously and
//!   the page calls back through a [`JsInterface`] object (Android-style)
//! - [`SchemeInterceptTransport`]: the host evaluates scripts asynchronously
//!   and the page signals the host by navigating to `js2ios:` URLs
//!   (iOS-style)

mod evaluate;
mod intercept;

/// Page loaded on detach, so a recreated view starts without content that
/// could run before the bridge is installed again
pub(crate) const BLANK_SRC: &str = "";

pub use evaluate::{EvaluateScriptTransport, JS_INTERFACE_NAME, JsInterface, ScriptHost};
pub use intercept::{AsyncScriptHost, Interception, SchemeInterceptTransport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AsyncScriptHost, EvaluateScriptTransport, Interception, JsInterface,
        SchemeInterceptTransport, ScriptHost,
    };
}
