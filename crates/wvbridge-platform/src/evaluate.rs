//! Transport for hosts that evaluate scripts synchronously

use crate::BLANK_SRC;
use std::sync::Arc;
use wvbridge_core::{BridgeConfig, BridgeResult};
use wvbridge_dispatch::{Bridge, ProcessState};
use wvbridge_transport::{Execution, InboundHandler, TransportAdapter, TransportError};

/// Name under which the [`JsInterface`] is exposed to the page
pub const JS_INTERFACE_NAME: &str = "androidWebViewInterface";

/// A web view that runs scripts without returning their result
pub trait ScriptHost: Send + Sync {
    /// Evaluate `script` in the page
    fn evaluate_script(&self, script: &str) -> Result<(), TransportError>;

    /// Navigate to `url`
    fn load_url(&self, url: &str) -> Result<(), TransportError>;

    /// Platform API level; decides how scripts are run
    fn api_level(&self) -> u32;

    /// Turn on script execution in the page
    fn enable_javascript(&self) -> Result<(), TransportError>;

    /// Expose `interface` to the page's scripts under `name`
    fn add_javascript_interface(
        &self,
        name: &str,
        interface: JsInterface,
    ) -> Result<(), TransportError>;

    /// Withdraw an interface added with [`add_javascript_interface`](Self::add_javascript_interface)
    fn remove_javascript_interface(&self, name: &str) {
        let _ = name;
    }
}

/// Object the page calls to reach the host
///
/// It only knows the id of its bridge; messages are routed through the
/// process registry, so a destroyed bridge simply stops receiving them.
#[derive(Clone)]
pub struct JsInterface {
    webview_id: String,
    process: Arc<ProcessState>,
}

impl JsInterface {
    pub fn new(bridge_id: u64, process: Arc<ProcessState>) -> Self {
        Self {
            webview_id: bridge_id.to_string(),
            process,
        }
    }

    /// Id the page passes back with every message
    pub fn webview_id(&self) -> &str {
        &self.webview_id
    }

    /// Entry point called by the page
    ///
    /// Returns `false` if no live bridge has `webview_id`.
    pub fn on_webview_event(&self, webview_id: &str, event_name: &str, json_data: &str) -> bool {
        match webview_id.parse::<u64>() {
            Ok(bridge_id) => self.process.route(bridge_id, event_name, json_data),
            Err(_) => {
                tracing::debug!(webview_id, event = event_name, "Ignoring event with malformed web view id");
                false
            }
        }
    }
}

impl std::fmt::Debug for JsInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsInterface")
            .field("webview_id", &self.webview_id)
            .finish()
    }
}

/// Runs instructions through a [`ScriptHost`]
///
/// Hosts below `min_evaluate_api_level` cannot evaluate scripts directly and
/// get a `javascript:` URL instead. Inbound traffic does not pass through this
/// type; it arrives on the [`JsInterface`] installed by [`connect`](Self::connect).
pub struct EvaluateScriptTransport {
    host: Arc<dyn ScriptHost>,
    min_api_level: u32,
    init_src: Option<String>,
}

impl EvaluateScriptTransport {
    pub fn new(host: Arc<dyn ScriptHost>, config: &BridgeConfig) -> Self {
        Self {
            host,
            min_api_level: config.min_evaluate_api_level,
            init_src: config.init_src.clone(),
        }
    }

    /// Build a bridge over `host`, install its [`JsInterface`] and attach
    ///
    /// Enables scripts and adds the interface before `init_src` is loaded, so
    /// the first page can already see it. Call it once the view is loaded.
    pub fn connect(
        host: Arc<dyn ScriptHost>,
        process: Arc<ProcessState>,
        config: BridgeConfig,
    ) -> BridgeResult<Bridge> {
        let transport = Arc::new(Self::new(host.clone(), &config));
        let bridge = Bridge::new(transport, process.clone(), config)?;

        let interface = JsInterface::new(bridge.id(), process);
        let installed = host
            .enable_javascript()
            .and_then(|()| host.add_javascript_interface(JS_INTERFACE_NAME, interface));
        if let Err(e) = installed {
            bridge.destroy();
            return Err(e.into());
        }

        bridge.attach()?;
        Ok(bridge)
    }

    /// Check if scripts go through `evaluate_script` rather than a URL
    pub fn uses_evaluate(&self) -> bool {
        self.host.api_level() >= self.min_api_level
    }
}

impl TransportAdapter for EvaluateScriptTransport {
    fn execute(&self, instruction: &str) -> Execution {
        let result = if self.uses_evaluate() {
            self.host.evaluate_script(instruction)
        } else {
            self.host.load_url(&format!("javascript:{instruction}"))
        };

        match result {
            Ok(()) => Execution::Sent,
            Err(e) => Execution::Failed(e),
        }
    }

    fn attach(&self, _inbound: Arc<dyn InboundHandler>) -> Result<(), TransportError> {
        if let Some(src) = &self.init_src {
            tracing::debug!(src = %src, "Loading initial page");
            self.host.load_url(src)?;
        }
        Ok(())
    }

    fn detach(&self) {
        if let Err(e) = self.host.load_url(BLANK_SRC) {
            tracing::warn!(error = %e, "Failed to blank the page on detach");
        }
        self.host.remove_javascript_interface(JS_INTERFACE_NAME);
    }
}
