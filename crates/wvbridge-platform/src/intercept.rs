//! Transport for hosts that signal the bridge by URL navigation

use crate::BLANK_SRC;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use wvbridge_core::BridgeConfig;
use wvbridge_runtime::DeferredExecutor;
use wvbridge_transport::{
    Execution, InboundHandler, Instruction, JsonCodec, TransportAdapter, TransportError,
};

/// A web view that evaluates scripts asynchronously and returns their result
#[async_trait]
pub trait AsyncScriptHost: Send + Sync {
    /// Evaluate `script`, resolving to the script's result as a string
    async fn evaluate_script(&self, script: &str) -> Result<String, TransportError>;

    /// Navigate to `url`
    fn load_url(&self, url: &str) -> Result<(), TransportError> {
        let _ = url;
        Ok(())
    }
}

/// Message encoded in an intercepted URL
#[derive(Debug, Deserialize)]
struct SchemeMessage {
    #[serde(rename = "eventName")]
    event_name: String,
    #[serde(rename = "resId", default)]
    res_id: Value,
}

/// What [`SchemeInterceptTransport::intercept_request`] made of a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interception {
    /// Ordinary navigation; let it proceed
    NotBridgeRequest,
    /// Bridge URL whose message could not be read
    Malformed,
    /// Bridge URL arriving while no bridge is attached
    Detached,
    /// The payload is being fetched and will be delivered inbound
    Fetching,
}

impl Interception {
    /// Check if the URL was addressed to the bridge
    pub fn is_bridge_request(&self) -> bool {
        !matches!(self, Interception::NotBridgeRequest)
    }
}

/// Runs instructions through an [`AsyncScriptHost`] on the runtime
///
/// The page cannot call the host directly. It navigates to
/// `<scheme prefix><percent-encoded {"eventName", "resId"}>`; the host passes
/// such URLs to [`intercept_request`](Self::intercept_request), which fetches
/// the payload with `_getIOSResponse(resId)` and delivers it inbound.
pub struct SchemeInterceptTransport {
    host: Arc<dyn AsyncScriptHost>,
    executor: DeferredExecutor,
    codec: JsonCodec,
    scheme_prefix: String,
    entrypoint: String,
    init_src: Option<String>,
    inbound: RwLock<Option<Arc<dyn InboundHandler>>>,
}

impl SchemeInterceptTransport {
    pub fn new(
        host: Arc<dyn AsyncScriptHost>,
        executor: DeferredExecutor,
        config: &BridgeConfig,
    ) -> Self {
        Self {
            host,
            executor,
            codec: JsonCodec::new(),
            scheme_prefix: config.scheme_prefix.clone(),
            entrypoint: config.entrypoint.clone(),
            init_src: config.init_src.clone(),
            inbound: RwLock::new(None),
        }
    }

    /// Check if intercepted URLs are currently delivered
    pub fn is_attached(&self) -> bool {
        self.inbound.read().is_some()
    }

    /// Inspect a URL the web view is about to load
    pub fn intercept_request(&self, url: &str) -> Interception {
        let Some(encoded) = url.strip_prefix(self.scheme_prefix.as_str()) else {
            return Interception::NotBridgeRequest;
        };

        let Some(inbound) = self.inbound.read().clone() else {
            tracing::debug!("Bridge request while detached");
            return Interception::Detached;
        };

        let decoded = match urlencoding::decode(encoded) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!(error = %e, "Bridge request is not valid UTF-8");
                return Interception::Malformed;
            }
        };

        let message: SchemeMessage = match self.codec.decode_str(&decoded) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(error = %e, "Bridge request carries no readable message");
                return Interception::Malformed;
            }
        };

        let script = match Instruction::fetch(message.res_id).render(&self.entrypoint) {
            Ok(script) => script,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to render response fetch");
                return Interception::Malformed;
            }
        };

        let host = self.host.clone();
        let event_name = message.event_name;
        self.executor.spawn(async move {
            match host.evaluate_script(&script).await {
                Ok(data) => inbound.on_message(&event_name, &data),
                Err(e) => {
                    tracing::warn!(event = %event_name, error = %e, "Failed to fetch web view response")
                }
            }
        });

        Interception::Fetching
    }
}

impl TransportAdapter for SchemeInterceptTransport {
    fn execute(&self, instruction: &str) -> Execution {
        let host = self.host.clone();
        let script = instruction.to_string();
        Execution::Deferred(
            self.executor
                .run(async move { host.evaluate_script(&script).await }),
        )
    }

    fn attach(&self, inbound: Arc<dyn InboundHandler>) -> Result<(), TransportError> {
        *self.inbound.write() = Some(inbound);
        if let Some(src) = &self.init_src {
            tracing::debug!(src = %src, "Loading initial page");
            if let Err(e) = self.host.load_url(src) {
                *self.inbound.write() = None;
                return Err(e);
            }
        }
        Ok(())
    }

    fn detach(&self) {
        *self.inbound.write() = None;
        if let Err(e) = self.host.load_url(BLANK_SRC) {
            tracing::warn!(error = %e, "Failed to blank the page on detach");
        }
    }
}
