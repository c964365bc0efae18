//! Bridge configuration types

use crate::{BridgeError, BridgeResult, LogLevel};
use serde::{Deserialize, Serialize};

/// Bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Global object in the web view that implements the peer protocol
    ///
    /// Instructions are rendered as `<entrypoint>._onNativeEvent(...)` and
    /// `<entrypoint>._callJSFunction(...)`.
    #[serde(default = "default_entrypoint")]
    pub entrypoint: String,

    /// URL prefix the web view navigates to when it signals the host
    ///
    /// Only used by interception-based transports.
    #[serde(default = "default_scheme_prefix")]
    pub scheme_prefix: String,

    /// Lowest platform API level that supports direct script evaluation
    ///
    /// Older hosts fall back to loading a `javascript:` URL.
    #[serde(default = "default_min_evaluate_api_level")]
    pub min_evaluate_api_level: u32,

    /// URL to load once the transport is attached
    #[serde(default)]
    pub init_src: Option<String>,

    /// Number of async worker threads for deferred transports
    /// (default: number of CPU cores)
    #[serde(default)]
    pub worker_threads: Option<usize>,

    /// Initial log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Shutdown timeout in milliseconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_ms: u64,
}

fn default_entrypoint() -> String {
    "window.nsWebViewInterface".to_string()
}

fn default_scheme_prefix() -> String {
    "js2ios:".to_string()
}

fn default_min_evaluate_api_level() -> u32 {
    19
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_shutdown_timeout() -> u64 {
    5000
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            entrypoint: default_entrypoint(),
            scheme_prefix: default_scheme_prefix(),
            min_evaluate_api_level: default_min_evaluate_api_level(),
            init_src: None,
            worker_threads: None,
            log_level: default_log_level(),
            shutdown_timeout_ms: default_shutdown_timeout(),
        }
    }
}

impl BridgeConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes
    ///
    /// Empty input yields the defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    /// Set the peer entrypoint object
    pub fn with_entrypoint(mut self, entrypoint: impl Into<String>) -> Self {
        self.entrypoint = entrypoint.into();
        self
    }

    /// Set the URL scheme prefix used for peer-originated messages
    pub fn with_scheme_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.scheme_prefix = prefix.into();
        self
    }

    /// Set the URL to load after the transport attaches
    pub fn with_init_src(mut self, src: impl Into<String>) -> Self {
        self.init_src = Some(src.into());
        self
    }

    /// Parsed log level, falling back to `Info` for unknown names
    pub fn level(&self) -> LogLevel {
        LogLevel::from_name(&self.log_level).unwrap_or(LogLevel::Info)
    }

    /// Shutdown timeout as a [`std::time::Duration`]
    pub fn shutdown_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// Check that the configuration can produce well-formed instructions
    pub fn validate(&self) -> BridgeResult<()> {
        if self.entrypoint.trim().is_empty() {
            return Err(BridgeError::ConfigError(
                "entrypoint must not be empty".to_string(),
            ));
        }
        if self.scheme_prefix.is_empty() {
            return Err(BridgeError::ConfigError(
                "scheme_prefix must not be empty".to_string(),
            ));
        }
        if LogLevel::from_name(&self.log_level).is_none() {
            return Err(BridgeError::ConfigError(format!(
                "unknown log level: {}",
                self.log_level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;

#[cfg(test)]
#[path = "config/config_parameterized_tests.rs"]
mod config_parameterized_tests;
