//! wvbridge-core - Core error, lifecycle and configuration types
//!
//! This crate provides the foundational types shared by every wvbridge crate:
//! - [`BridgeState`] for the bridge lifecycle
//! - [`BridgeError`] for error handling
//! - [`BridgeConfig`] for bridge configuration
//! - [`CALL_RESPONSE_EVENT`], the event name reserved for call responses

mod config;
mod error;
mod lifecycle;

pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult};
pub use lifecycle::{AtomicBridgeState, BridgeState};

/// Event name the remote peer uses to answer a remote function call.
///
/// Listeners can never be attached to or detached from this name.
pub const CALL_RESPONSE_EVENT: &str = "_jsCallResponse";

/// Log levels forwarded to the host log callback
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Off,
        }
    }

    /// Parse a level name as written in [`BridgeConfig::log_level`]
    ///
    /// Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            "off" => Some(LogLevel::Off),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BridgeConfig, BridgeError, BridgeResult, BridgeState, CALL_RESPONSE_EVENT, LogLevel,
    };
}

#[cfg(test)]
mod lib_tests;
