//! wvbridge-logging - Tracing to host log callback bridge
//!
//! This crate provides:
//! - [`HostLoggingLayer`] tracing layer that forwards logs to the host
//! - [`LogCallback`] type for the host log callback
//! - Dynamic log level filtering through [`ReloadHandle`]

mod callback;
mod layer;
mod reload;

pub use callback::{LogCallback, LogCallbackManager};
pub use layer::{HostLoggingLayer, init_logging, init_logging_from_config, init_logging_with_level};
pub use reload::ReloadHandle;
pub use wvbridge_core::LogLevel;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{HostLoggingLayer, LogCallback, LogCallbackManager, LogLevel, init_logging};
}
