//! Tracing layer that forwards to the host log callback

use crate::callback::LogCallbackManager;
use crate::reload::{ReloadHandle, convert_level_to_filter};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use wvbridge_core::{BridgeConfig, LogLevel};

/// Tracing layer that forwards log events to the host callback
pub struct HostLoggingLayer {
    manager: &'static LogCallbackManager,
}

impl HostLoggingLayer {
    /// Create a layer using the global callback manager
    pub fn new() -> Self {
        Self {
            manager: LogCallbackManager::global(),
        }
    }

    /// Create a layer with a specific callback manager
    pub fn with_manager(manager: &'static LogCallbackManager) -> Self {
        Self { manager }
    }

    fn convert_level(level: &Level) -> LogLevel {
        match *level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }
}

impl Default for HostLoggingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for HostLoggingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::convert_level(metadata.level());

        if !self.manager.is_enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.manager
            .log(level, metadata.target(), &visitor.into_message());
    }

    fn enabled(&self, metadata: &tracing::Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.manager.is_enabled(Self::convert_level(metadata.level()))
    }
}

/// Collects the message and structured fields of an event
///
/// Fields other than `message` are appended as `name=value`, so
/// `debug!(bridge_id = 3, "attached")` reaches the host as `attached bridge_id=3`.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn into_message(self) -> String {
        let mut out = self.message.unwrap_or_default();
        for field in self.fields {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&field);
        }
        out
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }
}

/// Initialize the logging system with the host layer
///
/// Installs a reloadable level filter in front of [`HostLoggingLayer`] and
/// registers it with [`ReloadHandle::global`]. Calling this more than once
/// leaves the first subscriber in place.
pub fn init_logging() {
    use tracing_subscriber::prelude::*;

    let level = LogCallbackManager::global().level();
    let (filter, handle) = tracing_subscriber::reload::Layer::new(convert_level_to_filter(level));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(HostLoggingLayer::new());

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        ReloadHandle::global().set_handle(handle);
    }
}

/// Initialize logging with a specific log level
pub fn init_logging_with_level(level: LogLevel) {
    LogCallbackManager::global().set_level(level);
    init_logging();
}

/// Initialize logging at the level named by a bridge configuration
pub fn init_logging_from_config(config: &BridgeConfig) {
    init_logging_with_level(config.level());
}
