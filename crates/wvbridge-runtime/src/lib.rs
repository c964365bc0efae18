//! wvbridge-runtime - Tokio runtime integration
//!
//! This crate provides:
//! - [`AsyncRuntime`] for managing the Tokio runtime deferred transports run on
//! - [`DeferredExecutor`] for turning script evaluations into deferred results
//! - Shutdown that interrupts in-flight evaluations and waits for them to settle

mod executor;
mod runtime;

pub use executor::DeferredExecutor;
pub use runtime::{AsyncRuntime, RuntimeConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{AsyncRuntime, DeferredExecutor, RuntimeConfig};
}
