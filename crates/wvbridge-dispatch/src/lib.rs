//! wvbridge-dispatch - Call correlation, event routing and the bridge core
//!
//! This crate provides:
//! - [`Bridge`], one channel between the host and a single web view
//! - [`ProcessState`], the process-scoped id counters and bridge registry
//! - [`CorrelationTable`] for pending remote calls keyed by [`CallId`]
//! - [`EventRouter`] for ordered, short-circuiting event listeners

mod bridge;
mod correlation;
mod registry;
mod router;

#[cfg(test)]
mod test_support;

pub use bridge::{Bridge, InboundOutcome, OutboundCall, ResponseFuture};
pub use correlation::{CallCallbacks, CallId, CorrelationTable, InvalidCallId, Resolution};
pub use registry::ProcessState;
pub use router::{EventRouter, Listener, Propagation};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Bridge, CallCallbacks, CallId, InboundOutcome, Listener, OutboundCall, ProcessState,
        Propagation, Resolution,
    };
}
