//! Pending remote calls and their correlation ids

use crate::registry::ProcessState;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifies one remote call: `"<bridge id>#<call sequence>"`
///
/// The sequence comes from a process-wide counter, so ids never collide even
/// across bridges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallId {
    bridge_id: u64,
    seq: u64,
}

impl CallId {
    pub fn new(bridge_id: u64, seq: u64) -> Self {
        Self { bridge_id, seq }
    }

    /// Bridge that issued the call
    pub fn bridge_id(&self) -> u64 {
        self.bridge_id
    }

    /// Process-wide call sequence number
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.bridge_id, self.seq)
    }
}

/// A request id that is not of the form `<u64>#<u64>`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid call id: {0:?}")]
pub struct InvalidCallId(pub String);

impl FromStr for CallId {
    type Err = InvalidCallId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidCallId(s.to_string());
        let (bridge, seq) = s.split_once('#').ok_or_else(invalid)?;
        Ok(CallId {
            bridge_id: bridge.parse().map_err(|_| invalid())?,
            seq: seq.parse().map_err(|_| invalid())?,
        })
    }
}

/// Callback receiving the peer's response value
pub type ResponseCallback = Box<dyn FnOnce(Value) + Send>;

/// Success and error handlers for one remote call, both optional
#[derive(Default)]
pub struct CallCallbacks {
    on_success: Option<ResponseCallback>,
    on_error: Option<ResponseCallback>,
}

impl CallCallbacks {
    /// No handlers; the response is discarded
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a successful response
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Value) + Send + 'static,
    {
        self.on_success = Some(Box::new(f));
        self
    }

    /// Handle an error response
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Value) + Send + 'static,
    {
        self.on_error = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for CallCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallCallbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// What happened to an inbound response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The success handler ran
    Success,
    /// The error handler ran
    Error,
    /// The call was pending but had no handler for this outcome
    NoHandler,
    /// No call is pending under this id
    Unresolved,
}

#[derive(Default)]
struct PendingCalls {
    calls: HashMap<CallId, CallCallbacks>,
    closed: bool,
}

/// Pending remote calls of one bridge
///
/// An entry is removed when its response arrives, so each call resolves at
/// most once and the table only holds calls still waiting for an answer.
/// Once closed, the table stays empty.
#[derive(Default)]
pub struct CorrelationTable {
    pending: Mutex<PendingCalls>,
}

impl CorrelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `callbacks` under a fresh id for `bridge_id`
    ///
    /// Returns `None` and drops `callbacks` once the table is closed.
    pub fn reserve(
        &self,
        process: &ProcessState,
        bridge_id: u64,
        callbacks: CallCallbacks,
    ) -> Option<CallId> {
        let mut pending = self.pending.lock();
        if pending.closed {
            return None;
        }
        let id = CallId::new(bridge_id, process.next_call_seq());
        pending.calls.insert(id, callbacks);
        Some(id)
    }

    /// Run the handler matching `is_error` for `id`
    ///
    /// Handlers run after the table lock is released.
    pub fn resolve(&self, id: &CallId, is_error: bool, response: Value) -> Resolution {
        let entry = self.pending.lock().calls.remove(id);
        let Some(callbacks) = entry else {
            return Resolution::Unresolved;
        };

        let (handler, resolution) = if is_error {
            (callbacks.on_error, Resolution::Error)
        } else {
            (callbacks.on_success, Resolution::Success)
        };

        match handler {
            Some(handler) => {
                handler(response);
                resolution
            }
            None => Resolution::NoHandler,
        }
    }

    /// Forget a pending call without running either handler
    pub fn discard(&self, id: &CallId) -> bool {
        self.pending.lock().calls.remove(id).is_some()
    }

    /// Check if a call is still pending
    pub fn contains(&self, id: &CallId) -> bool {
        self.pending.lock().calls.contains_key(id)
    }

    /// Number of pending calls
    pub fn len(&self) -> usize {
        self.pending.lock().calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Refuse further reservations and drop every pending call
    ///
    /// Returns how many calls were dropped. The callbacks are dropped after
    /// the lock is released.
    pub fn close(&self) -> usize {
        let drained = {
            let mut pending = self.pending.lock();
            pending.closed = true;
            std::mem::take(&mut pending.calls)
        };
        drained.len()
    }

    pub fn is_closed(&self) -> bool {
        self.pending.lock().closed
    }
}
