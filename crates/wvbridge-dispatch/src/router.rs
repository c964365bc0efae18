//! Event listener registration and fan-out

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use wvbridge_core::{BridgeError, BridgeResult, CALL_RESPONSE_EVENT};

/// Whether dispatch continues to the next listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

impl From<()> for Propagation {
    fn from(_: ()) -> Self {
        Propagation::Continue
    }
}

impl From<bool> for Propagation {
    fn from(keep_going: bool) -> Self {
        if keep_going {
            Propagation::Continue
        } else {
            Propagation::Stop
        }
    }
}

/// A shared event callback
///
/// Listeners are compared by identity: a clone is the same listener, two
/// listeners built from identical closures are not.
#[derive(Clone)]
pub struct Listener(Arc<dyn Fn(&Value) -> Propagation + Send + Sync>);

impl Listener {
    /// Wrap a closure returning `()` (always continue) or `bool` (`false` stops)
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Propagation>,
    {
        Self(Arc::new(move |payload: &Value| f(payload).into()))
    }

    pub fn call(&self, payload: &Value) -> Propagation {
        (self.0)(payload)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

/// Fails for the name reserved for call responses
pub(crate) fn ensure_not_reserved(event_name: &str) -> BridgeResult<()> {
    if event_name == CALL_RESPONSE_EVENT {
        return Err(BridgeError::ReservedEventName(event_name.to_string()));
    }
    Ok(())
}

/// Ordered listener lists keyed by event name
#[derive(Default)]
pub struct EventRouter {
    listeners: RwLock<Listeners>,
}

#[derive(Default)]
struct Listeners {
    by_event: HashMap<String, Vec<Listener>>,
    closed: bool,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener for `event_name`
    ///
    /// After [`close`](Self::close) the listener is dropped without being
    /// registered.
    pub fn register(&self, event_name: &str, listener: Listener) -> BridgeResult<()> {
        ensure_not_reserved(event_name)?;
        let mut listeners = self.listeners.write();
        if listeners.closed {
            tracing::debug!(event = event_name, "Router closed, listener not registered");
            return Ok(());
        }
        listeners
            .by_event
            .entry(event_name.to_string())
            .or_default()
            .push(listener);
        Ok(())
    }

    /// Remove one listener (every occurrence of it) or, with `None`, all
    /// listeners of `event_name`
    ///
    /// Returns how many listeners were removed.
    pub fn deregister(&self, event_name: &str, listener: Option<&Listener>) -> BridgeResult<usize> {
        ensure_not_reserved(event_name)?;
        let mut guard = self.listeners.write();
        let listeners = &mut guard.by_event;

        let removed = match listener {
            None => listeners.remove(event_name).map_or(0, |list| list.len()),
            Some(target) => {
                let Some(list) = listeners.get_mut(event_name) else {
                    return Ok(0);
                };
                let before = list.len();
                list.retain(|l| l != target);
                let removed = before - list.len();
                if list.is_empty() {
                    listeners.remove(event_name);
                }
                removed
            }
        };
        Ok(removed)
    }

    /// Invoke the listeners of `event_name` in registration order
    ///
    /// Listeners run on a snapshot taken before the first call, so they may
    /// register or deregister freely. Returns how many ran.
    pub fn dispatch(&self, event_name: &str, payload: &Value) -> usize {
        let snapshot = match self.listeners.read().by_event.get(event_name) {
            Some(list) => list.clone(),
            None => return 0,
        };

        let mut invoked = 0;
        for listener in &snapshot {
            invoked += 1;
            if listener.call(payload) == Propagation::Stop {
                break;
            }
        }
        invoked
    }

    /// Number of listeners registered for `event_name`
    pub fn listener_count(&self, event_name: &str) -> usize {
        self.listeners.read().by_event.get(event_name).map_or(0, Vec::len)
    }

    /// Event names with at least one listener
    pub fn event_names(&self) -> Vec<String> {
        self.listeners.read().by_event.keys().cloned().collect()
    }

    /// Drop every listener and ignore later registrations
    pub fn close(&self) {
        let drained = {
            let mut listeners = self.listeners.write();
            listeners.closed = true;
            std::mem::take(&mut listeners.by_event)
        };
        drop(drained);
    }

    pub fn is_closed(&self) -> bool {
        self.listeners.read().closed
    }
}
