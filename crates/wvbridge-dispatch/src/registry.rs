//! Process-scoped bridge registry and id counters

use crate::bridge::{Bridge, BridgeShared};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Global process state
static PROCESS_STATE: OnceCell<Arc<ProcessState>> = OnceCell::new();

/// State shared by every bridge in a process
///
/// Holds the bridge and call counters plus a registry used to route inbound
/// messages that arrive carrying only a bridge id. The registry stores weak
/// references; it never keeps a bridge alive.
pub struct ProcessState {
    bridges: DashMap<u64, Weak<BridgeShared>>,
    next_bridge_id: AtomicU64,
    next_call_seq: AtomicU64,
}

impl ProcessState {
    /// Create an isolated process state
    pub fn new() -> Self {
        Self {
            bridges: DashMap::new(),
            next_bridge_id: AtomicU64::new(1),
            next_call_seq: AtomicU64::new(1),
        }
    }

    /// Get the shared process state
    pub fn global() -> Arc<ProcessState> {
        PROCESS_STATE
            .get_or_init(|| Arc::new(ProcessState::new()))
            .clone()
    }

    /// Allocate the next bridge id
    pub fn next_bridge_id(&self) -> u64 {
        self.next_bridge_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Allocate the next call sequence number
    pub fn next_call_seq(&self) -> u64 {
        self.next_call_seq.fetch_add(1, Ordering::SeqCst)
    }

    pub(crate) fn register(&self, id: u64, bridge: Weak<BridgeShared>) {
        self.bridges.insert(id, bridge);
    }

    /// Look up a live bridge by id
    pub fn get(&self, id: u64) -> Option<Bridge> {
        // Clone the weak ref first so the shard lock is released before a
        // bridge can be dropped.
        let weak = self.bridges.get(&id).map(|r| r.value().clone())?;
        match weak.upgrade() {
            Some(shared) => Some(Bridge::from_shared(shared)),
            None => {
                self.bridges.remove_if(&id, |_, w| w.strong_count() == 0);
                None
            }
        }
    }

    /// Remove a bridge from the registry
    pub fn remove(&self, id: u64) -> bool {
        self.bridges.remove(&id).is_some()
    }

    /// Check if a bridge id is registered
    pub fn contains(&self, id: u64) -> bool {
        self.bridges.contains_key(&id)
    }

    /// Deliver an inbound message to the bridge registered under `bridge_id`
    ///
    /// Returns `false` if no live bridge has that id.
    pub fn route(&self, bridge_id: u64, event_name: &str, raw_payload: &str) -> bool {
        match self.get(bridge_id) {
            Some(bridge) => {
                bridge.handle_inbound_message(event_name, raw_payload);
                true
            }
            None => {
                tracing::debug!(bridge_id, event = event_name, "No bridge registered for inbound message");
                false
            }
        }
    }

    /// Number of registered bridges
    pub fn len(&self) -> usize {
        self.bridges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty()
    }
}

impl Default for ProcessState {
    fn default() -> Self {
        Self::new()
    }
}
