//! Bridge lifecycle state machine

use serde::{Deserialize, Serialize};

/// Lifecycle of a single bridge instance
///
/// State transitions:
/// ```text
/// Constructed → Active → Destroyed
///      │                    ↑
///      └────────────────────┘ (destroyed before attach)
/// ```
///
/// `Destroyed` is terminal. Repeated destroys are tolerated by the bridge
/// itself and never reach this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeState {
    /// Bridge is registered but its transport has not been attached yet
    #[default]
    Constructed,
    /// Transport is attached and inbound messages are being delivered
    Active,
    /// Bridge has released its listeners and pending calls
    Destroyed,
}

impl BridgeState {
    /// Check if this state can transition to the target state
    pub fn can_transition_to(&self, target: BridgeState) -> bool {
        use BridgeState::*;
        matches!(
            (self, target),
            (Constructed, Active) | (Constructed, Destroyed) | (Active, Destroyed)
        )
    }

    /// Check if outbound instructions may be handed to the transport
    pub fn can_send(&self) -> bool {
        !self.is_terminal()
    }

    /// Check if the bridge is in its terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, BridgeState::Destroyed)
    }

    pub(crate) fn as_u8(self) -> u8 {
        match self {
            BridgeState::Constructed => 0,
            BridgeState::Active => 1,
            BridgeState::Destroyed => 2,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => BridgeState::Constructed,
            1 => BridgeState::Active,
            _ => BridgeState::Destroyed,
        }
    }
}

impl std::fmt::Display for BridgeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeState::Constructed => write!(f, "Constructed"),
            BridgeState::Active => write!(f, "Active"),
            BridgeState::Destroyed => write!(f, "Destroyed"),
        }
    }
}

/// Lock-free holder for a [`BridgeState`]
#[derive(Debug, Default)]
pub struct AtomicBridgeState(std::sync::atomic::AtomicU8);

impl AtomicBridgeState {
    /// Create a holder starting in the given state
    pub fn new(state: BridgeState) -> Self {
        Self(std::sync::atomic::AtomicU8::new(state.as_u8()))
    }

    /// Get current state
    pub fn get(&self) -> BridgeState {
        BridgeState::from_u8(self.0.load(std::sync::atomic::Ordering::SeqCst))
    }

    /// Attempt to move from the current state to `target`
    ///
    /// Returns the state observed before the attempt. The swap only happens
    /// when that state allows the transition.
    pub fn transition_to(&self, target: BridgeState) -> Result<BridgeState, BridgeState> {
        use std::sync::atomic::Ordering;
        self.0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                BridgeState::from_u8(current)
                    .can_transition_to(target)
                    .then_some(target.as_u8())
            })
            .map(BridgeState::from_u8)
            .map_err(BridgeState::from_u8)
    }
}
