//! Wheel lifecycle state machine
//!
//! ```text
//! Detached ──Attach──> Inactive ──TouchDown/KeyDown──> Active
//!    ^                   ^  │                            │
//!    └──────Remove───────┼──┘                            │
//!                        └──────Release/IdleTimeout──────┘
//! ```
//!
//! Visibility (shown after anchor focus, hidden after blur) is tracked
//! separately; it does not change the phase.

/// Lifecycle phase of a wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WheelPhase {
    #[default]
    Detached,
    /// Attached, user not interacting
    Inactive,
    /// Attached, mid-gesture or typing
    Active,
}

/// Events that drive [`WheelPhase`] transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Attach,
    TouchDown,
    KeyDown,
    Release,
    IdleTimeout,
    Remove,
}

impl WheelPhase {
    /// Next phase for `event`, or `None` when the event does not apply
    pub fn on_event(&self, event: LifecycleEvent) -> Option<Self> {
        use LifecycleEvent::*;
        use WheelPhase::*;

        match (self, event) {
            (Detached, Attach) => Some(Inactive),

            (Inactive, TouchDown) | (Inactive, KeyDown) => Some(Active),

            // Stays active until release or idle timeout
            (Active, TouchDown) | (Active, KeyDown) => None,
            (Active, Release) | (Active, IdleTimeout) => Some(Inactive),

            (Inactive, Remove) | (Active, Remove) => Some(Detached),

            _ => None,
        }
    }

    pub fn is_attached(&self) -> bool {
        !matches!(self, WheelPhase::Detached)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, WheelPhase::Active)
    }
}
