//! In-process notification bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] carries the user-facing notifications the front end shows
//! as toasts or alerts: registry changes, spin results, rejected spins.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::registry::ToggleOutcome;
use crate::results::SpinOutcome;
use crate::wheel::SpinError;

// ---------------------------------------------------------------------------
// WheelEvent
// ---------------------------------------------------------------------------

/// A notification worth surfacing to the user.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WheelEvent {
    /// A catalog entry was added to or removed from the wheel.
    RegistryToggled { name: String, outcome: ToggleOutcome },

    /// A random batch of entries was appended to the wheel.
    RandomBatchAdded { names: Vec<String> },

    /// A spin settled on a winner.
    SpinCompleted { outcome: SpinOutcome },

    /// A spin request was refused.
    SpinRejected { reason: String },

    /// Registry, results, custom entries and rotation were all cleared.
    WheelCleared,
}

impl WheelEvent {
    pub fn spin_rejected(error: &SpinError) -> Self {
        WheelEvent::SpinRejected {
            reason: error.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// Fan-out notification bus.
///
/// ```rust
/// use aniwheel_core::events::{EventBus, WheelEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(WheelEvent::WheelCleared);
/// ```
pub struct EventBus {
    sender: broadcast::Sender<WheelEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// Slow receivers observe `RecvError::Lagged` once the buffer wraps.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped silently when nobody
    /// listens.
    pub fn publish(&self, event: WheelEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WheelEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(WheelEvent::RegistryToggled {
            name: "One Piece".into(),
            outcome: ToggleOutcome::Added,
        });

        let received = rx.recv().await.expect("should receive the event");
        assert_matches!(
            received,
            WheelEvent::RegistryToggled { name, outcome: ToggleOutcome::Added } if name == "One Piece"
        );
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(WheelEvent::WheelCleared);
    }

    #[test]
    fn rejected_spin_carries_error_text() {
        let event = WheelEvent::spin_rejected(&SpinError::EmptyWheel);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "spin_rejected");
        assert!(json["reason"].as_str().unwrap().contains("empty"));
    }
}
