//! Spin session: the one control flow through which all state changes pass.
//!
//! [`SpinSession`] wraps [`AppState`] in an async mutex and adds the settle
//! delay between starting a spin and reading its winner. The delay is the
//! only suspension point; the lock is not held across it, so browsing and
//! registry edits keep working while the wheel turns. A second spin during
//! the delay is rejected, and a full clear cancels the pending one.

use std::time::Duration;

use tokio::sync::{broadcast, Mutex, MutexGuard};

use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::events::{EventBus, WheelEvent};
use crate::registry::ToggleOutcome;
use crate::results::SpinOutcome;
use crate::state::AppState;
use crate::types::EntryName;
use crate::wheel::SpinError;

/// Time between a spin request and its outcome becoming observable.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(4000);

/// Tunables for a [`SpinSession`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub settle_delay: Duration,
    /// Fixed seed for reproducible spins and batch picks.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            seed: None,
        }
    }
}

pub struct SpinSession {
    state: Mutex<AppState>,
    settle_delay: Duration,
    events: EventBus,
}

impl SpinSession {
    pub fn new(state: AppState, settle_delay: Duration) -> Self {
        Self {
            state: Mutex::new(state),
            settle_delay,
            events: EventBus::default(),
        }
    }

    pub fn from_config(catalog: Catalog, config: &SessionConfig) -> Self {
        Self::new(AppState::with_seed(catalog, config.seed), config.settle_delay)
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WheelEvent> {
        self.events.subscribe()
    }

    /// Exclusive access to the state for actions without notifications.
    pub async fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().await
    }

    pub async fn is_spinning(&self) -> bool {
        self.state.lock().await.is_spinning()
    }

    /// Toggle a catalog entry on the wheel and announce the change.
    pub async fn toggle_in_wheel(&self, name: &str) -> Result<ToggleOutcome, CoreError> {
        let outcome = self.state.lock().await.toggle_in_wheel(name)?;
        self.events.publish(WheelEvent::RegistryToggled {
            name: name.to_string(),
            outcome,
        });
        Ok(outcome)
    }

    /// Add up to `count` random entries and announce them.
    pub async fn random_batch_add(&self, count: usize) -> Vec<EntryName> {
        let names = self.state.lock().await.random_batch_add(count);
        self.events.publish(WheelEvent::RandomBatchAdded {
            names: names.clone(),
        });
        names
    }

    /// Spin the wheel and wait for it to settle.
    ///
    /// Errors with [`SpinError::EmptyWheel`] or [`SpinError::ConcurrentSpin`]
    /// without waiting, or with [`SpinError::Cancelled`] if the wheel is
    /// cleared before the settle delay elapses.
    ///
    /// Dropping the returned future before it completes abandons the spin;
    /// the next spin is accepted.
    pub async fn spin(&self) -> Result<SpinOutcome, SpinError> {
        let begun = self.state.lock().await.begin_spin();
        let pending = match begun {
            Ok(pending) => pending,
            Err(e) => {
                tracing::info!(error = %e, "Spin rejected");
                self.events.publish(WheelEvent::spin_rejected(&e));
                return Err(e);
            }
        };

        let abandon_on_drop = pending.cancel_token().clone().drop_guard();

        tokio::select! {
            biased;
            _ = pending.cancel_token().cancelled() => {
                tracing::info!(spin_id = pending.id(), "Spin cancelled");
                return Err(SpinError::Cancelled);
            }
            _ = tokio::time::sleep(self.settle_delay) => {}
        }

        let outcome = self.state.lock().await.finish_spin(&pending)?;
        let _ = abandon_on_drop.disarm();
        tracing::info!(
            spin_id = pending.id(),
            index = outcome.index,
            label = %outcome.label,
            rotation = outcome.final_rotation,
            "Spin completed",
        );
        self.events.publish(WheelEvent::SpinCompleted {
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }

    /// Combined full clear: registry, results, custom entries and rotation.
    pub async fn clear_all(&self) {
        self.state.lock().await.clear_all();
        self.events.publish(WheelEvent::WheelCleared);
    }
}
