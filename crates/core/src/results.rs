//! Append-only log of completed spins.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// One completed spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// The winning wheel label.
    pub label: String,
    /// Position of the label in the wheel contents at spin time.
    pub index: usize,
    /// Accumulated wheel rotation, in degrees, when the spin settled.
    pub final_rotation: f64,
    pub spun_at: Timestamp,
}

/// Spin outcomes in the order the spins completed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultLog {
    outcomes: Vec<SpinOutcome>,
}

impl ResultLog {
    pub fn record(&mut self, outcome: SpinOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[SpinOutcome] {
        &self.outcomes
    }

    pub fn last(&self) -> Option<&SpinOutcome> {
        self.outcomes.last()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Only called as part of the combined full clear.
    pub(crate) fn clear(&mut self) {
        self.outcomes.clear();
    }
}
