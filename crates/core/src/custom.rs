//! Free-text wheel entries typed in by the user.
//!
//! Custom entries carry no identity constraints; a slot contributes to the
//! wheel only when its text is non-blank.

use serde::Serialize;

/// Fewest free-text slots the wheel editor offers.
pub const MIN_SLOTS: usize = 3;

/// Most free-text slots the wheel editor offers.
pub const MAX_SLOTS: usize = 10;

/// Slot count before the user changes it.
pub const DEFAULT_SLOTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomEntries {
    slots: Vec<String>,
}

impl Default for CustomEntries {
    fn default() -> Self {
        Self {
            slots: vec![String::new(); DEFAULT_SLOTS],
        }
    }
}

impl CustomEntries {
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Change the slot count, clamped to `[MIN_SLOTS, MAX_SLOTS]`. Shrinking
    /// drops the text of the removed slots. Returns the count applied.
    pub fn set_slot_count(&mut self, count: usize) -> usize {
        let count = count.clamp(MIN_SLOTS, MAX_SLOTS);
        self.slots.resize(count, String::new());
        count
    }

    /// Set the text of one slot (0-based). Returns `false` for an
    /// out-of-range slot.
    pub fn set(&mut self, slot: usize, text: impl Into<String>) -> bool {
        match self.slots.get_mut(slot) {
            Some(current) => {
                *current = text.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }

    /// Non-blank slot texts, in slot order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }

    /// Blank every slot. The slot count is kept.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(String::clear);
    }
}
