//! Selection registry: the user's working set of catalog entries for the
//! wheel.
//!
//! Entries are held by name, in insertion order, and no two share a name.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::catalog::CatalogEntry;
use crate::types::EntryName;

/// Result of [`SelectionRegistry::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Ordered, name-unique set of selected entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionRegistry {
    names: Vec<EntryName>,
}

impl SelectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> &[EntryName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Remove the entry if present, otherwise append it.
    pub fn toggle(&mut self, entry: &CatalogEntry) -> ToggleOutcome {
        if self.remove(&entry.name) {
            ToggleOutcome::Removed
        } else {
            self.names.push(entry.name.clone());
            ToggleOutcome::Added
        }
    }

    /// Delete the entry called `name`. Returns `false` if it was absent.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(index) => {
                self.names.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// Append up to `count` randomly chosen candidates not yet registered.
    ///
    /// The count is clamped to the number of eligible candidates, so asking
    /// for more than are available adds every one of them exactly once.
    /// Returns the names added, in the order they were appended.
    pub fn random_batch_add<'a, I, R>(
        &mut self,
        candidates: I,
        count: usize,
        rng: &mut R,
    ) -> Vec<EntryName>
    where
        I: IntoIterator<Item = &'a CatalogEntry>,
        R: Rng + ?Sized,
    {
        let registered: HashSet<&str> = self.names.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let mut available: Vec<&str> = candidates
            .into_iter()
            .map(|entry| entry.name.as_str())
            .filter(|name| !registered.contains(name) && seen.insert(*name))
            .collect();

        let take = count.min(available.len());
        available.shuffle(rng);
        let picked: Vec<EntryName> = available[..take].iter().map(|n| n.to_string()).collect();

        tracing::debug!(
            requested = count,
            eligible = available.len(),
            added = picked.len(),
            "Random batch added to registry",
        );

        self.names.extend(picked.iter().cloned());
        picked
    }
}
