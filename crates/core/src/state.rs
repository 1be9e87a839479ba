//! Application state and its transitions.
//!
//! [`AppState`] owns everything the user can change: the catalog view, the
//! wheel registry, custom entries, the wheel rotation and the result log.
//! Every user action is a method on it; callers serialize access (the spin
//! session wraps it in a mutex).

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::browse::Browser;
use crate::catalog::{Catalog, CatalogEntry, Enrichment};
use crate::custom::CustomEntries;
use crate::error::CoreError;
use crate::filter::FilterValue;
use crate::registry::{SelectionRegistry, ToggleOutcome};
use crate::results::{ResultLog, SpinOutcome};
use crate::types::EntryName;
use crate::wheel::{self, PendingSpin, SpinError, WheelSelector};

/// Handle for an open detail view.
///
/// Lookup results for the entry are applied only while the ticket is the
/// current one; opening another entry or closing the view stales it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    pub name: EntryName,
    generation: u64,
}

#[derive(Debug)]
pub struct AppState {
    catalog: Catalog,
    browser: Browser,
    registry: SelectionRegistry,
    custom: CustomEntries,
    wheel: WheelSelector,
    results: ResultLog,
    rng: StdRng,
    detail: Option<DetailTicket>,
    detail_generation: u64,
}

impl AppState {
    /// Fresh state over `catalog` using the given random source.
    pub fn new(catalog: Catalog, rng: StdRng) -> Self {
        Self {
            browser: Browser::new(&catalog),
            catalog,
            registry: SelectionRegistry::new(),
            custom: CustomEntries::default(),
            wheel: WheelSelector::default(),
            results: ResultLog::default(),
            rng,
            detail: None,
            detail_generation: 0,
        }
    }

    /// Seeded when `seed` is given, OS entropy otherwise.
    pub fn with_seed(catalog: Catalog, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(catalog, rng)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    pub fn registry(&self) -> &SelectionRegistry {
        &self.registry
    }

    pub fn custom(&self) -> &CustomEntries {
        &self.custom
    }

    pub fn custom_mut(&mut self) -> &mut CustomEntries {
        &mut self.custom
    }

    pub fn results(&self) -> &ResultLog {
        &self.results
    }

    pub fn rotation(&self) -> f64 {
        self.wheel.rotation()
    }

    pub fn is_spinning(&self) -> bool {
        self.wheel.is_spinning()
    }

    // ---- browsing ----

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.browser.set_search_text(text);
    }

    pub fn search(&mut self) -> usize {
        self.browser.search(&self.catalog)
    }

    pub fn toggle_filter(&mut self, value: FilterValue) -> bool {
        self.browser.toggle_filter(&self.catalog, value)
    }

    pub fn apply_filters(&mut self) -> usize {
        self.browser.apply_filters(&self.catalog)
    }

    pub fn reset_filters(&mut self) {
        self.browser.reset(&self.catalog);
    }

    pub fn next_page(&mut self) -> bool {
        self.browser.next_page()
    }

    pub fn prev_page(&mut self) -> bool {
        self.browser.prev_page()
    }

    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.browser.go_to_page(page)
    }

    pub fn visible(&self) -> Vec<&CatalogEntry> {
        self.browser.visible(&self.catalog)
    }

    pub fn current_page(&self) -> Vec<&CatalogEntry> {
        self.browser.current_page_entries(&self.catalog)
    }

    // ---- registry ----

    /// Add or remove a catalog entry from the wheel.
    pub fn toggle_in_wheel(&mut self, name: &str) -> Result<ToggleOutcome, CoreError> {
        let entry = self.catalog.find(name).ok_or_else(|| CoreError::NotFound {
            entity: "catalog entry",
            name: name.to_string(),
        })?;
        let outcome = self.registry.toggle(entry);
        tracing::debug!(name, ?outcome, size = self.registry.len(), "Registry toggled");
        Ok(outcome)
    }

    pub fn remove_from_wheel(&mut self, name: &str) -> bool {
        self.registry.remove(name)
    }

    /// Add up to `count` random catalog entries not yet on the wheel.
    pub fn random_batch_add(&mut self, count: usize) -> Vec<EntryName> {
        self.registry
            .random_batch_add(self.catalog.entries(), count, &mut self.rng)
    }

    /// Labels the next spin would choose from.
    pub fn wheel_contents(&self) -> Vec<String> {
        wheel::wheel_contents(&self.registry, &self.custom)
    }

    // ---- spinning ----

    /// Start a spin over the current wheel contents.
    pub fn begin_spin(&mut self) -> Result<PendingSpin, SpinError> {
        let contents = self.wheel_contents();
        self.wheel.begin(contents, &mut self.rng)
    }

    /// Settle a spin and append its outcome to the result log.
    pub fn finish_spin(&mut self, pending: &PendingSpin) -> Result<SpinOutcome, SpinError> {
        let outcome = self.wheel.finish(pending)?;
        self.results.record(outcome.clone());
        Ok(outcome)
    }

    /// Empty the registry, result log and custom entries, and zero the
    /// rotation. A spin in flight is cancelled.
    pub fn clear_all(&mut self) {
        self.registry.clear();
        self.results.clear();
        self.custom.clear();
        self.wheel.reset();
        tracing::debug!("Wheel cleared");
    }

    // ---- detail view ----

    pub fn open_detail(&mut self, name: &str) -> Result<DetailTicket, CoreError> {
        if !self.catalog.contains(name) {
            return Err(CoreError::NotFound {
                entity: "catalog entry",
                name: name.to_string(),
            });
        }
        self.detail_generation += 1;
        let ticket = DetailTicket {
            name: name.to_string(),
            generation: self.detail_generation,
        };
        self.detail = Some(ticket.clone());
        Ok(ticket)
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// The entry whose detail view is open.
    pub fn detail(&self) -> Option<&CatalogEntry> {
        self.detail
            .as_ref()
            .and_then(|ticket| self.catalog.find(&ticket.name))
    }

    /// Write lookup results for `ticket`'s entry if the ticket is current.
    ///
    /// Returns `false` (and changes nothing) for a stale ticket.
    pub fn apply_detail(&mut self, ticket: &DetailTicket, enrichment: &Enrichment) -> bool {
        if self.detail.as_ref() != Some(ticket) {
            tracing::debug!(name = %ticket.name, "Discarding stale detail lookup");
            return false;
        }
        self.catalog.apply_enrichment(&ticket.name, enrichment)
    }
}
