//! Filter engine: name search and category filtering over the catalog.
//!
//! Two independent entry points produce a visible subsequence of the catalog:
//!
//! - [`search_by_name`] keeps entries whose name contains the search term
//!   (case-insensitive). Active category filters are not consulted.
//! - [`apply_category_filters`] keeps entries passing every category test.
//!   The search term is not consulted.
//!
//! Whichever ran last defines the view. Both return catalog indices in
//! catalog order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogEntry, ShowStatus};

/* --------------------------------------------------------------------------
Selection state
-------------------------------------------------------------------------- */

/// A filter category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCategory {
    Status,
    Genre,
    CharacterTrait,
}

/// One value within a filter category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    Status(ShowStatus),
    Genre(String),
    CharacterTrait(String),
}

impl FilterValue {
    pub fn category(&self) -> FilterCategory {
        match self {
            FilterValue::Status(_) => FilterCategory::Status,
            FilterValue::Genre(_) => FilterCategory::Genre,
            FilterValue::CharacterTrait(_) => FilterCategory::CharacterTrait,
        }
    }
}

/// Active filter values per category plus the pending search text.
///
/// An empty category set means "no constraint" for that category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub statuses: BTreeSet<ShowStatus>,
    pub genres: BTreeSet<String>,
    pub character_traits: BTreeSet<String>,
    pub search: String,
}

impl FilterSelection {
    /// Flip a filter value on or off. Returns `true` if the value is now
    /// active.
    pub fn toggle(&mut self, value: FilterValue) -> bool {
        fn flip<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
            if set.remove(&value) {
                false
            } else {
                set.insert(value);
                true
            }
        }

        match value {
            FilterValue::Status(status) => flip(&mut self.statuses, status),
            FilterValue::Genre(genre) => flip(&mut self.genres, genre),
            FilterValue::CharacterTrait(t) => flip(&mut self.character_traits, t),
        }
    }

    pub fn is_active(&self, value: &FilterValue) -> bool {
        match value {
            FilterValue::Status(status) => self.statuses.contains(status),
            FilterValue::Genre(genre) => self.genres.contains(genre),
            FilterValue::CharacterTrait(t) => self.character_traits.contains(t),
        }
    }

    /// `true` when no category value is active (the search text is ignored).
    pub fn has_no_categories(&self) -> bool {
        self.statuses.is_empty() && self.genres.is_empty() && self.character_traits.is_empty()
    }

    /// Clear all three categories and the search text.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/* --------------------------------------------------------------------------
Predicates
-------------------------------------------------------------------------- */

/// Case-insensitive substring match on the entry name. An empty term
/// matches everything.
pub fn matches_name(entry: &CatalogEntry, term: &str) -> bool {
    term.is_empty() || entry.name.to_lowercase().contains(&term.to_lowercase())
}

/// Status equality, then OR-within / AND-across for genre and character
/// traits.
pub fn matches_categories(entry: &CatalogEntry, selection: &FilterSelection) -> bool {
    let status_ok = selection.statuses.is_empty() || selection.statuses.contains(&entry.status);
    let genre_ok =
        selection.genres.is_empty() || selection.genres.iter().any(|g| entry.has_genre(g));
    let trait_ok = selection.character_traits.is_empty()
        || selection.character_traits.iter().any(|c| entry.has_trait(c));

    status_ok && genre_ok && trait_ok
}

/* --------------------------------------------------------------------------
Engine entry points
-------------------------------------------------------------------------- */

/// Indices of every catalog entry whose name matches `term`.
pub fn search_by_name(catalog: &Catalog, term: &str) -> Vec<usize> {
    catalog
        .iter()
        .enumerate()
        .filter(|(_, entry)| matches_name(entry, term))
        .map(|(i, _)| i)
        .collect()
}

/// Indices of every catalog entry passing all category filters.
pub fn apply_category_filters(catalog: &Catalog, selection: &FilterSelection) -> Vec<usize> {
    catalog
        .iter()
        .enumerate()
        .filter(|(_, entry)| matches_categories(entry, selection))
        .map(|(i, _)| i)
        .collect()
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
