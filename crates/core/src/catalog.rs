//! The read-only show catalog.
//!
//! A [`Catalog`] is loaded once from an externally supplied JSON document and
//! is never reordered or shrunk afterwards. The only mutation it accepts is
//! writing optional enrichment fields (year, episode count, score, seasons)
//! returned by an external lookup, addressed by entry name.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::EntryName;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Airing status of a show.
///
/// The source data labels these in Chinese; both spellings deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShowStatus {
    #[serde(alias = "完結", alias = "已完結", alias = "completed")]
    Completed,
    #[serde(alias = "連載中", alias = "連載", alias = "ongoing")]
    Ongoing,
}

impl ShowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ShowStatus::Completed => "Completed",
            ShowStatus::Ongoing => "Ongoing",
        }
    }
}

impl fmt::Display for ShowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShowStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Completed" | "completed" | "完結" | "已完結" => Ok(ShowStatus::Completed),
            "Ongoing" | "ongoing" | "連載中" | "連載" => Ok(ShowStatus::Ongoing),
            other => Err(CoreError::Validation(format!(
                "Unknown status '{other}'. Must be one of: Completed, Ongoing"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One show in the catalog.
///
/// `name` is the identity key. The enrichment fields stay `None` until an
/// external lookup fills them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: EntryName,
    pub status: ShowStatus,
    #[serde(rename = "genre", default)]
    pub genres: Vec<String>,
    #[serde(rename = "character", default)]
    pub character_traits: Vec<String>,

    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// Short synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Identifier used by the metadata service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mal_id: Option<u64>,
    /// Identifiers of every season, when the show spans several entries in
    /// the metadata service.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub season_ids: Vec<u64>,
    /// Precomputed trailer reference: a bare video id or a `watch?v=` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(rename = "episodes", default, skip_serializing_if = "Option::is_none")]
    pub episode_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_seasons: Option<u32>,
}

impl CatalogEntry {
    /// Create an entry with no tags and no optional data.
    pub fn new(name: impl Into<EntryName>, status: ShowStatus) -> Self {
        Self {
            name: name.into(),
            status,
            genres: Vec::new(),
            character_traits: Vec::new(),
            img: None,
            desc: None,
            mal_id: None,
            season_ids: Vec::new(),
            trailer: None,
            year: None,
            episode_count: None,
            score: None,
            total_seasons: None,
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.character_traits = traits.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mal_id(mut self, mal_id: u64) -> Self {
        self.mal_id = Some(mal_id);
        self
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    pub fn has_trait(&self, character_trait: &str) -> bool {
        self.character_traits.iter().any(|c| c == character_trait)
    }

    /// Overwrite the enrichment fields that are present in `enrichment`.
    /// Absent fields leave the current value untouched.
    pub fn apply_enrichment(&mut self, enrichment: &Enrichment) {
        if let Some(year) = enrichment.year {
            self.year = Some(year);
        }
        if let Some(episodes) = enrichment.episode_count {
            self.episode_count = Some(episodes);
        }
        if let Some(score) = enrichment.score {
            self.score = Some(score);
        }
        if let Some(seasons) = enrichment.total_seasons {
            self.total_seasons = Some(seasons);
        }
    }
}

/// Optional metadata produced by the external lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub year: Option<i32>,
    pub episode_count: Option<u32>,
    pub score: Option<f64>,
    pub total_seasons: Option<u32>,
}

impl Enrichment {
    pub fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.episode_count.is_none()
            && self.score.is_none()
            && self.total_seasons.is_none()
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Distinct filter values offered by a catalog, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub statuses: Vec<ShowStatus>,
    pub genres: Vec<String>,
    pub character_traits: Vec<String>,
}

/// Ordered, name-unique sequence of [`CatalogEntry`] values.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_name: HashMap<EntryName, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate or blank names.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CoreError> {
        let mut by_name = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(CoreError::Catalog(format!(
                    "Entry at position {index} has a blank name"
                )));
            }
            if by_name.insert(entry.name.clone(), index).is_some() {
                return Err(CoreError::Catalog(format!(
                    "Duplicate entry name: {}",
                    entry.name
                )));
            }
        }
        Ok(Self { entries, by_name })
    }

    /// Parse a JSON array of entries.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)
            .map_err(|e| CoreError::Catalog(format!("Invalid catalog JSON: {e}")))?;
        Self::new(entries)
    }

    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Catalog(format!("Cannot read catalog {}: {e}", path.display()))
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), count = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Write enrichment fields into the entry called `name`.
    ///
    /// Returns `false` when no such entry exists; no other entry is touched.
    pub fn apply_enrichment(&mut self, name: &str, enrichment: &Enrichment) -> bool {
        match self.by_name.get(name) {
            Some(&index) => {
                self.entries[index].apply_enrichment(enrichment);
                true
            }
            None => false,
        }
    }

    /// Collect the distinct status, genre and character-trait values.
    pub fn facets(&self) -> Facets {
        let mut facets = Facets::default();
        let mut seen_genres = HashSet::new();
        let mut seen_traits = HashSet::new();

        for entry in &self.entries {
            if !facets.statuses.contains(&entry.status) {
                facets.statuses.push(entry.status);
            }
            for genre in &entry.genres {
                if seen_genres.insert(genre.as_str()) {
                    facets.genres.push(genre.clone());
                }
            }
            for character_trait in &entry.character_traits {
                if seen_traits.insert(character_trait.as_str()) {
                    facets.character_traits.push(character_trait.clone());
                }
            }
        }
        facets
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
