//! Collaborator traits for the lookup services.
//!
//! The HTTP clients implement these; tests substitute in-memory fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Fields the metadata service reports for one identifier. Any of them may
/// be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimeInfo {
    pub year: Option<i32>,
    pub episodes: Option<u32>,
    pub score: Option<f64>,
}

/// Looks up metadata by external identifier.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn anime_info(&self, mal_id: u64) -> Result<AnimeInfo, LookupError>;
}

/// Searches for a trailer by display name.
#[async_trait]
pub trait TrailerSource: Send + Sync {
    /// The chosen video id, or `None` when the search came back empty.
    async fn search_trailer(&self, name: &str) -> Result<Option<String>, LookupError>;
}
