//! Detail-view resolution: metadata, season aggregate and trailer for one
//! catalog entry, merged into an [`Enrichment`].
//!
//! Merge precedence per field:
//!
//! | Field           | Order                                           |
//! |-----------------|-------------------------------------------------|
//! | `year`          | catalog, metadata                               |
//! | `episode_count` | season aggregate, metadata                      |
//! | `score`         | catalog, season aggregate best, metadata        |
//! | `total_seasons` | season aggregate                                |

use std::sync::Arc;

use serde::Serialize;

use aniwheel_core::catalog::{CatalogEntry, Enrichment};

use crate::aggregate::{aggregate_seasons, SeasonAggregate};
use crate::source::{AnimeInfo, MetadataSource, TrailerSource};
use crate::trailer::{resolve_trailer, TrailerRef};

/// Everything the detail view shows beyond the catalog's own fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailInfo {
    pub enrichment: Enrichment,
    pub trailer: Option<TrailerRef>,
}

/// Combine catalog values with lookup results.
pub fn merge_enrichment(
    entry: &CatalogEntry,
    info: Option<&AnimeInfo>,
    aggregate: Option<&SeasonAggregate>,
) -> Enrichment {
    Enrichment {
        year: entry.year.or(info.and_then(|i| i.year)),
        episode_count: aggregate
            .and_then(|a| a.total_episodes)
            .or(info.and_then(|i| i.episodes)),
        score: entry
            .score
            .or(aggregate.and_then(|a| a.best_score))
            .or(info.and_then(|i| i.score)),
        total_seasons: aggregate
            .map(|a| a.total_seasons)
            .filter(|&seasons| seasons > 0),
    }
}

/// The lookup collaborators available to the detail view.
#[derive(Clone, Default)]
pub struct DetailResolver {
    metadata: Option<Arc<dyn MetadataSource>>,
    trailers: Option<Arc<dyn TrailerSource>>,
}

impl DetailResolver {
    pub fn new(
        metadata: Option<Arc<dyn MetadataSource>>,
        trailers: Option<Arc<dyn TrailerSource>>,
    ) -> Self {
        Self { metadata, trailers }
    }

    /// Resolve enrichment and trailer for `entry`. Never fails.
    pub async fn resolve(&self, entry: &CatalogEntry) -> DetailInfo {
        resolve_detail(entry, self.metadata.as_deref(), self.trailers.as_deref()).await
    }
}

/// Resolve enrichment and trailer for `entry`.
///
/// Entries without an external identifier skip the metadata lookups; the
/// trailer is still resolved.
pub async fn resolve_detail(
    entry: &CatalogEntry,
    metadata: Option<&dyn MetadataSource>,
    trailers: Option<&dyn TrailerSource>,
) -> DetailInfo {
    let enrichment = match (metadata, entry.mal_id) {
        (Some(source), Some(mal_id)) => {
            let info = match source.anime_info(mal_id).await {
                Ok(info) => Some(info),
                Err(e) => {
                    tracing::warn!(name = %entry.name, mal_id, error = %e, "Metadata lookup failed");
                    None
                }
            };
            let aggregate = aggregate_seasons(source, mal_id, &entry.season_ids).await;
            merge_enrichment(entry, info.as_ref(), Some(&aggregate))
        }
        _ => Enrichment::default(),
    };

    let trailer = resolve_trailer(entry, trailers).await;

    DetailInfo {
        enrichment,
        trailer,
    }
}
