//! Multi-season aggregation over the metadata service.
//!
//! A show that spans several seasons lists every season's identifier in
//! `season_ids`. The aggregate sums their episode counts and keeps the best
//! score. A failed lookup for one season is logged and skipped.

use serde::{Deserialize, Serialize};

use crate::source::MetadataSource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonAggregate {
    /// Number of identifiers aggregated.
    pub total_seasons: u32,
    /// Sum of known episode counts; `None` when no season reported any.
    pub total_episodes: Option<u32>,
    /// Highest known score.
    pub best_score: Option<f64>,
}

/// Aggregate `season_ids`, or just `mal_id` when the list is empty.
pub async fn aggregate_seasons<S>(source: &S, mal_id: u64, season_ids: &[u64]) -> SeasonAggregate
where
    S: MetadataSource + ?Sized,
{
    let ids: Vec<u64> = if season_ids.is_empty() {
        vec![mal_id]
    } else {
        season_ids.to_vec()
    };

    let mut total_episodes: u32 = 0;
    let mut best_score: Option<f64> = None;
    let mut failures = 0usize;

    for &id in &ids {
        match source.anime_info(id).await {
            Ok(info) => {
                total_episodes = total_episodes.saturating_add(info.episodes.unwrap_or(0));
                if let Some(score) = info.score {
                    best_score = Some(best_score.map_or(score, |best: f64| best.max(score)));
                }
            }
            Err(e) => {
                failures += 1;
                tracing::warn!(mal_id, season_id = id, error = %e, "Season lookup failed");
            }
        }
    }

    tracing::debug!(
        mal_id,
        seasons = ids.len(),
        failures,
        total_episodes,
        "Seasons aggregated",
    );

    SeasonAggregate {
        total_seasons: ids.len() as u32,
        total_episodes: (total_episodes > 0).then_some(total_episodes),
        best_score,
    }
}
