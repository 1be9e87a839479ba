//! Detail resolution against in-memory lookup services, applied to
//! application state through detail tickets.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use aniwheel_core::catalog::{Catalog, CatalogEntry, ShowStatus};
use aniwheel_core::state::AppState;
use aniwheel_lookup::detail::{resolve_detail, DetailResolver};
use aniwheel_lookup::error::LookupError;
use aniwheel_lookup::source::{AnimeInfo, MetadataSource, TrailerSource};
use aniwheel_lookup::trailer::TrailerOrigin;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

struct FakeMetadata(HashMap<u64, AnimeInfo>);

#[async_trait]
impl MetadataSource for FakeMetadata {
    async fn anime_info(&self, mal_id: u64) -> Result<AnimeInfo, LookupError> {
        self.0
            .get(&mal_id)
            .cloned()
            .ok_or(LookupError::ApiError {
                status: 429,
                body: "rate limited".into(),
            })
    }
}

struct FakeTrailers;

#[async_trait]
impl TrailerSource for FakeTrailers {
    async fn search_trailer(&self, name: &str) -> Result<Option<String>, LookupError> {
        Ok(Some(format!("search-{}", name.len())))
    }
}

fn metadata() -> FakeMetadata {
    let mut answers = HashMap::new();
    answers.insert(
        16498,
        AnimeInfo {
            year: Some(2013),
            episodes: Some(25),
            score: Some(8.5),
        },
    );
    answers.insert(
        25777,
        AnimeInfo {
            year: Some(2017),
            episodes: Some(12),
            score: Some(8.6),
        },
    );
    answers.insert(
        52991,
        AnimeInfo {
            year: Some(2023),
            episodes: Some(28),
            score: Some(9.3),
        },
    );
    FakeMetadata(answers)
}

fn catalog() -> Catalog {
    let mut titan = CatalogEntry::new("進擊的巨人", ShowStatus::Completed).with_mal_id(16498);
    titan.season_ids = vec![16498, 25777, 35760];
    titan.trailer = Some("https://www.youtube.com/watch?v=LHtdKWJdif4".into());

    let frieren = CatalogEntry::new("葬送的芙莉蓮", ShowStatus::Ongoing).with_mal_id(52991);
    let unknown = CatalogEntry::new("自製清單", ShowStatus::Ongoing);

    Catalog::new(vec![titan, frieren, unknown]).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn multi_season_entry_is_aggregated_despite_one_failed_season() {
    let catalog = catalog();
    let entry = catalog.find("進擊的巨人").unwrap();

    let detail = resolve_detail(entry, Some(&metadata()), Some(&FakeTrailers)).await;
    assert_eq!(detail.enrichment.year, Some(2013));
    assert_eq!(detail.enrichment.episode_count, Some(37));
    assert_eq!(detail.enrichment.score, Some(8.6));
    assert_eq!(detail.enrichment.total_seasons, Some(3));

    let trailer = detail.trailer.unwrap();
    assert_eq!(trailer.video_id, "LHtdKWJdif4");
    assert_eq!(trailer.origin, TrailerOrigin::Catalog);
}

#[tokio::test]
async fn entry_without_identifier_only_gets_trailer() {
    let catalog = catalog();
    let entry = catalog.find("自製清單").unwrap();

    let detail = resolve_detail(entry, Some(&metadata()), Some(&FakeTrailers)).await;
    assert!(detail.enrichment.is_empty());
    assert_eq!(detail.trailer.unwrap().origin, TrailerOrigin::Search);
}

#[tokio::test]
async fn resolved_detail_is_written_through_current_ticket() {
    let mut state = AppState::with_seed(catalog(), Some(1));
    let resolver = DetailResolver::new(Some(Arc::new(metadata())), None);

    let ticket = state.open_detail("葬送的芙莉蓮").unwrap();
    let entry = state.detail().cloned().unwrap();
    let detail = resolver.resolve(&entry).await;

    assert!(state.apply_detail(&ticket, &detail.enrichment));
    let stored = state.catalog().find("葬送的芙莉蓮").unwrap();
    assert_eq!(stored.year, Some(2023));
    assert_eq!(stored.episode_count, Some(28));
    assert_eq!(stored.score, Some(9.3));
    assert_eq!(stored.total_seasons, Some(1));
    assert!(detail.trailer.is_none());
}

#[tokio::test]
async fn late_result_for_abandoned_entry_is_discarded() {
    let mut state = AppState::with_seed(catalog(), Some(1));
    let resolver = DetailResolver::new(Some(Arc::new(metadata())), Some(Arc::new(FakeTrailers)));

    let stale = state.open_detail("進擊的巨人").unwrap();
    let entry = state.detail().cloned().unwrap();
    state.open_detail("葬送的芙莉蓮").unwrap();

    let detail = resolver.resolve(&entry).await;
    assert!(!state.apply_detail(&stale, &detail.enrichment));

    assert_eq!(state.catalog().find("進擊的巨人").unwrap().episode_count, None);
    assert_eq!(state.catalog().find("葬送的芙莉蓮").unwrap().episode_count, None);
}
