//! Trailer resolution: a catalog-supplied reference wins, otherwise search.
//!
//! "No trailer" is an ordinary outcome, not an error.

use serde::{Deserialize, Serialize};

use aniwheel_core::catalog::CatalogEntry;

use crate::source::TrailerSource;

/// Where a trailer reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailerOrigin {
    Catalog,
    Search,
}

/// A video reference that can be embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailerRef {
    pub video_id: String,
    pub origin: TrailerOrigin,
}

impl TrailerRef {
    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.video_id)
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// Extract a video id from a catalog `trailer` value.
///
/// Accepts a full `watch?v=` URL (extra query parameters dropped) or a bare
/// id. Blank values yield `None`.
pub fn parse_trailer_reference(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let id = match raw.split_once("watch?v=") {
        Some((_, rest)) => rest.split('&').next().unwrap_or(rest),
        None => raw,
    };
    (!id.is_empty()).then(|| id.to_string())
}

/// Resolve the trailer for `entry`.
///
/// Uses the catalog reference when present; otherwise asks `source` (if
/// any). Search failures are logged and reported as no trailer.
pub async fn resolve_trailer(
    entry: &CatalogEntry,
    source: Option<&dyn TrailerSource>,
) -> Option<TrailerRef> {
    if let Some(video_id) = entry.trailer.as_deref().and_then(parse_trailer_reference) {
        return Some(TrailerRef {
            video_id,
            origin: TrailerOrigin::Catalog,
        });
    }

    let source = source?;
    match source.search_trailer(&entry.name).await {
        Ok(Some(video_id)) => Some(TrailerRef {
            video_id,
            origin: TrailerOrigin::Search,
        }),
        Ok(None) => {
            tracing::debug!(name = %entry.name, "No trailer found");
            None
        }
        Err(e) => {
            tracing::warn!(name = %entry.name, error = %e, "Trailer search failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::LookupError;
    use aniwheel_core::catalog::ShowStatus;

    struct FixedSearch(Result<Option<&'static str>, u16>);

    #[async_trait]
    impl TrailerSource for FixedSearch {
        async fn search_trailer(&self, _name: &str) -> Result<Option<String>, LookupError> {
            match &self.0 {
                Ok(id) => Ok(id.map(str::to_string)),
                Err(status) => Err(LookupError::ApiError {
                    status: *status,
                    body: "quota exceeded".into(),
                }),
            }
        }
    }

    fn entry(trailer: Option<&str>) -> CatalogEntry {
        let mut entry = CatalogEntry::new("星際牛仔", ShowStatus::Completed);
        entry.trailer = trailer.map(str::to_string);
        entry
    }

    // -- parsing -----------------------------------------------------------

    #[test]
    fn watch_url_is_reduced_to_id() {
        assert_eq!(
            parse_trailer_reference("https://www.youtube.com/watch?v=gY5nDXOtv_o"),
            Some("gY5nDXOtv_o".to_string())
        );
        assert_eq!(
            parse_trailer_reference("https://www.youtube.com/watch?v=abc&t=30s"),
            Some("abc".to_string())
        );
    }

    #[test]
    fn bare_id_is_kept() {
        assert_eq!(parse_trailer_reference(" xyz123 "), Some("xyz123".to_string()));
        assert_eq!(parse_trailer_reference(""), None);
        assert_eq!(parse_trailer_reference("https://youtube.com/watch?v="), None);
    }

    #[test]
    fn embed_url_uses_video_id() {
        let trailer = TrailerRef {
            video_id: "abc".into(),
            origin: TrailerOrigin::Search,
        };
        assert_eq!(trailer.embed_url(), "https://www.youtube.com/embed/abc");
        assert_eq!(trailer.watch_url(), "https://www.youtube.com/watch?v=abc");
    }

    // -- resolution --------------------------------------------------------

    #[tokio::test]
    async fn catalog_reference_wins_over_search() {
        let search = FixedSearch(Ok(Some("searched")));
        let trailer = resolve_trailer(&entry(Some("watch?v=local")), Some(&search))
            .await
            .unwrap();
        assert_eq!(trailer.video_id, "local");
        assert_eq!(trailer.origin, TrailerOrigin::Catalog);
    }

    #[tokio::test]
    async fn search_used_when_catalog_has_none() {
        let search = FixedSearch(Ok(Some("searched")));
        let trailer = resolve_trailer(&entry(None), Some(&search)).await.unwrap();
        assert_eq!(trailer.video_id, "searched");
        assert_eq!(trailer.origin, TrailerOrigin::Search);
    }

    #[tokio::test]
    async fn failed_or_empty_search_means_no_trailer() {
        assert!(resolve_trailer(&entry(None), Some(&FixedSearch(Err(403))))
            .await
            .is_none());
        assert!(resolve_trailer(&entry(None), Some(&FixedSearch(Ok(None))))
            .await
            .is_none());
        assert!(resolve_trailer(&entry(None), None).await.is_none());
    }
}
