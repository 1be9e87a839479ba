//! Trailer search against the YouTube Data API.
//!
//! The search asks for five videos matching the show name plus a fixed set
//! of trailer keywords, then prefers the first result whose title looks
//! like an official trailer or PV.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use crate::error::LookupError;
use crate::source::TrailerSource;

/// Public YouTube Data API v3 endpoint.
pub const DEFAULT_YOUTUBE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Keywords appended to every search.
pub const TRAILER_QUERY_SUFFIX: &str = "官方 預告 本予告 先行 PV Trailer";

/// Results requested per search.
pub const MAX_RESULTS: u32 = 5;

static TRAILER_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)公式|予告|Trailer|PV|先行|本予告|Official|預告").expect("valid regex")
});

/// HTTP client for the video search service.
pub struct YouTubeApi {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: VideoId,
    pub snippet: Snippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Snippet {
    #[serde(default)]
    pub title: String,
}

/// Build the search query for a show name.
pub fn trailer_query(name: &str) -> String {
    format!("{name} {TRAILER_QUERY_SUFFIX}")
}

/// Whether a video title looks like a trailer.
pub fn is_trailer_title(title: &str) -> bool {
    TRAILER_TITLE_RE.is_match(title)
}

/// Pick the first trailer-like result, else the first result.
pub fn pick_trailer(items: &[SearchItem]) -> Option<String> {
    let with_id = || items.iter().filter(|item| item.id.video_id.is_some());
    with_id()
        .find(|item| is_trailer_title(&item.snippet.title))
        .or_else(|| with_id().next())
        .and_then(|item| item.id.video_id.clone())
}

impl YouTubeApi {
    /// * `api_key` - `None` disables searching; every lookup then reports
    ///   [`LookupError::MissingApiKey`].
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search for a trailer and return the chosen video id.
    pub async fn search(&self, name: &str) -> Result<Option<String>, LookupError> {
        let api_key = self.api_key.as_deref().ok_or(LookupError::MissingApiKey)?;
        let query = trailer_query(name);
        let max_results = MAX_RESULTS.to_string();

        let response = self
            .client
            .get(format!("{}/search", self.api_url))
            .query(&[
                ("part", "snippet"),
                ("q", query.as_str()),
                ("type", "video"),
                ("key", api_key),
                ("maxResults", max_results.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LookupError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(pick_trailer(&parsed.items))
    }
}

#[async_trait]
impl TrailerSource for YouTubeApi {
    async fn search_trailer(&self, name: &str) -> Result<Option<String>, LookupError> {
        self.search(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn items(json: serde_json::Value) -> Vec<SearchItem> {
        let response: SearchResponse = serde_json::from_value(json).unwrap();
        response.items
    }

    fn item(id: &str, title: &str) -> serde_json::Value {
        serde_json::json!({ "id": { "videoId": id }, "snippet": { "title": title } })
    }

    #[test]
    fn query_appends_trailer_keywords() {
        assert_eq!(
            trailer_query("葬送的芙莉蓮"),
            "葬送的芙莉蓮 官方 預告 本予告 先行 PV Trailer"
        );
    }

    #[test]
    fn title_match_is_case_insensitive() {
        assert!(is_trailer_title("Frieren OFFICIAL trailer"));
        assert!(is_trailer_title("TVアニメ『葬送のフリーレン』本PV"));
        assert!(is_trailer_title("第2期 公式"));
        assert!(!is_trailer_title("Frieren reaction episode 1"));
    }

    #[test]
    fn prefers_trailer_like_title() {
        let results = items(serde_json::json!({
            "items": [
                item("aaa", "Episode 1 reaction"),
                item("bbb", "Official Trailer 2"),
                item("ccc", "PV")
            ]
        }));
        assert_eq!(pick_trailer(&results).as_deref(), Some("bbb"));
    }

    #[test]
    fn falls_back_to_first_result() {
        let results = items(serde_json::json!({
            "items": [item("aaa", "Opening song"), item("bbb", "Ending song")]
        }));
        assert_eq!(pick_trailer(&results).as_deref(), Some("aaa"));
    }

    #[test]
    fn empty_results_mean_no_trailer() {
        assert_eq!(pick_trailer(&items(serde_json::json!({}))), None);
    }

    #[test]
    fn results_without_video_id_are_skipped() {
        let results = items(serde_json::json!({
            "items": [
                { "id": { "channelId": "x" }, "snippet": { "title": "Official channel" } },
                item("ddd", "Clip")
            ]
        }));
        assert_eq!(pick_trailer(&results).as_deref(), Some("ddd"));
    }

    #[test]
    fn blank_api_key_is_treated_as_missing() {
        let api = YouTubeApi::new(DEFAULT_YOUTUBE_URL, Some("  ".into()));
        assert!(!api.has_api_key());
    }

    #[tokio::test]
    async fn search_without_key_fails_fast() {
        let api = YouTubeApi::new(DEFAULT_YOUTUBE_URL, None);
        assert_matches!(api.search("anything").await, Err(LookupError::MissingApiKey));
    }
}
