//! REST client for the Jikan anime metadata API.
//!
//! Only the `GET /anime/{id}` endpoint is used. Its response nests the
//! interesting fields under `data`; the release year falls back to the
//! first airing date when the top-level `year` is null.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::LookupError;
use crate::source::{AnimeInfo, MetadataSource};

/// Public Jikan v4 endpoint.
pub const DEFAULT_JIKAN_URL: &str = "https://api.jikan.moe/v4";

/// HTTP client for the metadata service.
pub struct JikanApi {
    client: reqwest::Client,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct AnimeResponse {
    data: Option<AnimeData>,
}

#[derive(Debug, Deserialize)]
struct AnimeData {
    year: Option<i32>,
    episodes: Option<u32>,
    score: Option<f64>,
    aired: Option<Aired>,
}

#[derive(Debug, Deserialize)]
struct Aired {
    prop: Option<AiredProp>,
}

#[derive(Debug, Deserialize)]
struct AiredProp {
    from: Option<AiredDate>,
}

#[derive(Debug, Deserialize)]
struct AiredDate {
    year: Option<i32>,
}

impl AnimeData {
    fn into_info(self) -> AnimeInfo {
        let aired_year = self
            .aired
            .and_then(|a| a.prop)
            .and_then(|p| p.from)
            .and_then(|d| d.year);
        AnimeInfo {
            year: self.year.or(aired_year),
            episodes: self.episodes,
            score: self.score,
        }
    }
}

impl JikanApi {
    /// * `api_url` - Base URL without trailing slash, e.g. [`DEFAULT_JIKAN_URL`].
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch metadata for one identifier.
    pub async fn fetch_anime(&self, mal_id: u64) -> Result<AnimeInfo, LookupError> {
        let response = self
            .client
            .get(format!("{}/anime/{mal_id}", self.api_url))
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

        let parsed: AnimeResponse = response.json().await?;
        parse_anime(parsed, mal_id)
    }
}

fn parse_anime(response: AnimeResponse, mal_id: u64) -> Result<AnimeInfo, LookupError> {
    response
        .data
        .map(AnimeData::into_info)
        .ok_or_else(|| LookupError::NotFound(format!("anime {mal_id}")))
}

#[async_trait]
impl MetadataSource for JikanApi {
    async fn anime_info(&self, mal_id: u64) -> Result<AnimeInfo, LookupError> {
        self.fetch_anime(mal_id).await
    }
}
