use std::path::PathBuf;
use std::time::Duration;

use aniwheel_core::session::{SessionConfig, DEFAULT_SETTLE_DELAY};
use aniwheel_lookup::jikan::DEFAULT_JIKAN_URL;
use aniwheel_lookup::youtube::DEFAULT_YOUTUBE_URL;

/// Default catalog location, relative to the working directory.
const DEFAULT_CATALOG_PATH: &str = "data/catalog.json";

/// Shell configuration loaded from environment variables.
///
/// All fields have defaults suitable for local use. Unparseable numeric
/// values are logged and replaced by their default.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub settle_delay: Duration,
    /// Fixed random seed; unset means OS entropy.
    pub seed: Option<u64>,
    pub jikan_url: String,
    pub youtube_url: String,
    /// Trailer search key. Without it only catalog trailers are shown.
    pub youtube_api_key: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                                  |
    /// |----------------------|------------------------------------------|
    /// | `ANIWHEEL_CATALOG`   | `data/catalog.json`                      |
    /// | `ANIWHEEL_SETTLE_MS` | `4000`                                   |
    /// | `ANIWHEEL_SEED`      | unset                                    |
    /// | `JIKAN_BASE_URL`     | `https://api.jikan.moe/v4`               |
    /// | `YOUTUBE_BASE_URL`   | `https://www.googleapis.com/youtube/v3`  |
    /// | `YOUTUBE_API_KEY`    | unset                                    |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let catalog_path = var("ANIWHEEL_CATALOG")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATALOG_PATH.into())
            .into();

        let settle_delay = parse_or_default(
            "ANIWHEEL_SETTLE_MS",
            var("ANIWHEEL_SETTLE_MS"),
            DEFAULT_SETTLE_DELAY.as_millis() as u64,
        );

        let seed = var("ANIWHEEL_SEED").and_then(|raw| match raw.trim().parse() {
            Ok(seed) => Some(seed),
            Err(_) => {
                tracing::warn!(value = %raw, "ANIWHEEL_SEED is not a valid u64, ignoring");
                None
            }
        });

        Self {
            catalog_path,
            settle_delay: Duration::from_millis(settle_delay),
            seed,
            jikan_url: var("JIKAN_BASE_URL").unwrap_or_else(|| DEFAULT_JIKAN_URL.into()),
            youtube_url: var("YOUTUBE_BASE_URL").unwrap_or_else(|| DEFAULT_YOUTUBE_URL.into()),
            youtube_api_key: var("YOUTUBE_API_KEY").filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            settle_delay: self.settle_delay,
            seed: self.seed,
        }
    }
}

fn parse_or_default(key: &str, raw: Option<String>, default: u64) -> u64 {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default, "Invalid number, using default");
            default
        }),
    }
}
