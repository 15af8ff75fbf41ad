//! Application configuration management

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

/// Value used when `TMDB_API_KEY` is unset. TMDB rejects it, so every search
/// made with it fails upstream.
pub const PLACEHOLDER_API_KEY: &str = "your_tmdb_api_key_here";

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address
    pub host: String,

    /// Server port
    pub port: u16,

    /// TMDB API key, sent as the `api_key` query parameter
    pub tmdb_api_key: String,

    /// TMDB v3 base URL
    pub tmdb_base_url: Url,

    /// Per-request timeout for TMDB calls (None = no timeout)
    pub tmdb_timeout: Option<Duration>,

    /// Region whose flat-rate providers are reported
    pub watch_region: String,

    /// Maximum number of detail fetches in flight for one search
    pub detail_concurrency: usize,

    /// Directory holding the landing page
    pub static_dir: String,

    /// Include upstream error text in 5xx response bodies
    pub debug: bool,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tmdb_base_url = lookup("TMDB_BASE_URL")
            .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string());
        let tmdb_base_url = Url::parse(tmdb_base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid TMDB_BASE_URL: {tmdb_base_url}"))?;

        let timeout_secs: u64 = lookup("TMDB_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("Invalid TMDB_TIMEOUT_SECS")?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .context("Invalid PORT")?,

            tmdb_api_key: lookup("TMDB_API_KEY")
                .filter(|key| !key.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_API_KEY.to_string()),

            tmdb_base_url,

            tmdb_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),

            watch_region: lookup("WATCH_REGION")
                .map(|r| r.trim().to_uppercase())
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "US".to_string()),

            detail_concurrency: lookup("DETAIL_CONCURRENCY")
                .unwrap_or_else(|| "4".to_string())
                .parse::<usize>()
                .context("Invalid DETAIL_CONCURRENCY")?
                .max(1),

            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "./static".to_string()),

            debug: lookup("DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),

            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        })
    }

    /// Whether a real TMDB key has been supplied
    pub fn has_api_key(&self) -> bool {
        self.tmdb_api_key != PLACEHOLDER_API_KEY
    }
}
