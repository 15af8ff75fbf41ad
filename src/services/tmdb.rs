//! TMDB (The Movie Database) API client for person and credit lookups
//!
//! Base URL: https://api.themoviedb.org/3 (configurable)
//!
//! Three call shapes are used: person search, a person's combined credits,
//! and movie/TV details with videos and watch providers appended.

use std::collections::HashMap;
use std::fmt;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::UpstreamError;

/// TMDB person identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub u64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Person search result page from TMDB
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPersonSearch {
    pub results: Vec<TmdbPerson>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPerson {
    pub id: PersonId,
    pub name: Option<String>,
}

/// Combined movie and TV credits for a person
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCombinedCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCredit>,
    #[serde(default)]
    pub crew: Vec<TmdbCredit>,
}

/// A single cast or crew entry. Movies carry `title`, TV shows carry `name`;
/// cast entries carry `character`, crew entries carry `job`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredit {
    pub id: Option<u64>,
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub character: Option<String>,
    pub job: Option<String>,
    pub overview: Option<String>,
}

/// Movie or TV details with `videos` and `watch/providers` appended.
///
/// Each appended section decodes on its own. A section TMDB sends in an
/// unexpected shape is dropped without affecting the other one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMediaDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub videos: Option<TmdbVideos>,
    #[serde(rename = "watch/providers", default, deserialize_with = "lenient")]
    pub watch_providers: Option<TmdbWatchProviders>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbVideos {
    /// Malformed entries are skipped
    #[serde(default, deserialize_with = "lenient_list")]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbVideo {
    #[serde(rename = "type")]
    pub video_type: Option<String>,
    pub site: Option<String>,
    pub key: Option<String>,
}

/// Watch providers keyed by ISO 3166-1 region code. Regions stay raw until
/// [region](TmdbWatchProviders::region) asks for one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbWatchProviders {
    #[serde(default)]
    pub results: HashMap<String, Value>,
}

impl TmdbWatchProviders {
    /// Providers for one region; `None` if absent or not an object
    pub fn region(&self, code: &str) -> Option<TmdbRegionProviders> {
        self.results
            .get(code)
            .and_then(|raw| serde_json::from_value(raw.clone()).ok())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbRegionProviders {
    /// Subscription offerings; rent and buy lists are ignored
    #[serde(default, deserialize_with = "lenient_optional_list")]
    pub flatrate: Option<Vec<TmdbProvider>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbProvider {
    pub provider_name: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_optional_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        _ => return Ok(None),
    };
    Ok(Some(
        raw.into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
    ))
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(lenient_optional_list(deserializer)?.unwrap_or_default())
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, UpstreamError> {
    Ok(serde_json::from_value(body)?)
}

/// Access to the TMDB REST API.
///
/// Implementors only provide [get](TmdbApi::get); the typed endpoint methods
/// are built on top of it.
#[async_trait]
pub trait TmdbApi: Send + Sync {
    /// GET `{base_url}/{endpoint}` with the given query parameters. Any
    /// non-2xx status is returned as [UpstreamError::Status].
    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, UpstreamError>;

    /// Search people by name
    async fn search_person(&self, query: &str) -> Result<TmdbPersonSearch, UpstreamError> {
        decode(self.get("search/person", &[("query", query)]).await?)
    }

    /// Get a person's combined movie and TV credits
    async fn combined_credits(
        &self,
        person_id: PersonId,
    ) -> Result<TmdbCombinedCredits, UpstreamError> {
        let endpoint = format!("person/{}/combined_credits", person_id);
        decode(self.get(&endpoint, &[]).await?)
    }

    /// Get movie or TV details with videos and watch providers
    async fn media_details(
        &self,
        media_type: &str,
        id: u64,
    ) -> Result<TmdbMediaDetails, UpstreamError> {
        let endpoint = format!("{}/{}", media_type, id);
        decode(
            self.get(&endpoint, &[("append_to_response", "videos,watch/providers")])
                .await?,
        )
    }
}

/// TMDB API client backed by reqwest
pub struct TmdbClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl TmdbClient {
    /// Create a client from application configuration
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.tmdb_timeout {
            builder = builder.timeout(timeout);
        }

        if !config.has_api_key() {
            warn!("TMDB_API_KEY not set, searches will fail until a real key is configured");
        }

        Ok(Self {
            client: builder.build().context("Failed to create HTTP client")?,
            base_url: config.tmdb_base_url.clone(),
            api_key: config.tmdb_api_key.clone(),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        let url = self.endpoint_url(endpoint);

        // The URL carries the API key, strip it from transport errors
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url()))?;

        let status = response.status();
        debug!(endpoint = %endpoint, status = status.as_u16(), "TMDB request");

        if !status.is_success() {
            if status.as_u16() == 401 {
                warn!("TMDB rejected the API key");
            }
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url()))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
pub mod fake {
    //! Scripted [TmdbApi] for tests

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    enum Scripted {
        Body(Value, Duration),
        Status(u16),
    }

    /// Answers endpoints from a script and records every call.
    /// Unscripted endpoints answer 404.
    #[derive(Default)]
    pub struct FakeTmdb {
        script: Mutex<HashMap<String, Scripted>>,
        calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl FakeTmdb {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, endpoint: &str, body: Value) -> Self {
            self.respond_after(endpoint, body, Duration::ZERO)
        }

        pub fn respond_after(self, endpoint: &str, body: Value, delay: Duration) -> Self {
            self.script
                .lock()
                .unwrap()
                .insert(endpoint.to_string(), Scripted::Body(body, delay));
            self
        }

        pub fn fail(self, endpoint: &str, status: u16) -> Self {
            self.script
                .lock()
                .unwrap()
                .insert(endpoint.to_string(), Scripted::Status(status));
            self
        }

        /// Endpoints called so far, in call order
        pub fn endpoints(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(endpoint, _)| endpoint.clone())
                .collect()
        }

        pub fn params_for(&self, endpoint: &str) -> Option<Vec<(String, String)>> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .find(|(e, _)| e == endpoint)
                .map(|(_, params)| params.clone())
        }
    }

    #[async_trait]
    impl TmdbApi for FakeTmdb {
        async fn get(
            &self,
            endpoint: &str,
            params: &[(&str, &str)],
        ) -> Result<Value, UpstreamError> {
            self.calls.lock().unwrap().push((
                endpoint.to_string(),
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));

            let answer = match self.script.lock().unwrap().get(endpoint) {
                Some(Scripted::Body(body, delay)) => Ok((body.clone(), *delay)),
                Some(Scripted::Status(status)) => Err(*status),
                None => Err(404),
            };

            match answer {
                Ok((body, delay)) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    Ok(body)
                }
                Err(status) => Err(UpstreamError::Status(status)),
            }
        }
    }
}
