//! Credit enrichment: combined credits folded with trailers and streaming providers
//!
//! Every cast and crew entry becomes one [FormattedCredit]. Credits are fetched
//! in one call; details are then fetched per credit. A failed details call only
//! leaves `trailer` and `streaming_platforms` empty, while a failed credits
//! call fails the whole lookup.

use futures::StreamExt;
use futures::stream;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::UpstreamError;
use crate::services::tmdb::{PersonId, TmdbApi, TmdbCredit, TmdbVideo, TmdbWatchProviders};

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Whether a credit is for a film or a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaKind {
    #[serde(rename = "Movie")]
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl MediaKind {
    /// `tv` maps to [MediaKind::TvShow]; anything else, including a missing
    /// media type, is a movie.
    pub fn from_media_type(media_type: Option<&str>) -> Self {
        match media_type {
            Some("tv") => MediaKind::TvShow,
            _ => MediaKind::Movie,
        }
    }
}

/// One credit as returned by `POST /search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedCredit {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub role: Option<String>,
    pub description: Option<String>,
    pub trailer: Option<String>,
    pub streaming_platforms: Option<Vec<String>>,
}

/// Options controlling detail enrichment
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Region whose flat-rate providers are reported
    pub watch_region: String,
    /// Detail fetches in flight at once (1 = one after another)
    pub concurrency: usize,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            watch_region: "US".to_string(),
            concurrency: 1,
        }
    }
}

/// Movie `title`, falling back to the TV `name`
pub fn credit_title(credit: &TmdbCredit) -> Option<String> {
    credit
        .title
        .clone()
        .filter(|t| !t.is_empty())
        .or_else(|| credit.name.clone())
}

/// Cast `character`, falling back to the crew `job`
pub fn credit_role(credit: &TmdbCredit) -> Option<String> {
    credit.character.clone().or_else(|| credit.job.clone())
}

/// Watch URL of the first YouTube trailer, in TMDB order
pub fn trailer_url(videos: &[TmdbVideo]) -> Option<String> {
    videos
        .iter()
        .filter(|v| v.video_type.as_deref() == Some("Trailer"))
        .filter(|v| v.site.as_deref() == Some("YouTube"))
        .find_map(|v| v.key.as_deref())
        .map(|key| format!("{YOUTUBE_WATCH_URL}{key}"))
}

/// Names of the flat-rate providers for `region`.
///
/// Returns `None` when TMDB has no entry for the region or the entry has no
/// flat-rate list, so "unknown" stays distinct from "known to be none".
pub fn streaming_platforms(providers: &TmdbWatchProviders, region: &str) -> Option<Vec<String>> {
    providers.region(region).and_then(|r| r.flatrate).map(|flatrate| {
        flatrate
            .into_iter()
            .filter_map(|p| p.provider_name)
            .collect()
    })
}

/// Fetch a person's combined credits and enrich each one.
///
/// Cast entries come first, then crew, both in TMDB order. Output order
/// matches input order regardless of `options.concurrency`.
pub async fn enrich_credits(
    tmdb: &dyn TmdbApi,
    person_id: PersonId,
    options: &EnrichOptions,
) -> Result<Vec<FormattedCredit>, UpstreamError> {
    let credits = tmdb.combined_credits(person_id).await?;

    info!(
        person_id = %person_id,
        cast = credits.cast.len(),
        crew = credits.crew.len(),
        "Fetched combined credits"
    );

    let region = options.watch_region.as_str();
    let formatted: Vec<FormattedCredit> = stream::iter(
        credits
            .cast
            .into_iter()
            .chain(credits.crew)
            .map(|credit| enrich_credit(tmdb, credit, region)),
    )
    .buffered(options.concurrency.max(1))
    .collect()
    .await;

    let enriched = formatted
        .iter()
        .filter(|c| c.trailer.is_some() || c.streaming_platforms.is_some())
        .count();
    debug!(person_id = %person_id, total = formatted.len(), enriched, "Enriched credits");

    Ok(formatted)
}

async fn enrich_credit(tmdb: &dyn TmdbApi, credit: TmdbCredit, region: &str) -> FormattedCredit {
    let mut formatted = FormattedCredit {
        title: credit_title(&credit),
        kind: MediaKind::from_media_type(credit.media_type.as_deref()),
        role: credit_role(&credit),
        description: credit.overview.clone(),
        trailer: None,
        streaming_platforms: None,
    };

    let (Some(media_type), Some(id)) = (credit.media_type.as_deref(), credit.id) else {
        debug!(title = ?formatted.title, "Credit has no media reference, skipping details");
        return formatted;
    };

    match tmdb.media_details(media_type, id).await {
        Ok(details) => {
            formatted.trailer = details
                .videos
                .as_ref()
                .and_then(|v| trailer_url(&v.results));
            formatted.streaming_platforms = details
                .watch_providers
                .as_ref()
                .and_then(|p| streaming_platforms(p, region));
        }
        Err(e) => {
            debug!(media_type, id, error = %e, "Details unavailable, leaving credit unenriched");
        }
    }

    formatted
}
