//! Person search pipeline: resolve the name, then fetch and enrich credits

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::SearchError;
use crate::services::credits::{EnrichOptions, FormattedCredit, enrich_credits};
use crate::services::people::resolve_person;
use crate::services::tmdb::TmdbApi;

/// Looks up filmographies on TMDB. Holds no per-request state, so one
/// instance is shared by all handlers.
pub struct FilmographyService {
    tmdb: Arc<dyn TmdbApi>,
    options: EnrichOptions,
}

impl FilmographyService {
    pub fn new(tmdb: Arc<dyn TmdbApi>, options: EnrichOptions) -> Self {
        Self { tmdb, options }
    }

    pub fn from_config(tmdb: Arc<dyn TmdbApi>, config: &Config) -> Self {
        Self::new(
            tmdb,
            EnrichOptions {
                watch_region: config.watch_region.clone(),
                concurrency: config.detail_concurrency,
            },
        )
    }

    /// Resolve `name` and return every credit of the first matching person.
    ///
    /// Makes one search call, one credits call, then one details call per
    /// credit. Details failures are absorbed per credit.
    pub async fn search(&self, name: &str) -> Result<Vec<FormattedCredit>, SearchError> {
        let person_id = resolve_person(self.tmdb.as_ref(), name).await?;

        let credits = enrich_credits(self.tmdb.as_ref(), person_id, &self.options)
            .await
            .map_err(SearchError::CreditsUnavailable)?;

        info!(person_id = %person_id, credits = credits.len(), "Search complete");
        Ok(credits)
    }
}
