//! Resolve a free-text name to a TMDB person

use tracing::{debug, info};

use crate::error::SearchError;
use crate::services::tmdb::{PersonId, TmdbApi};

/// Look up `name` on TMDB and return the first matching person.
///
/// TMDB's relevance ordering is trusted as-is: the first result wins even
/// when several people share the name. The name is sent exactly as given.
pub async fn resolve_person(tmdb: &dyn TmdbApi, name: &str) -> Result<PersonId, SearchError> {
    if name.trim().is_empty() {
        return Err(SearchError::InvalidInput);
    }

    let search = tmdb
        .search_person(name)
        .await
        .map_err(SearchError::SearchUnavailable)?;

    debug!(query = %name, count = search.results.len(), "TMDB person search returned results");

    let person = search
        .results
        .into_iter()
        .next()
        .ok_or(SearchError::PersonNotFound)?;

    info!(
        query = %name,
        person_id = %person.id,
        person_name = person.name.as_deref().unwrap_or_default(),
        "Resolved person"
    );
    Ok(person.id)
}
