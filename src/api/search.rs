//! Person search endpoint

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::app::AppState;
use crate::error::SearchError;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Person's display name
    #[serde(default)]
    pub name: Option<String>,
}

/// Look up a person's credits by name
async fn search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Response {
    let name = match payload {
        Ok(Json(request)) => request.name.unwrap_or_default(),
        Err(rejection) => {
            debug!(error = %rejection, "Rejected search body");
            return error_response(&state, SearchError::InvalidInput);
        }
    };

    match state.filmography.search(&name).await {
        Ok(credits) => Json(credits).into_response(),
        Err(e) => error_response(&state, e),
    }
}

fn error_response(state: &AppState, error: SearchError) -> Response {
    if error.status().is_server_error() {
        match std::error::Error::source(&error) {
            Some(source) => warn!(error = %error, source = %source, "Search failed"),
            None => warn!(error = %error, "Search failed"),
        }
    } else {
        debug!(error = %error, "Search rejected");
    }

    if state.config.debug {
        error.verbose().into_response()
    } else {
        error.into_response()
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/search", post(search))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::app::{AppState, build_app};
    use crate::config::Config;
    use crate::services::credits::EnrichOptions;
    use crate::services::filmography::FilmographyService;
    use crate::services::tmdb::fake::FakeTmdb;

    fn state_with(tmdb: Arc<FakeTmdb>, debug: bool) -> AppState {
        let config = Config::from_lookup(|key| match key {
            "DEBUG" if debug => Some("true".to_string()),
            _ => None,
        })
        .unwrap();
        AppState::new(
            Arc::new(config),
            Arc::new(FilmographyService::new(tmdb, EnrichOptions::default())),
        )
    }

    async fn post_search(state: AppState, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = build_app(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_or_empty_name_is_bad_request() {
        let tmdb = Arc::new(FakeTmdb::new());
        for body in [r#"{}"#, r#"{"name": ""}"#, r#"{"name": null}"#, r#"{"name": 5}"#, "not json"] {
            let (status, json) = post_search(state_with(tmdb.clone(), false), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(json, json!({ "error": "No name provided" }));
        }
        assert!(tmdb.endpoints().is_empty());
    }

    #[tokio::test]
    async fn test_person_not_found() {
        let tmdb = Arc::new(FakeTmdb::new().respond("search/person", json!({ "results": [] })));
        let (status, json) = post_search(state_with(tmdb.clone(), false), r#"{"name":"Nobody"}"#).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, json!({ "error": "Person not found" }));
        assert_eq!(tmdb.endpoints(), vec!["search/person"]);
    }

    #[tokio::test]
    async fn test_search_upstream_failure() {
        let tmdb = Arc::new(FakeTmdb::new().fail("search/person", 401));
        let (status, json) = post_search(state_with(tmdb.clone(), false), r#"{"name":"Jane"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({ "error": "Failed to fetch data from TMDB API" }));
        assert_eq!(tmdb.endpoints(), vec!["search/person"]);
    }

    #[tokio::test]
    async fn test_credits_upstream_failure() {
        let tmdb = Arc::new(
            FakeTmdb::new()
                .respond("search/person", json!({ "results": [{ "id": 42 }] }))
                .fail("person/42/combined_credits", 502),
        );
        let (status, json) = post_search(state_with(tmdb, false), r#"{"name":"Jane"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json,
            json!({ "error": "Failed to fetch credits data from TMDB API" })
        );
    }

    #[tokio::test]
    async fn test_debug_mode_adds_detail() {
        let tmdb = Arc::new(FakeTmdb::new().fail("search/person", 401));
        let (status, json) = post_search(state_with(tmdb, true), r#"{"name":"Jane"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json,
            json!({
                "error": "Failed to fetch data from TMDB API",
                "detail": "TMDB returned status 401"
            })
        );
    }

    #[tokio::test]
    async fn test_jane_doe_with_failing_details() {
        let tmdb = Arc::new(
            FakeTmdb::new()
                .respond("search/person", json!({ "results": [{ "id": 42, "name": "Jane Doe" }] }))
                .respond(
                    "person/42/combined_credits",
                    json!({
                        "cast": [{ "id": 1, "media_type": "movie", "title": "Film A", "character": "Lead", "overview": "..." }],
                        "crew": [{ "id": 2, "media_type": "tv", "name": "Show B", "job": "Writer", "overview": "..." }]
                    }),
                )
                .fail("movie/1", 500)
                .fail("tv/2", 500),
        );
        let (status, json) = post_search(state_with(tmdb.clone(), false), r#"{"name":"Jane Doe"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!([
                {
                    "title": "Film A",
                    "type": "Movie",
                    "role": "Lead",
                    "description": "...",
                    "trailer": null,
                    "streaming_platforms": null
                },
                {
                    "title": "Show B",
                    "type": "TV Show",
                    "role": "Writer",
                    "description": "...",
                    "trailer": null,
                    "streaming_platforms": null
                }
            ])
        );
        assert_eq!(
            tmdb.endpoints(),
            vec!["search/person", "person/42/combined_credits", "movie/1", "tv/2"]
        );
    }
}
