//! Error types for TMDB calls and the search endpoint

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Failure of a single TMDB call
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("TMDB returned status {0}")]
    Status(u16),

    #[error("TMDB request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse TMDB response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Reasons a person search can fail
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No name provided")]
    InvalidInput,

    #[error("Failed to fetch data from TMDB API")]
    SearchUnavailable(#[source] UpstreamError),

    #[error("Person not found")]
    PersonNotFound,

    #[error("Failed to fetch credits data from TMDB API")]
    CreditsUnavailable(#[source] UpstreamError),
}

impl SearchError {
    pub fn status(&self) -> StatusCode {
        match self {
            SearchError::InvalidInput => StatusCode::BAD_REQUEST,
            SearchError::PersonNotFound => StatusCode::NOT_FOUND,
            SearchError::SearchUnavailable(_) | SearchError::CreditsUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn upstream(&self) -> Option<&UpstreamError> {
        match self {
            SearchError::SearchUnavailable(e) | SearchError::CreditsUnavailable(e) => Some(e),
            _ => None,
        }
    }

    /// Attach the upstream failure text to the response body
    pub fn verbose(self) -> VerboseSearchError {
        VerboseSearchError(self)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            detail: None,
        };
        (self.status(), Json(body)).into_response()
    }
}

/// [SearchError] rendered with a `detail` field, used when verbose errors are on
#[derive(Debug)]
pub struct VerboseSearchError(pub SearchError);

impl IntoResponse for VerboseSearchError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.to_string(),
            detail: self.0.upstream().map(|e| e.to_string()),
        };
        (self.0.status(), Json(body)).into_response()
    }
}
