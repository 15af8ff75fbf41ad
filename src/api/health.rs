//! Health check endpoints

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// False while the placeholder TMDB key is in use
    pub tmdb_configured: bool,
}

/// Health check - always returns OK if the server is running
async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        tmdb_configured: state.config.has_api_key(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}
