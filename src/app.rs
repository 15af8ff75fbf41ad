//! Application state and HTTP router construction.
//!
//! Used by the server binary and by the router tests to build the Axum app.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
#[cfg(not(feature = "embed-frontend"))]
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::services::FilmographyService;

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub filmography: Arc<FilmographyService>,
}

impl AppState {
    pub fn new(config: Arc<Config>, filmography: Arc<FilmographyService>) -> Self {
        Self {
            config,
            filmography,
        }
    }
}

/// Build the full Axum router: /search, /healthz, layers, and the landing
/// page fallback. Returns Router<()> (state fully applied) for use with
/// axum::serve.
pub fn build_app(state: AppState) -> Router<()> {
    #[cfg(not(feature = "embed-frontend"))]
    let static_dir = state.config.static_dir.clone();

    let app = Router::new()
        .merge(api::search::router())
        .merge(api::health::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    #[cfg(feature = "embed-frontend")]
    let app = app.fallback(crate::static_assets::serve_landing_page);

    // `/` resolves to index.html; missing files are a plain 404
    #[cfg(not(feature = "embed-frontend"))]
    let app = app.fallback_service(ServeDir::new(static_dir));

    app
}
