//! Filmography server entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use filmography::app::{AppState, build_app};
use filmography::cli::CliOptions;
use filmography::config::Config;
use filmography::services::{FilmographyService, TmdbClient};
use filmography::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let mut config = Config::from_env()?;
    CliOptions::from_args().apply(&mut config);

    telemetry::init(config.log_format);
    info!("Starting Filmography");

    let config = Arc::new(config);
    let tmdb = Arc::new(TmdbClient::new(&config)?);
    let filmography = Arc::new(FilmographyService::from_config(tmdb, &config));
    info!(
        base_url = %config.tmdb_base_url,
        region = %config.watch_region,
        detail_concurrency = config.detail_concurrency,
        "TMDB client initialized"
    );

    if config.debug {
        tracing::warn!("Verbose error responses enabled, do not expose this instance publicly");
    }

    let app = build_app(AppState::new(config.clone(), filmography));

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    let addr = listener.local_addr().context("Listener has no local address")?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("axum::serve")?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
