//! # ofda-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the local openFDA API.
//! Binds to `HOST:PORT` (default `0.0.0.0:8000`).

use std::net::SocketAddr;

use ofda_api::state::{AppConfig, AppState, LogFormat};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // Initialize structured tracing.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }

    tracing::info!(
        data_dir = %config.data_dirs.primary.display(),
        legacy_dir = ?config.data_dirs.legacy,
        cache = config.cache_enabled,
        metrics = config.metrics_enabled,
        "configuration loaded"
    );

    let state = AppState::new(config.clone());

    // Parse datasets up front so the first request per endpoint is not slow.
    if config.cache_enabled {
        let warm = state.clone();
        let loaded = tokio::task::spawn_blocking(move || warm.preload()).await?;
        tracing::info!(loaded, "dataset preload finished");
    }

    let app = ofda_api::app(state);

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("ofda API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received SIGINT, shutting down");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, shutting down");
        }
    }
}
