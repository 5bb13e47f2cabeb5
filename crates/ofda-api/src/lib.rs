//! # ofda-api — Axum API Service for Local openFDA Device Datasets
//!
//! Serves search and skip/limit pagination over three openFDA bulk-download
//! files kept on local disk.
//!
//! ## API Surface
//!
//! | Route                        | Module                 |
//! |------------------------------|------------------------|
//! | `/`                          | [`routes::index`]      |
//! | `/device/510k/`              | [`routes::datasets`]   |
//! | `/device/classification/`    | [`routes::datasets`]   |
//! | `/device/enforcement/`       | [`routes::datasets`]   |
//! | `/health/liveness`, `/health/readiness` | probes here |
//! | `/metrics`                   | Prometheus scrape (when enabled) |
//! | `/openapi.json`              | [`openapi`]            |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Router};
use ofda_core::DatasetKind;
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let metrics_on = state.config.metrics_enabled;

    let mut router = Router::new()
        .merge(routes::router())
        .merge(openapi::router())
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    if metrics_on {
        let metrics = ApiMetrics::new();
        router = router
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// GET /metrics — Prometheus metrics scrape endpoint.
///
/// Refreshes the dataset gauges from `AppState` on each scrape, then encodes
/// every metric in Prometheus text exposition format.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    metrics.set_resident_datasets(
        state
            .datasets
            .resident()
            .iter()
            .map(|ds| (ds.kind, ds.len(), ds.loaded_at.timestamp())),
    );
    if let Some(cache) = &state.cache {
        let stats = cache.stats();
        metrics.set_cache_stats(stats.hits, stats.loads);
    }

    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — 200 "ready" when every dataset resolves to a file,
/// in the primary or the legacy directory; 503 naming the missing ones
/// otherwise.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let dirs = state.config.data_dirs.clone();
    let missing = tokio::task::spawn_blocking(move || {
        DatasetKind::ALL
            .into_iter()
            .filter_map(|kind| dirs.resolve(kind).err().map(|e| format!("{kind}: {e}")))
            .collect::<Vec<_>>()
    })
    .await;

    match missing {
        Ok(missing) if missing.is_empty() => (StatusCode::OK, "ready".to_string()),
        Ok(missing) => {
            let detail = missing.join("; ");
            tracing::warn!(%detail, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("datasets unavailable: {detail}"),
            )
        }
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("readiness check failed: {e}"),
        ),
    }
}
