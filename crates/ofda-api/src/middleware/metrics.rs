//! # Prometheus Metrics
//!
//! HTTP-level metrics (request counts, latency, errors) are recorded in
//! middleware. Dataset gauges (records and load time per resident dataset,
//! cache hits and loads) are refreshed on each `/metrics` scrape from
//! `AppState` (pull model); see the handler in `lib.rs`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use ofda_core::DatasetKind;
use prometheus::core::Collector;
use prometheus::{Encoder, GaugeVec, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,

    // -- HTTP middleware metrics (push model) --
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,

    // -- Dataset gauges (pull model, updated on /metrics scrape) --
    dataset_records: GaugeVec,
    dataset_loaded_timestamp_seconds: GaugeVec,
    dataset_cache_hits: prometheus::Gauge,
    dataset_cache_loads: prometheus::Gauge,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("requests", &self.requests())
            .field("errors", &self.errors())
            .finish()
    }
}

impl ApiMetrics {
    /// Create a new metrics instance with a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("ofda_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "ofda_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "path"],
        )
        .expect("metric can be created");

        let http_errors_total = IntCounterVec::new(
            Opts::new("ofda_http_errors_total", "Total HTTP errors (4xx and 5xx)"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let dataset_records = GaugeVec::new(
            Opts::new("ofda_dataset_records", "Records held in memory per dataset"),
            &["dataset"],
        )
        .expect("metric can be created");

        let dataset_loaded_timestamp_seconds = GaugeVec::new(
            Opts::new(
                "ofda_dataset_loaded_timestamp_seconds",
                "Unix time the resident copy of each dataset was parsed",
            ),
            &["dataset"],
        )
        .expect("metric can be created");

        let dataset_cache_hits = prometheus::Gauge::new(
            "ofda_dataset_cache_hits",
            "Dataset lookups served from memory since start",
        )
        .expect("metric can be created");

        let dataset_cache_loads = prometheus::Gauge::new(
            "ofda_dataset_cache_loads",
            "Dataset files parsed by the cache since start",
        )
        .expect("metric can be created");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_errors_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(dataset_records.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(dataset_loaded_timestamp_seconds.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(dataset_cache_hits.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(dataset_cache_loads.clone()))
            .expect("metric can be registered");

        Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
                dataset_records,
                dataset_loaded_timestamp_seconds,
                dataset_cache_hits,
                dataset_cache_loads,
            }),
        }
    }

    /// Return current total request count (sum across all labels).
    pub fn requests(&self) -> u64 {
        sum_counter(&self.inner.http_requests_total)
    }

    /// Return current total error count (sum across all labels).
    pub fn errors(&self) -> u64 {
        sum_counter(&self.inner.http_errors_total)
    }

    /// Record an HTTP request (called by the middleware).
    fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
        if status >= 400 {
            self.inner
                .http_errors_total
                .with_label_values(&[method, path, &status_str])
                .inc();
        }
    }

    /// Replace the per-dataset gauges with the current resident set.
    pub fn set_resident_datasets(&self, datasets: impl IntoIterator<Item = (DatasetKind, usize, i64)>) {
        self.inner.dataset_records.reset();
        self.inner.dataset_loaded_timestamp_seconds.reset();
        for (kind, records, loaded_at) in datasets {
            self.inner
                .dataset_records
                .with_label_values(&[kind.slug()])
                .set(records as f64);
            self.inner
                .dataset_loaded_timestamp_seconds
                .with_label_values(&[kind.slug()])
                .set(loaded_at as f64);
        }
    }

    /// Publish the cache hit/load counters.
    pub fn set_cache_stats(&self, hits: u64, loads: u64) {
        self.inner.dataset_cache_hits.set(hits as f64);
        self.inner.dataset_cache_loads.set(loads as f64);
    }

    /// Gather all metrics and encode to Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer)
            .map_err(|e| format!("metrics encoding produced invalid UTF-8: {e}"))
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn sum_counter(counter: &IntCounterVec) -> u64 {
    counter
        .collect()
        .iter()
        .flat_map(|mf| mf.get_metric())
        .map(|m| m.get_counter().get_value() as u64)
        .sum()
}

/// Collapse request paths onto the fixed route set.
///
/// Trailing slashes are dropped so `/device/510k/` and `/device/510k` share a
/// series; anything outside the route table is labelled `unmatched` so that
/// scanners probing random URLs cannot blow up label cardinality.
fn normalize_path(path: &str) -> &str {
    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        p => p,
    };
    let known = DatasetKind::ALL.iter().any(|k| k.route() == trimmed)
        || matches!(
            trimmed,
            "/" | "/health/liveness" | "/health/readiness" | "/metrics" | "/openapi.json"
        );
    if known {
        trimmed
    } else {
        "unmatched"
    }
}

/// Middleware that records HTTP request metrics via Prometheus.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path()).to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        let duration = start.elapsed().as_secs_f64();
        let status = response.status().as_u16();
        m.record_request(&method, &path, status, duration);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_metrics_new_starts_at_zero() {
        let m = ApiMetrics::new();
        assert_eq!(m.requests(), 0);
        assert_eq!(m.errors(), 0);
    }

    #[test]
    fn requests_and_errors_count_independently() {
        let m = ApiMetrics::new();
        for _ in 0..5 {
            m.record_request("GET", "/device/510k", 200, 0.01);
        }
        m.record_request("GET", "/device/510k", 422, 0.001);
        m.record_request("GET", "/device/enforcement", 500, 0.2);
        assert_eq!(m.requests(), 7);
        assert_eq!(m.errors(), 2);
    }

    #[test]
    fn concurrent_increments_are_safe() {
        let m = ApiMetrics::new();
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let m = m.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        m.record_request("GET", "/", 200, 0.001);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(m.requests(), 4000);
    }

    #[test]
    fn normalize_known_routes() {
        assert_eq!(normalize_path("/device/510k/"), "/device/510k");
        assert_eq!(normalize_path("/device/classification"), "/device/classification");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/metrics"), "/metrics");
    }

    #[test]
    fn normalize_unknown_routes() {
        assert_eq!(normalize_path("/wp-admin/setup.php"), "unmatched");
        assert_eq!(normalize_path("/device/pma/"), "unmatched");
    }

    #[test]
    fn encodes_dataset_gauges() {
        let m = ApiMetrics::new();
        m.set_resident_datasets([(DatasetKind::Enforcement, 42, 1_700_000_000)]);
        m.set_cache_stats(3, 1);
        let text = m.gather_and_encode().unwrap();
        assert!(text.contains(r#"ofda_dataset_records{dataset="enforcement"} 42"#));
        assert!(text.contains("ofda_dataset_cache_hits 3"));
        assert!(text.contains("ofda_dataset_cache_loads 1"));
    }

    #[test]
    fn reset_drops_evicted_datasets() {
        let m = ApiMetrics::new();
        m.set_resident_datasets([(DatasetKind::Clearance510k, 5, 0)]);
        m.set_resident_datasets(std::iter::empty());
        let text = m.gather_and_encode().unwrap();
        assert!(!text.contains(r#"dataset="510k""#));
    }
}
