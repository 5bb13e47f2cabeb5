//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The only thing handlers need is a [`DatasetSource`]. Which implementation
//! backs it (the process-wide [`DatasetCache`] or the re-reading
//! [`DatasetLoader`]) is chosen here from [`AppConfig`], so there is no
//! module-level cache anywhere in the crate.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use ofda_core::DatasetKind;
use ofda_store::{DataDirs, DatasetCache, DatasetLoader, DatasetSource, DEFAULT_LEGACY_DIR};

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, one line per event.
    #[default]
    Text,
    /// Newline-delimited JSON.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Invalid {
                var: "OFDA_LOG_FORMAT",
                value: other.to_string(),
            }),
        }
    }
}

/// Error reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to a value that could not be parsed.
    #[error("invalid value for {var}: \"{value}\"")]
    Invalid {
        /// Environment variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address to bind the HTTP server to.
    pub host: IpAddr,
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Where dataset files are looked up.
    pub data_dirs: DataDirs,
    /// Keep parsed datasets in memory between requests.
    pub cache_enabled: bool,
    /// Record request metrics and serve `/metrics`.
    pub metrics_enabled: bool,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            data_dirs: DataDirs::default(),
            cache_enabled: true,
            metrics_enabled: true,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Build configuration from process environment variables.
    ///
    /// | Variable               | Default      |
    /// |------------------------|--------------|
    /// | `HOST`                 | `0.0.0.0`    |
    /// | `PORT`                 | `8000`       |
    /// | `OFDA_DATA_DIR`        | `data`       |
    /// | `OFDA_LEGACY_DIR`      | `json files` (empty disables) |
    /// | `OFDA_CACHE_ENABLED`   | `true`       |
    /// | `OFDA_METRICS_ENABLED` | `true`       |
    /// | `OFDA_LOG_FORMAT`      | `text`       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = parse_var(&lookup, "HOST")?.unwrap_or(defaults.host);
        let port = parse_var(&lookup, "PORT")?.unwrap_or(defaults.port);

        let primary = lookup("OFDA_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dirs.primary);
        let legacy = match lookup("OFDA_LEGACY_DIR") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(PathBuf::from(v)),
            None => Some(PathBuf::from(DEFAULT_LEGACY_DIR)),
        };

        let cache_enabled = flag(&lookup, "OFDA_CACHE_ENABLED", defaults.cache_enabled);
        let metrics_enabled = flag(&lookup, "OFDA_METRICS_ENABLED", defaults.metrics_enabled);
        let log_format = match lookup("OFDA_LOG_FORMAT") {
            Some(v) => v.parse()?,
            None => defaults.log_format,
        };

        Ok(Self {
            host,
            port,
            data_dirs: DataDirs { primary, legacy },
            cache_enabled,
            metrics_enabled,
            log_format,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        None => Ok(None),
    }
}

/// Boolean switch. Anything other than `false`/`0`/`off` counts as on.
fn flag(lookup: &impl Fn(&str) -> Option<String>, var: &str, default: bool) -> bool {
    lookup(var)
        .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "off"))
        .unwrap_or(default)
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where handlers get dataset records from.
    pub datasets: Arc<dyn DatasetSource>,
    /// The cache behind `datasets`, when caching is enabled. Kept for metrics.
    pub cache: Option<Arc<DatasetCache>>,
    /// Configuration the state was built from.
    pub config: AppConfig,
}

impl AppState {
    /// Build state from configuration, choosing cached or uncached loading.
    pub fn new(config: AppConfig) -> Self {
        let loader = DatasetLoader::new(config.data_dirs.clone());
        if config.cache_enabled {
            let cache = Arc::new(DatasetCache::new(loader));
            Self {
                datasets: cache.clone(),
                cache: Some(cache),
                config,
            }
        } else {
            Self {
                datasets: Arc::new(loader),
                cache: None,
                config,
            }
        }
    }

    /// Build state around an explicit dataset source.
    pub fn with_source(config: AppConfig, datasets: Arc<dyn DatasetSource>) -> Self {
        Self {
            datasets,
            cache: None,
            config,
        }
    }

    /// Load every dataset once so the first request does not pay the parse.
    ///
    /// Failures are logged, not fatal: a missing dataset only affects its own
    /// endpoint. Blocking; call from the blocking pool.
    pub fn preload(&self) -> usize {
        let mut loaded = 0;
        for kind in DatasetKind::ALL {
            match self.datasets.load(kind) {
                Ok(ds) => {
                    loaded += 1;
                    tracing::info!(dataset = %kind, records = ds.len(), "dataset preloaded");
                }
                Err(e) => tracing::warn!(dataset = %kind, error = %e, "dataset unavailable"),
            }
        }
        loaded
    }
}
