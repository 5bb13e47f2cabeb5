//! # Dataset Source Capability
//!
//! Handlers never reach for the filesystem directly. They are given an
//! `Arc<dyn DatasetSource>` at startup, so whether datasets are cached, and
//! how, is decided once in `main` and can be swapped in tests.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use ofda_core::{DatasetKind, Record};

use crate::error::DatasetError;

/// A parsed dataset together with where and when it was read.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    /// Which dataset this is.
    pub kind: DatasetKind,
    /// The file the records were read from.
    pub path: PathBuf,
    /// Modification time of `path` at read time, when the platform reports one.
    pub modified: Option<SystemTime>,
    /// Length of `path` in bytes at read time.
    pub size: u64,
    /// When the file was parsed.
    pub loaded_at: DateTime<Utc>,
    /// Contents of the top-level `results` array, in file order.
    pub records: Vec<Record>,
}

impl LoadedDataset {
    /// Number of records in the dataset.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Something that can produce the records of a dataset.
///
/// Implementations perform blocking file I/O; async callers should run
/// `load` on the blocking pool.
pub trait DatasetSource: Send + Sync + std::fmt::Debug {
    /// Load (or return an already-loaded copy of) a dataset.
    fn load(&self, kind: DatasetKind) -> Result<Arc<LoadedDataset>, DatasetError>;

    /// Datasets currently held in memory. Uncached sources hold none.
    fn resident(&self) -> Vec<Arc<LoadedDataset>> {
        Vec::new()
    }
}
