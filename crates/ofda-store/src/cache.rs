//! # Dataset Cache
//!
//! Process-wide, one entry per [`DatasetKind`]. Entries are `Arc`s published
//! into a `parking_lot::RwLock` map in a single insert, so a reader either
//! sees the previous complete dataset or the new complete dataset.
//!
//! ## Invalidation
//!
//! Every lookup re-resolves the dataset path and stats it (cheap compared to
//! parsing). The entry is reused only if the resolved path, modification
//! time and length are unchanged. Replacing or touching the file causes a
//! reload on the next request. A lookup that finds no file evicts the entry.
//!
//! ## Load Coalescing
//!
//! Each dataset has its own load mutex. Concurrent misses for the same
//! dataset serialize on it and re-check the map after acquiring it, so a
//! given file version is parsed at most once. Readers of other datasets, and
//! readers hitting a fresh entry, never touch the load mutex.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use ofda_core::DatasetKind;
use parking_lot::{Mutex, RwLock};

use crate::error::DatasetError;
use crate::loader::DatasetLoader;
use crate::source::{DatasetSource, LoadedDataset};

/// Hit/load counters, for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from memory.
    pub hits: u64,
    /// Lookups that parsed the file.
    pub loads: u64,
}

/// Caching [`DatasetSource`] over a [`DatasetLoader`].
#[derive(Debug)]
pub struct DatasetCache {
    loader: DatasetLoader,
    entries: RwLock<HashMap<DatasetKind, Arc<LoadedDataset>>>,
    load_locks: [Mutex<()>; DatasetKind::ALL.len()],
    hits: AtomicU64,
    loads: AtomicU64,
}

impl DatasetCache {
    /// Create an empty cache. Nothing is read until the first lookup.
    pub fn new(loader: DatasetLoader) -> Self {
        Self {
            loader,
            entries: RwLock::new(HashMap::new()),
            load_locks: Default::default(),
            hits: AtomicU64::new(0),
            loads: AtomicU64::new(0),
        }
    }

    /// Drop the cached copy of one dataset.
    pub fn invalidate(&self, kind: DatasetKind) {
        if self.entries.write().remove(&kind).is_some() {
            tracing::debug!(dataset = %kind, "cache entry invalidated");
        }
    }

    /// Drop every cached dataset.
    pub fn invalidate_all(&self) {
        self.entries.write().clear();
    }

    /// Current hit/load counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
        }
    }

    fn fresh(
        &self,
        kind: DatasetKind,
        path: &Path,
        modified: Option<SystemTime>,
        size: u64,
    ) -> Option<Arc<LoadedDataset>> {
        self.entries
            .read()
            .get(&kind)
            .filter(|entry| {
                entry.path == path && entry.modified == modified && entry.size == size
            })
            .cloned()
    }
}

impl DatasetSource for DatasetCache {
    fn load(&self, kind: DatasetKind) -> Result<Arc<LoadedDataset>, DatasetError> {
        let path = match self.loader.dirs().resolve(kind) {
            Ok(path) => path,
            Err(err) => {
                if matches!(err, DatasetError::NotFound { .. }) {
                    self.invalidate(kind);
                }
                return Err(err);
            }
        };
        let metadata = fs::metadata(&path).map_err(|e| DatasetError::io(&path, e))?;
        let (modified, size) = (metadata.modified().ok(), metadata.len());

        if let Some(hit) = self.fresh(kind, &path, modified, size) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(dataset = %kind, "dataset cache hit");
            return Ok(hit);
        }

        let _guard = self.load_locks[kind as usize].lock();
        if let Some(hit) = self.fresh(kind, &path, modified, size) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit);
        }

        let loaded = Arc::new(self.loader.read(kind, &path)?);
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.entries.write().insert(kind, Arc::clone(&loaded));
        Ok(loaded)
    }

    fn resident(&self) -> Vec<Arc<LoadedDataset>> {
        let mut all: Vec<_> = self.entries.read().values().cloned().collect();
        all.sort_by_key(|d| d.kind);
        all
    }
}
