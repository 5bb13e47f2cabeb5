//! # File Resolution
//!
//! Bulk exports are not always dropped in under their canonical name: a
//! refreshed download may carry a different part suffix, and older
//! installations kept the files in a `json files` directory next to `data`.
//!
//! Resolution order, first match wins:
//!
//! 1. `{primary}/{filename}`
//! 2. `{primary}/{stem}*.json`, lexically first
//! 3. `{legacy}/{stem}*.json`, lexically first (skipped if the directory is
//!    absent or not configured)

use std::fs;
use std::path::{Path, PathBuf};

use ofda_core::DatasetKind;

use crate::error::DatasetError;

/// Default primary data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default legacy fallback directory, relative to the working directory.
pub const DEFAULT_LEGACY_DIR: &str = "json files";

/// Directories searched for dataset files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirs {
    /// Primary data directory.
    pub primary: PathBuf,
    /// Legacy fallback directory, searched by prefix only.
    pub legacy: Option<PathBuf>,
}

impl Default for DataDirs {
    fn default() -> Self {
        Self {
            primary: PathBuf::from(DEFAULT_DATA_DIR),
            legacy: Some(PathBuf::from(DEFAULT_LEGACY_DIR)),
        }
    }
}

impl DataDirs {
    /// Primary directory only, no legacy fallback.
    pub fn new(primary: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            legacy: None,
        }
    }

    /// Add a legacy fallback directory.
    pub fn with_legacy(mut self, legacy: impl Into<PathBuf>) -> Self {
        self.legacy = Some(legacy.into());
        self
    }

    /// Resolve a dataset to the file that should be read.
    pub fn resolve(&self, kind: DatasetKind) -> Result<PathBuf, DatasetError> {
        let exact = self.primary.join(kind.filename());
        if exact.is_file() {
            return Ok(exact);
        }

        if let Some(found) = first_with_prefix(&self.primary, kind.file_stem())? {
            tracing::debug!(
                dataset = %kind,
                path = %found.display(),
                "exact file missing, using prefix match in data directory"
            );
            return Ok(found);
        }

        if let Some(legacy) = &self.legacy {
            if let Some(found) = first_with_prefix(legacy, kind.file_stem())? {
                tracing::info!(
                    dataset = %kind,
                    path = %found.display(),
                    "using dataset from legacy directory"
                );
                return Ok(found);
            }
        }

        Err(DatasetError::NotFound {
            filename: kind.filename().to_string(),
        })
    }
}

/// Lexically first `{prefix}*.json` regular file in `dir`, if any.
///
/// A missing directory yields `None`, not an error.
fn first_with_prefix(dir: &Path, prefix: &str) -> Result<Option<PathBuf>, DatasetError> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| DatasetError::io(dir, e))? {
        let entry = entry.map_err(|e| DatasetError::io(dir, e))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(prefix) && name.ends_with(".json") && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, r#"{"results": []}"#).unwrap();
        path
    }

    #[test]
    fn exact_name_wins() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "device-510k-0001-of-0001-a.json");
        let exact = touch(tmp.path(), "device-510k-0001-of-0001.json");
        let dirs = DataDirs::new(tmp.path());
        assert_eq!(dirs.resolve(DatasetKind::Clearance510k).unwrap(), exact);
    }

    #[test]
    fn prefix_match_takes_lexically_first() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "device-enforcement-0001-of-0001-z.json");
        let first = touch(tmp.path(), "device-enforcement-0001-of-0001-b.json");
        touch(tmp.path(), "device-enforcement-0001-of-0001-b.json.bak");
        let dirs = DataDirs::new(tmp.path());
        assert_eq!(dirs.resolve(DatasetKind::Enforcement).unwrap(), first);
    }

    #[test]
    fn non_json_prefix_matches_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "device-classification-0001-of-0001.zip");
        let dirs = DataDirs::new(tmp.path());
        assert!(matches!(
            dirs.resolve(DatasetKind::Classification),
            Err(DatasetError::NotFound { .. })
        ));
    }

    #[test]
    fn falls_back_to_legacy_directory() {
        let primary = tempfile::tempdir().unwrap();
        let legacy = tempfile::tempdir().unwrap();
        let found = touch(legacy.path(), "device-classification-0001-of-0001.json");
        let dirs = DataDirs::new(primary.path()).with_legacy(legacy.path());
        assert_eq!(dirs.resolve(DatasetKind::Classification).unwrap(), found);
    }

    #[test]
    fn primary_prefix_beats_legacy_exact() {
        let primary = tempfile::tempdir().unwrap();
        let legacy = tempfile::tempdir().unwrap();
        let preferred = touch(primary.path(), "device-510k-0001-of-0001-new.json");
        touch(legacy.path(), "device-510k-0001-of-0001.json");
        let dirs = DataDirs::new(primary.path()).with_legacy(legacy.path());
        assert_eq!(dirs.resolve(DatasetKind::Clearance510k).unwrap(), preferred);
    }

    #[test]
    fn missing_everywhere_names_requested_file() {
        let primary = tempfile::tempdir().unwrap();
        let dirs = DataDirs::new(primary.path().join("absent"))
            .with_legacy(primary.path().join("also-absent"));
        match dirs.resolve(DatasetKind::Clearance510k) {
            Err(DatasetError::NotFound { filename }) => {
                assert_eq!(filename, "device-510k-0001-of-0001.json");
            }
            other => panic!("expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn default_dirs_match_legacy_layout() {
        let dirs = DataDirs::default();
        assert_eq!(dirs.primary, PathBuf::from("data"));
        assert_eq!(dirs.legacy, Some(PathBuf::from("json files")));
    }
}
