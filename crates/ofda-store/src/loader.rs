//! # Dataset Loader
//!
//! Reads a resolved bulk file and extracts its `results` array.
//!
//! openFDA bulk files look like `{"meta": {..}, "results": [ {..}, .. ]}`.
//! Only `results` is kept. A document that parses but has no `results` key
//! is an empty dataset; any other shape is [`DatasetError::Corrupt`].

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use ofda_core::{DatasetKind, Record};

use crate::error::DatasetError;
use crate::resolve::DataDirs;
use crate::source::{DatasetSource, LoadedDataset};

/// Uncached loader: every call resolves, reads, and parses the file again.
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    dirs: DataDirs,
}

impl DatasetLoader {
    /// Create a loader searching the given directories.
    pub fn new(dirs: DataDirs) -> Self {
        Self { dirs }
    }

    /// Directories this loader searches.
    pub fn dirs(&self) -> &DataDirs {
        &self.dirs
    }

    /// Read and parse a specific file as a dataset.
    pub fn read(&self, kind: DatasetKind, path: &Path) -> Result<LoadedDataset, DatasetError> {
        let started = Instant::now();
        let metadata = fs::metadata(path).map_err(|e| DatasetError::io(path, e))?;
        let records = read_records(path)?;

        tracing::info!(
            dataset = %kind,
            path = %path.display(),
            records = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dataset loaded"
        );

        Ok(LoadedDataset {
            kind,
            path: path.to_path_buf(),
            modified: metadata.modified().ok(),
            size: metadata.len(),
            loaded_at: Utc::now(),
            records,
        })
    }
}

impl DatasetSource for DatasetLoader {
    fn load(&self, kind: DatasetKind) -> Result<Arc<LoadedDataset>, DatasetError> {
        let path = self.dirs.resolve(kind)?;
        self.read(kind, &path).map(Arc::new)
    }
}

/// Parse the `results` array out of a bulk file.
///
/// The document must be a JSON object; serde would otherwise accept a
/// top-level array as the sequence form of a struct.
pub fn read_records(path: &Path) -> Result<Vec<Record>, DatasetError> {
    let corrupt = |source: serde_json::Error| DatasetError::Corrupt {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| DatasetError::io(path, e))?;
    let mut document: Record =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            if source.is_io() {
                DatasetError::io(path, source.into())
            } else {
                corrupt(source)
            }
        })?;

    match document.remove("results") {
        Some(results) => serde_json::from_value(results).map_err(corrupt),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn extracts_results_in_file_order() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "device-510k-0001-of-0001.json",
            r#"{"meta": {"results": {"total": 2}}, "results": [{"k_number": "K1"}, {"k_number": "K2"}]}"#,
        );
        let loader = DatasetLoader::new(DataDirs::new(tmp.path()));
        let ds = loader.load(DatasetKind::Clearance510k).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0]["k_number"], json!("K1"));
        assert_eq!(ds.records[1]["k_number"], json!("K2"));
        assert!(ds.modified.is_some());
    }

    #[test]
    fn missing_results_key_is_empty_dataset() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "device-enforcement-0001-of-0001.json", r#"{"meta": {}}"#);
        let loader = DatasetLoader::new(DataDirs::new(tmp.path()));
        let ds = loader.load(DatasetKind::Enforcement).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn invalid_json_is_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "device-enforcement-0001-of-0001.json", "{\"results\": [");
        let loader = DatasetLoader::new(DataDirs::new(tmp.path()));
        let err = loader.load(DatasetKind::Enforcement).unwrap_err();
        assert!(matches!(err, DatasetError::Corrupt { .. }), "got: {err:?}");
        assert!(err.to_string().contains("device-enforcement-0001-of-0001.json"));
    }

    #[test]
    fn non_object_document_is_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "device-classification-0001-of-0001.json", "[1, 2, 3]");
        let loader = DatasetLoader::new(DataDirs::new(tmp.path()));
        assert!(matches!(
            loader.load(DatasetKind::Classification),
            Err(DatasetError::Corrupt { .. })
        ));
    }

    #[test]
    fn empty_top_level_array_is_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "device-classification-0001-of-0001.json", "[]");
        let loader = DatasetLoader::new(DataDirs::new(tmp.path()));
        assert!(matches!(
            loader.load(DatasetKind::Classification),
            Err(DatasetError::Corrupt { .. })
        ));
    }

    #[test]
    fn records_round_trip_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let record = r#"{"zeta":"last-first","id":123456789012345678901234,"alpha":{"y":1.50,"b":2}}"#;
        write(
            tmp.path(),
            "device-510k-0001-of-0001.json",
            &format!(r#"{{"results": [{record}]}}"#),
        );
        let loader = DatasetLoader::new(DataDirs::new(tmp.path()));
        let ds = loader.load(DatasetKind::Clearance510k).unwrap();
        assert_eq!(serde_json::to_string(&ds.records[0]).unwrap(), record);
    }

    #[test]
    fn non_object_records_are_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "device-classification-0001-of-0001.json",
            r#"{"results": ["not a record"]}"#,
        );
        let loader = DatasetLoader::new(DataDirs::new(tmp.path()));
        assert!(matches!(
            loader.load(DatasetKind::Classification),
            Err(DatasetError::Corrupt { .. })
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = DatasetLoader::new(DataDirs::new(tmp.path()));
        assert!(matches!(
            loader.load(DatasetKind::Clearance510k),
            Err(DatasetError::NotFound { .. })
        ));
    }

    #[test]
    fn every_call_rereads_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "device-510k-0001-of-0001.json",
            r#"{"results": [{"id": 1}]}"#,
        );
        let loader = DatasetLoader::new(DataDirs::new(tmp.path()));
        assert_eq!(loader.load(DatasetKind::Clearance510k).unwrap().len(), 1);
        fs::write(&path, r#"{"results": [{"id": 1}, {"id": 2}]}"#).unwrap();
        assert_eq!(loader.load(DatasetKind::Clearance510k).unwrap().len(), 2);
        assert!(loader.resident().is_empty());
    }
}
