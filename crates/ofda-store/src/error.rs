//! # Dataset Errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors while locating or reading a dataset file.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// No file matched the exact name or any prefix rule, in any directory.
    #[error("data file not found: {filename}")]
    NotFound {
        /// The canonical filename that was requested.
        filename: String,
    },

    /// The file exists but is not valid JSON, or its shape is not
    /// `{"results": [ {..}, .. ]}`.
    #[error("error parsing JSON file {}: {source}", path.display())]
    Corrupt {
        /// Resolved path of the offending file.
        path: PathBuf,
        /// Parser diagnostic (line/column included).
        #[source]
        source: serde_json::Error,
    },

    /// The file or its directory could not be read.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// Path being read when the error occurred.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_requested_file() {
        let err = DatasetError::NotFound {
            filename: "device-510k-0001-of-0001.json".into(),
        };
        assert_eq!(
            err.to_string(),
            "data file not found: device-510k-0001-of-0001.json"
        );
    }

    #[test]
    fn corrupt_carries_path_and_parse_position() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = DatasetError::Corrupt {
            path: PathBuf::from("data/x.json"),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("data/x.json"), "got: {msg}");
        assert!(msg.contains("line 1"), "got: {msg}");
    }
}
