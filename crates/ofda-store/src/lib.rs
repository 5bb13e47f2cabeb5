//! # ofda-store — Dataset Storage
//!
//! Turns a [`DatasetKind`](ofda_core::DatasetKind) into the records of its
//! bulk JSON file.
//!
//! ## Components
//!
//! - [`DataDirs`] resolves a dataset to a path: exact filename in the primary
//!   directory, then a prefix match there, then a prefix match in the legacy
//!   directory. Prefix ties are broken by lexical filename order.
//! - [`DatasetLoader`] reads and parses the resolved file. It re-reads on
//!   every call.
//! - [`DatasetCache`] wraps a loader and keeps one parsed copy per dataset
//!   for the life of the process, reloading when the resolved path or its
//!   modification time changes.
//!
//! Both loader and cache implement [`DatasetSource`], the capability the API
//! layer is handed at startup.

pub mod cache;
pub mod error;
pub mod loader;
pub mod resolve;
pub mod source;

pub use cache::{CacheStats, DatasetCache};
pub use error::DatasetError;
pub use loader::DatasetLoader;
pub use resolve::{DataDirs, DEFAULT_DATA_DIR, DEFAULT_LEGACY_DIR};
pub use source::{DatasetSource, LoadedDataset};
