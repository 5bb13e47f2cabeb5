#![deny(missing_docs)]

//! # ofda-core — Foundational Types for the Local openFDA Device API
//!
//! Everything in this crate is pure: no I/O, no clocks, no globals. The
//! store crate produces [`Record`]s from disk and the API crate turns a
//! [`Page`] into an HTTP response; the query semantics in between live here.
//!
//! ## Query Pipeline
//!
//! ```text
//! records ──► SearchSpec::filter ──► PageRequest::window ──► Page
//! ```
//!
//! 1. **[`DatasetKind`]** names one of the three fixed device datasets and
//!    knows its canonical on-disk filename.
//! 2. **[`SearchSpec`]** parses a raw `field:value` string. Anything without a
//!    `:` is match-all.
//! 3. **[`PageRequest`]** validates `skip`/`limit` and slices the lazily
//!    filtered sequence in a single pass, counting every match.

pub mod dataset;
pub mod error;
pub mod page;
pub mod record;
pub mod search;

pub use dataset::DatasetKind;
pub use error::ValidationError;
pub use page::{Page, PageRequest, DEFAULT_LIMIT, DEFAULT_SKIP};
pub use record::{field_text, Record};
pub use search::SearchSpec;
