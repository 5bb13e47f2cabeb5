//! # Field Search
//!
//! A search string has the form `field:value`. It is split on the first `:`,
//! both halves are trimmed, and a record matches when it has `field` and the
//! lowercased text of that field contains the lowercased `value`.
//!
//! A search string that is absent, empty, or has no `:` applies no filter.
//! A record that lacks the field is skipped, never an error.

use std::fmt;

use crate::record::{field_text, Record};

/// Parsed `field:value` filter criterion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchSpec {
    /// No filtering: every record passes.
    #[default]
    MatchAll,
    /// Case-insensitive substring match on a single field.
    Field {
        /// Field name, trimmed. Matched exactly (field names are case-sensitive).
        field: String,
        /// Search term, trimmed and lowercased.
        needle: String,
    },
}

impl SearchSpec {
    /// Parse a raw `search` query parameter.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::MatchAll;
        };
        match raw.split_once(':') {
            Some((field, value)) => Self::Field {
                field: field.trim().to_string(),
                needle: value.trim().to_lowercase(),
            },
            None => Self::MatchAll,
        }
    }

    /// Test a single record.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::MatchAll => true,
            Self::Field { field, needle } => record
                .get(field)
                .is_some_and(|value| field_text(value).to_lowercase().contains(needle.as_str())),
        }
    }

    /// Lazily yield the records that match, preserving input order.
    ///
    /// The input is only borrowed; nothing is cloned until a caller decides
    /// which records to keep.
    pub fn filter<'a, I>(&'a self, records: I) -> impl Iterator<Item = &'a Record> + 'a
    where
        I: IntoIterator<Item = &'a Record>,
        I::IntoIter: 'a,
    {
        records.into_iter().filter(move |record| self.matches(record))
    }
}

impl fmt::Display for SearchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatchAll => f.write_str("*"),
            Self::Field { field, needle } => write!(f, "{field}:{needle}"),
        }
    }
}
