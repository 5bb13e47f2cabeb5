//! # Pagination
//!
//! `skip`/`limit` windowing over a filtered record sequence.
//!
//! The filtered sequence is consumed exactly once: every match is counted
//! toward `total_count`, and only those inside `[skip, skip + limit)` are
//! cloned into the page. The filtered set is never materialised.

use serde::Serialize;

use crate::error::ValidationError;
use crate::record::Record;

/// Default number of records to skip.
pub const DEFAULT_SKIP: usize = 0;

/// Default page size.
pub const DEFAULT_LIMIT: usize = 10;

/// Validated pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    skip: usize,
    limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Validate raw query values. `skip` must be `>= 0` and `limit` `>= 1`.
    pub fn new(skip: i64, limit: i64) -> Result<Self, ValidationError> {
        if skip < 0 {
            return Err(ValidationError::NegativeSkip(skip));
        }
        if limit < 1 {
            return Err(ValidationError::LimitTooSmall(limit));
        }
        Ok(Self {
            skip: usize::try_from(skip).unwrap_or(usize::MAX),
            limit: usize::try_from(limit).unwrap_or(usize::MAX),
        })
    }

    /// Number of matches skipped before the page starts.
    pub fn skip(&self) -> usize {
        self.skip
    }

    /// Maximum number of records in the page.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Exclusive end index of the window. Saturates instead of overflowing.
    fn end(&self) -> usize {
        self.skip.saturating_add(self.limit)
    }

    /// Consume a (filtered) record sequence and cut this window out of it.
    pub fn window<'a, I>(&self, matches: I) -> Page
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let end = self.end();
        let mut total_count = 0usize;
        let mut records = Vec::with_capacity(self.limit.min(64));
        for (index, record) in matches.into_iter().enumerate() {
            if index >= self.skip && index < end {
                records.push(record.clone());
            }
            total_count += 1;
        }
        Page {
            total_count,
            records,
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Number of records that matched the search, before pagination.
    pub total_count: usize,
    /// The records inside the requested window.
    pub records: Vec<Record>,
}

impl Page {
    /// Number of records in this page (never more than the request's limit).
    pub fn returned_count(&self) -> usize {
        self.records.len()
    }
}
