//! # Validation Errors
//!
//! Structured errors for caller-supplied query input, built with `thiserror`.
//! Search strings never fail to parse (a malformed one is match-all), so the
//! only rejections are pagination bounds.

use thiserror::Error;

/// Validation errors for query parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `skip` was negative.
    #[error("skip must be greater than or equal to 0, got {0}")]
    NegativeSkip(i64),

    /// `limit` was zero or negative.
    #[error("limit must be greater than or equal to 1, got {0}")]
    LimitTooSmall(i64),
}
