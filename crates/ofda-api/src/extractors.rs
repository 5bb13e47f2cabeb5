//! # Custom Extractors
//!
//! Query-string deserialization failures (e.g. `skip=abc`) are reported as
//! 422 validation errors with the same body shape as range violations,
//! instead of axum's default plain-text 400.

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;

use crate::error::AppError;

/// Extract query parameters, mapping deserialization errors to [`AppError::Validation`].
///
/// Handlers should use:
/// ```ignore
/// async fn handler(query: Result<Query<T>, QueryRejection>) -> Result<..., AppError> {
///     let params = extract_query(query)?;
///     // use params...
/// }
/// ```
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::Validation(err.body_text()))
}
