//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps query validation failures to 422 and dataset load failures to 500.
//! Both carry a human-readable `detail`; for 500s that is the underlying
//! loader message (missing filename, JSON parse position) so that operators
//! can see which file is misconfigured without digging through logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ofda_store::DatasetError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable description of what went wrong.
    pub detail: String,
    /// Machine-readable error code (e.g., "VALIDATION_ERROR").
    pub code: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Query parameters failed validation (422).
    #[error("{0}")]
    Validation(String),

    /// Dataset could not be loaded, or the request could not be served (500).
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            detail: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Convert ofda-core validation errors to API errors.
impl From<ofda_core::ValidationError> for AppError {
    fn from(err: ofda_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Every loader failure is a server-side problem: the files are operator-managed.
impl From<DatasetError> for AppError {
    fn from(err: DatasetError) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[test]
    fn validation_status_code() {
        let err = AppError::Validation("bad skip".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn internal_status_code() {
        let err = AppError::Internal("disk on fire".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[test]
    fn core_validation_error_maps_to_validation() {
        let app_err = AppError::from(ofda_core::ValidationError::NegativeSkip(-1));
        match &app_err {
            AppError::Validation(msg) => assert!(msg.contains("-1"), "got: {msg}"),
            other => panic!("expected Validation, got: {other:?}"),
        }
    }

    #[test]
    fn dataset_error_maps_to_internal_with_message() {
        let app_err = AppError::from(DatasetError::NotFound {
            filename: "device-510k-0001-of-0001.json".into(),
        });
        match &app_err {
            AppError::Internal(msg) => {
                assert_eq!(msg, "data file not found: device-510k-0001-of-0001.json");
            }
            other => panic!("expected Internal, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn into_response_validation() {
        let (status, body) =
            response_parts(AppError::Validation("limit must be >= 1".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(body.detail, "limit must be >= 1");
    }

    #[tokio::test]
    async fn into_response_internal_carries_detail() {
        let (status, body) = response_parts(AppError::Internal(
            "data file not found: device-enforcement-0001-of-0001.json".into(),
        ))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "INTERNAL_ERROR");
        assert!(body.detail.contains("device-enforcement-0001-of-0001.json"));
    }
}
