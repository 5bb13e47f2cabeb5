//! # Service Index
//!
//! `GET /` returns a welcome message and the route of each dataset endpoint.

use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Welcome text returned by `GET /`.
pub const WELCOME_MESSAGE: &str = "Welcome to the Local openFDA API";

/// Dataset name to endpoint path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EndpointIndex {
    #[serde(rename = "510k")]
    pub clearance_510k: String,
    pub classification: String,
    pub enforcement: String,
}

/// Response body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IndexResponse {
    pub message: String,
    pub endpoints: EndpointIndex,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// GET / — Welcome message and dataset endpoint index.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service index", body = IndexResponse),
    ),
    tag = "index"
)]
pub(crate) async fn index() -> Json<IndexResponse> {
    use ofda_core::DatasetKind::{Classification, Clearance510k, Enforcement};
    Json(IndexResponse {
        message: WELCOME_MESSAGE.to_string(),
        endpoints: EndpointIndex {
            clearance_510k: Clearance510k.route().to_string(),
            classification: Classification.route().to_string(),
            enforcement: Enforcement.route().to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_every_dataset_route() {
        let Json(body) = index().await;
        assert_eq!(body.message, WELCOME_MESSAGE);
        let json = serde_json::to_value(&body.endpoints).unwrap();
        assert_eq!(json["510k"], "/device/510k");
        assert_eq!(json["classification"], "/device/classification");
        assert_eq!(json["enforcement"], "/device/enforcement");
    }
}
