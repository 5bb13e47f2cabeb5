//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI 3.1 document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local openFDA API",
        version = "0.1.0",
        description = "Search and paginate locally stored openFDA device datasets: 510(k) clearances, device classifications and enforcement reports.",
        license(name = "MIT")
    ),
    paths(
        crate::routes::index::index,
        crate::routes::datasets::search_510k,
        crate::routes::datasets::search_classification,
        crate::routes::datasets::search_enforcement,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::routes::index::IndexResponse,
        crate::routes::index::EndpointIndex,
        crate::routes::datasets::DatasetResponse,
        crate::routes::datasets::ResponseMeta,
    )),
    tags(
        (name = "index", description = "Service index"),
        (name = "510k", description = "Premarket notification (510(k)) clearances"),
        (name = "classification", description = "Device classification"),
        (name = "enforcement", description = "Device recall enforcement reports"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI JSON document at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_dataset_path() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/device/510k/", "/device/classification/", "/device/enforcement/"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
