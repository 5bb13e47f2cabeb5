//! # Dataset Search Endpoints
//!
//! `GET /device/{510k,classification,enforcement}/` with optional
//! `search=field:value`, `skip` (default 0) and `limit` (default 10).
//!
//! Each request validates pagination before touching disk, then loads,
//! filters, counts and slices on the blocking pool. The response envelope is
//! `{meta: {total_count, skip, limit, returned_count}, results: [...]}`.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use ofda_core::{DatasetKind, Page, PageRequest, Record, SearchSpec, DEFAULT_LIMIT, DEFAULT_SKIP};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::state::AppState;

/// Query parameters shared by the three dataset endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DatasetQuery {
    /// `field:value` filter; case-insensitive substring match on one field.
    pub search: Option<String>,
    /// Number of matching records to skip (>= 0, default 0).
    pub skip: Option<i64>,
    /// Number of records to return (>= 1, default 10).
    pub limit: Option<i64>,
}

/// Pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResponseMeta {
    /// Records matching the search, before pagination.
    pub total_count: usize,
    /// Echo of the effective `skip`.
    pub skip: usize,
    /// Echo of the effective `limit`.
    pub limit: usize,
    /// Records in `results`.
    pub returned_count: usize,
}

/// Response envelope for dataset queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DatasetResponse {
    pub meta: ResponseMeta,
    /// Matching records, in file order.
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<Record>,
}

impl DatasetResponse {
    fn new(request: PageRequest, page: Page) -> Self {
        Self {
            meta: ResponseMeta {
                total_count: page.total_count,
                skip: request.skip(),
                limit: request.limit(),
                returned_count: page.returned_count(),
            },
            results: page.records,
        }
    }
}

/// Build the dataset router. Each endpoint answers with and without the
/// trailing slash.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/device/510k/", get(search_510k))
        .route("/device/510k", get(search_510k))
        .route("/device/classification/", get(search_classification))
        .route("/device/classification", get(search_classification))
        .route("/device/enforcement/", get(search_enforcement))
        .route("/device/enforcement", get(search_enforcement))
}

/// GET /device/510k/ — Search and paginate 510(k) clearances.
#[utoipa::path(
    get,
    path = "/device/510k/",
    params(DatasetQuery),
    responses(
        (status = 200, description = "Page of 510(k) records", body = DatasetResponse),
        (status = 422, description = "Invalid skip/limit", body = crate::error::ErrorBody),
        (status = 500, description = "Dataset could not be loaded", body = crate::error::ErrorBody),
    ),
    tag = "510k"
)]
pub(crate) async fn search_510k(
    State(state): State<AppState>,
    query: Result<Query<DatasetQuery>, QueryRejection>,
) -> Result<Json<DatasetResponse>, AppError> {
    query_dataset(&state, DatasetKind::Clearance510k, extract_query(query)?)
        .await
        .map(Json)
}

/// GET /device/classification/ — Search and paginate device classifications.
#[utoipa::path(
    get,
    path = "/device/classification/",
    params(DatasetQuery),
    responses(
        (status = 200, description = "Page of classification records", body = DatasetResponse),
        (status = 422, description = "Invalid skip/limit", body = crate::error::ErrorBody),
        (status = 500, description = "Dataset could not be loaded", body = crate::error::ErrorBody),
    ),
    tag = "classification"
)]
pub(crate) async fn search_classification(
    State(state): State<AppState>,
    query: Result<Query<DatasetQuery>, QueryRejection>,
) -> Result<Json<DatasetResponse>, AppError> {
    query_dataset(&state, DatasetKind::Classification, extract_query(query)?)
        .await
        .map(Json)
}

/// GET /device/enforcement/ — Search and paginate enforcement reports.
#[utoipa::path(
    get,
    path = "/device/enforcement/",
    params(DatasetQuery),
    responses(
        (status = 200, description = "Page of enforcement records", body = DatasetResponse),
        (status = 422, description = "Invalid skip/limit", body = crate::error::ErrorBody),
        (status = 500, description = "Dataset could not be loaded", body = crate::error::ErrorBody),
    ),
    tag = "enforcement"
)]
pub(crate) async fn search_enforcement(
    State(state): State<AppState>,
    query: Result<Query<DatasetQuery>, QueryRejection>,
) -> Result<Json<DatasetResponse>, AppError> {
    query_dataset(&state, DatasetKind::Enforcement, extract_query(query)?)
        .await
        .map(Json)
}

/// Validate, load, filter and paginate one dataset.
pub async fn query_dataset(
    state: &AppState,
    kind: DatasetKind,
    query: DatasetQuery,
) -> Result<DatasetResponse, AppError> {
    let request = PageRequest::new(
        query.skip.unwrap_or(DEFAULT_SKIP as i64),
        query.limit.unwrap_or(DEFAULT_LIMIT as i64),
    )?;
    let spec = SearchSpec::parse(query.search.as_deref());
    let source = state.datasets.clone();

    let (spec, page) = tokio::task::spawn_blocking(move || {
        let dataset = source.load(kind)?;
        let page = request.window(spec.filter(&dataset.records));
        Ok::<_, AppError>((spec, page))
    })
    .await
    .map_err(|e| AppError::Internal(format!("dataset query task failed: {e}")))??;

    tracing::debug!(
        dataset = %kind,
        search = %spec,
        skip = request.skip(),
        limit = request.limit(),
        total = page.total_count,
        returned = page.returned_count(),
        "dataset query"
    );

    Ok(DatasetResponse::new(request, page))
}
