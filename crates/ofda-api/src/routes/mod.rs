//! # Route Modules
//!
//! - [`index`]: `GET /` welcome message.
//! - [`datasets`]: `GET /device/{510k,classification,enforcement}/` search.

pub mod datasets;
pub mod index;

use axum::Router;

use crate::state::AppState;

/// All public API routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(index::router())
        .merge(datasets::router())
}
