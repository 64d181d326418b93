//! HD Locator Document Store - a minimal JSON document service.
//!
//! Devices running HD Locator push their whole product list here and link to
//! each other's documents by id. `POST /api/jsonBlob` creates a document and
//! returns its URL in `Location`; `GET` and `PUT` on that URL read and
//! overwrite it.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod routes;

use crate::config::Config;
use crate::db::DocumentStore;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    pub config: Arc<Config>,
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_document_bytes;
    Router::new()
        .merge(routes::create_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
        .with_state(state)
}
