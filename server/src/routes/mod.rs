//! HTTP route definitions.

mod documents;
mod health;

use crate::AppState;
use axum::Router;

pub use documents::DOCUMENTS_PATH;

/// Create all application routes.
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(documents::routes())
}
