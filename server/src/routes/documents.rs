//! Document endpoint routes.
//!
//! The layout mirrors the public jsonBlob API so the client works against
//! either service unchanged.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::LOCATION, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::handlers::{handle_create, handle_get, handle_replace};
use crate::AppState;

/// Collection path; documents live at `{DOCUMENTS_PATH}/{id}`.
pub const DOCUMENTS_PATH: &str = "/api/jsonBlob";

const DOCUMENT_ID_HEADER: HeaderName = HeaderName::from_static("x-jsonblob-id");

/// Create document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(DOCUMENTS_PATH, post(create_handler))
        .route(
            &format!("{}/{{id}}", DOCUMENTS_PATH),
            get(get_handler).put(replace_handler),
        )
}

/// POST /api/jsonBlob - Create a document.
async fn create_handler(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let id = handle_create(&state.store, &body).await?;

    let location = HeaderValue::from_str(&format!("{}/{}", DOCUMENTS_PATH, id))?;
    let id_header = HeaderValue::from_str(&id)?;

    Ok((
        StatusCode::CREATED,
        [(LOCATION, location), (DOCUMENT_ID_HEADER, id_header)],
    )
        .into_response())
}

/// GET /api/jsonBlob/{id} - Read a document.
async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    Ok(Json(handle_get(&state.store, &id).await?))
}

/// PUT /api/jsonBlob/{id} - Overwrite a document.
async fn replace_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<serde_json::Value>> {
    Ok(Json(handle_replace(&state.store, &id, &body).await?))
}
