//! Document handlers - create, read and overwrite JSON documents.

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use serde_json::Value;

/// Parse a request body as a JSON document.
pub fn parse_body(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::EmptyBody);
    }
    Ok(serde_json::from_slice(body)?)
}

/// Store a new document and return its id.
pub async fn handle_create(store: &DocumentStore, body: &[u8]) -> Result<String> {
    let document = parse_body(body)?;
    let id = store.create(document).await?;
    tracing::debug!(document = %id, bytes = body.len(), "Created document");
    Ok(id)
}

/// Fetch a document by id.
pub async fn handle_get(store: &DocumentStore, id: &str) -> Result<Value> {
    store
        .get(id)
        .await?
        .ok_or_else(|| AppError::DocumentNotFound(id.to_string()))
}

/// Overwrite an existing document and return what was stored.
pub async fn handle_replace(store: &DocumentStore, id: &str, body: &[u8]) -> Result<Value> {
    let document = parse_body(body)?;
    if !store.replace(id, document.clone()).await? {
        return Err(AppError::DocumentNotFound(id.to_string()));
    }
    tracing::debug!(document = %id, bytes = body.len(), "Replaced document");
    Ok(document)
}
