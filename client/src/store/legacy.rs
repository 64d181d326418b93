//! One-time migration of the flat product list written by the first release.
//!
//! The first release kept the whole list as a single JSON array in
//! `hd_products.json`. On startup the array is copied into the current store
//! and the file is removed. Any failure leaves the file in place so the data
//! is never lost; the next start simply tries again.

use super::LocalStore;
use crate::error::Result;
use chrono::Utc;
use locator_engine::document;
use std::io::ErrorKind;
use std::path::Path;

/// File name of the legacy flat list inside the data directory.
pub const LEGACY_FILE_NAME: &str = "hd_products.json";

/// Copy the legacy list at `path` into `store`, then delete it.
///
/// Returns how many products were migrated. Errors are logged and swallowed.
pub async fn migrate_legacy(store: &dyn LocalStore, path: &Path) -> usize {
    match try_migrate(store, path).await {
        Ok(0) => 0,
        Ok(count) => {
            tracing::info!(count, path = %path.display(), "Migrated legacy product list");
            count
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "Legacy migration failed, keeping file: {}", e);
            0
        }
    }
}

async fn try_migrate(store: &dyn LocalStore, path: &Path) -> Result<usize> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };
    if text.trim().is_empty() {
        return Ok(0);
    }

    let products = document::decode_legacy(&text, Utc::now())?;
    if products.is_empty() {
        return Ok(0);
    }

    for product in &products {
        store.put(product).await?;
    }
    tokio::fs::remove_file(path).await?;

    Ok(products.len())
}
