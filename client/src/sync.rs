//! Remote sync adapter.
//!
//! The remote side is a plain JSON document store: `POST {base}` creates a
//! document and answers with its URL in the `Location` header, `PUT
//! {base}/{id}` overwrites it and `GET {base}/{id}` reads it back. The whole
//! product list is sent on every push, so the last writer wins.

use crate::error::SyncError;
use crate::store::{SharedStore, SYNC_KEY};
use chrono::Utc;
use locator_engine::{document, validate_records, Product};
use reqwest::header::LOCATION;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Result type for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;

const MAX_LOG_BODY_CHARS: usize = 256;

/// Client for the remote document store.
#[derive(Clone)]
pub struct RemoteSync {
    client: reqwest::Client,
    base_url: String,
    store: SharedStore,
    // Held for the whole create-or-update cycle so a fresh device never creates
    // two documents, and for the whole of a link.
    push_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for RemoteSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSync")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RemoteSync {
    /// Create an adapter for the document store at `base_url`.
    pub fn new(base_url: &str, store: SharedStore, timeout: Duration) -> SyncResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            push_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The id of the remote document this device syncs with, if any.
    pub async fn sync_key(&self) -> SyncResult<Option<String>> {
        Ok(self.store.get_setting(SYNC_KEY).await?)
    }

    /// Upload `products` as the full remote document.
    ///
    /// Creates the document on first use and remembers its id.
    pub async fn push(&self, products: &[Product]) -> SyncResult<()> {
        let _guard = self.push_lock.lock().await;
        self.push_locked(products).await
    }

    /// Upload whatever the local store currently holds.
    ///
    /// The list is read after taking the push lock, so when several pushes
    /// queue up the last one to run always sends the newest state.
    pub async fn push_current(&self) -> SyncResult<()> {
        let _guard = self.push_lock.lock().await;
        let products = self.store.load_all().await?;
        self.push_locked(&products).await
    }

    async fn push_locked(&self, products: &[Product]) -> SyncResult<()> {
        match self.sync_key().await? {
            Some(id) => self.update_document(&id, products).await,
            None => {
                let id = self.create_document(products).await?;
                self.store.put_setting(SYNC_KEY, &id).await?;
                tracing::info!(document = %id, "Created remote document");
                Ok(())
            }
        }
    }

    /// Fetch the document `document_id` and return its valid products.
    ///
    /// Nothing local is touched; the caller decides what to do with the list.
    pub async fn pull(&self, document_id: &str) -> SyncResult<Vec<Product>> {
        let id = validate_key(document_id)?;
        let response = self.client.get(self.document_url(id)).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| SyncError::InvalidPayload(e.to_string()))?;
        let records =
            document::records_of(value).map_err(|e| SyncError::InvalidPayload(e.to_string()))?;
        let products = validate_records(&records, Utc::now());

        tracing::debug!(
            document = %id,
            received = records.len(),
            kept = products.len(),
            "Pulled remote document"
        );
        Ok(products)
    }

    /// Adopt `document_id` as this device's sync key and pull it.
    ///
    /// When the pull fails the previous key (or its absence) is restored.
    /// Pushes wait until the link is finished, so a push that was already
    /// running cannot replace the new key with a document of its own.
    pub async fn link_and_pull(&self, document_id: &str) -> SyncResult<Vec<Product>> {
        let _guard = self.lock_pushes().await;
        let (products, _previous) = self.link_locked(document_id).await?;
        Ok(products)
    }

    /// Block pushes until the returned guard is dropped.
    pub(crate) async fn lock_pushes(&self) -> OwnedMutexGuard<()> {
        self.push_lock.clone().lock_owned().await
    }

    /// Save `document_id` as the sync key and pull it; the caller holds the
    /// push lock. Returns the products and the key that was replaced.
    pub(crate) async fn link_locked(
        &self,
        document_id: &str,
    ) -> SyncResult<(Vec<Product>, Option<String>)> {
        let id = validate_key(document_id)?;
        let previous = self.sync_key().await?;
        self.store.put_setting(SYNC_KEY, id).await?;

        match self.pull(id).await {
            Ok(products) => Ok((products, previous)),
            Err(e) => {
                self.restore_key(previous.as_deref()).await;
                Err(e)
            }
        }
    }

    /// Put back the sync key saved before a link, or remove it if there was none.
    pub(crate) async fn restore_key(&self, previous: Option<&str>) {
        let restored = match previous {
            Some(old) => self.store.put_setting(SYNC_KEY, old).await,
            None => self.store.delete_setting(SYNC_KEY).await,
        };
        if let Err(e) = restored {
            tracing::warn!("Failed to restore previous sync key: {}", e);
        }
    }

    async fn create_document(&self, products: &[Product]) -> SyncResult<String> {
        let response = self
            .client
            .post(&self.base_url)
            .json(products)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(document_id_from_location)
            .ok_or(SyncError::MissingLocation)
    }

    async fn update_document(&self, id: &str, products: &[Product]) -> SyncResult<()> {
        let response = self
            .client
            .put(self.document_url(id))
            .json(products)
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        tracing::debug!(document = %id, count = products.len(), "Updated remote document");
        Ok(())
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

/// Extract the document id (last path segment) from a `Location` header.
pub fn document_id_from_location(location: &str) -> Option<String> {
    let path = location.split(['?', '#']).next()?;
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn validate_key(key: &str) -> SyncResult<&str> {
    let key = key.trim();
    if key.is_empty() || key.contains(['/', '?', '#']) || key.contains(char::is_whitespace) {
        return Err(SyncError::InvalidKey(key.to_string()));
    }
    Ok(key)
}

fn status_error(status: StatusCode, body: &str) -> SyncError {
    let mut message = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
    if body.chars().count() > MAX_LOG_BODY_CHARS {
        message.push_str("...");
    }
    SyncError::Status {
        status: status.as_u16(),
        message,
    }
}
