//! Product repository - the authoritative in-memory list and its persistence.
//!
//! Every mutation is written to the local store before the in-memory catalog
//! changes, so a storage failure leaves both untouched. When cloud sync is
//! configured each successful mutation also schedules a background push of
//! the full list; push failures are logged and never undo local changes.

use crate::error::{Error, Result};
use crate::store::SharedStore;
use crate::sync::RemoteSync;
use chrono::Utc;
use locator_engine::{document, validate_records, Catalog, Product, ProductFields, ProductPatch};
use serde_json::Value;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// The product list shared by every front-end.
pub struct Repository {
    store: SharedStore,
    catalog: Catalog,
    sync: Option<RemoteSync>,
    pending_pushes: Vec<JoinHandle<()>>,
}

impl Repository {
    /// Load every product from `store`.
    pub async fn load(store: SharedStore, sync: Option<RemoteSync>) -> Result<Self> {
        let products = store.load_all().await?;
        tracing::debug!(count = products.len(), "Loaded products");
        Ok(Self {
            store,
            catalog: Catalog::from_products(products),
            sync,
            pending_pushes: Vec::new(),
        })
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn sync(&self) -> Option<&RemoteSync> {
        self.sync.as_ref()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.catalog.get(id)
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Products in display order, filtered by `query` when it is not blank.
    pub fn list(&self, query: &str) -> Vec<&Product> {
        self.catalog.list(query)
    }

    /// Create a product with a fresh id and the current time.
    pub async fn add(&mut self, fields: ProductFields) -> Result<Product> {
        let product = Product::new(Uuid::new_v4().to_string(), fields, Utc::now())?;
        self.store.put(&product).await?;
        self.catalog.upsert(product.clone());

        tracing::debug!(id = %product.id, "Added product");
        self.schedule_push();
        Ok(product)
    }

    /// Merge `patch` into the product `id`.
    ///
    /// Returns `Ok(None)` without touching anything when the id is unknown.
    pub async fn update(&mut self, id: &str, patch: &ProductPatch) -> Result<Option<Product>> {
        let Some(existing) = self.catalog.get(id) else {
            return Ok(None);
        };
        let mut updated = existing.clone();
        updated.apply(patch)?;

        self.store.put(&updated).await?;
        self.catalog.upsert(updated.clone());

        tracing::debug!(id = %id, "Updated product");
        self.schedule_push();
        Ok(Some(updated))
    }

    /// Remove the product `id`. Returns whether it existed.
    pub async fn delete(&mut self, id: &str) -> Result<bool> {
        if self.catalog.get(id).is_none() {
            return Ok(false);
        }
        self.store.delete(id).await?;
        self.catalog.remove(id);

        tracing::debug!(id = %id, "Deleted product");
        self.schedule_push();
        Ok(true)
    }

    /// Replace the whole list with the valid subset of `records`.
    ///
    /// Records without an `id` or `name` are skipped. Returns the final count.
    pub async fn replace_all(&mut self, records: &[Value]) -> Result<usize> {
        let count = self
            .apply_replacement(validate_records(records, Utc::now()))
            .await?;
        self.schedule_push();
        Ok(count)
    }

    /// The list as a pretty-printed JSON array.
    pub fn export_json(&self) -> Result<String> {
        Ok(document::to_json_pretty(self.catalog.products())?)
    }

    /// Replace the list with an exported document.
    ///
    /// The document is fully parsed before anything is written; a malformed
    /// document or one whose top level is not an array changes nothing.
    pub async fn import_json(&mut self, json: &str) -> Result<usize> {
        let records = document::parse_records(json)?;
        let count = self.replace_all(&records).await?;
        tracing::info!(count, "Imported products");
        Ok(count)
    }

    /// The current sync key, if sync is configured and this device has one.
    pub async fn sync_key(&self) -> Result<Option<String>> {
        let sync = self.sync.as_ref().ok_or(Error::SyncDisabled)?;
        Ok(sync.sync_key().await?)
    }

    /// Replace the local list with the remote document this device is linked to.
    pub async fn pull(&mut self) -> Result<usize> {
        let sync = self.sync.as_ref().ok_or(Error::SyncDisabled)?;
        let key = sync.sync_key().await?.ok_or(Error::NoSyncKey)?;
        let products = sync.pull(&key).await?;
        self.apply_replacement(products).await
    }

    /// Link this device to another device's document and adopt its list.
    ///
    /// If the pulled list cannot be stored the previous key is restored, so
    /// the old local list is never pushed over the linked document.
    pub async fn link(&mut self, document_id: &str) -> Result<usize> {
        let sync = self.sync.clone().ok_or(Error::SyncDisabled)?;
        let _pushes = sync.lock_pushes().await;
        let (products, previous) = sync.link_locked(document_id).await?;

        match self.apply_replacement(products).await {
            Ok(count) => {
                tracing::info!(count, "Linked sync key");
                Ok(count)
            }
            Err(e) => {
                sync.restore_key(previous.as_deref()).await;
                Err(e)
            }
        }
    }

    /// Push the current list now and report the outcome.
    pub async fn push_now(&mut self) -> Result<()> {
        self.flush_sync().await;
        let sync = self.sync.as_ref().ok_or(Error::SyncDisabled)?;
        sync.push(self.catalog.products()).await?;
        Ok(())
    }

    /// Wait for every background push scheduled so far.
    pub async fn flush_sync(&mut self) {
        for handle in self.pending_pushes.drain(..) {
            if let Err(e) = handle.await {
                tracing::warn!("Background push task failed: {}", e);
            }
        }
    }

    async fn apply_replacement(&mut self, products: Vec<Product>) -> Result<usize> {
        let catalog = Catalog::from_products(products);
        self.store.replace_all(catalog.products()).await?;
        self.catalog = catalog;
        Ok(self.catalog.len())
    }

    fn schedule_push(&mut self) {
        let Some(sync) = self.sync.clone() else {
            return;
        };
        self.pending_pushes.retain(|handle| !handle.is_finished());
        self.pending_pushes.push(tokio::spawn(async move {
            if let Err(e) = sync.push_current().await {
                tracing::warn!("Background push failed: {}", e);
            }
        }));
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("products", &self.catalog.len())
            .field("sync", &self.sync)
            .field("pending_pushes", &self.pending_pushes.len())
            .finish()
    }
}
