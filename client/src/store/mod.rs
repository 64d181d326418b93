//! Local persistence for products and settings.
//!
//! Every backend implements [`LocalStore`]: a `products` collection keyed by
//! product id and a small string-to-string `settings` collection. The only
//! setting in use is [`SYNC_KEY`], the id of the remote document this device
//! syncs with.

mod file;
pub mod legacy;
mod memory;
mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::config::{Backend, Config};
use crate::error::StorageError;
use async_trait::async_trait;
use locator_engine::Product;
use std::sync::Arc;

/// Settings key holding the remote document id.
pub const SYNC_KEY: &str = "blobId";

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StorageError>;

/// A store handle shared between the repository and the sync adapter.
pub type SharedStore = Arc<dyn LocalStore>;

/// Asynchronous key-value persistence for products and settings.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Load every stored product.
    async fn load_all(&self) -> StoreResult<Vec<Product>>;

    /// Insert or replace a product by id.
    async fn put(&self, product: &Product) -> StoreResult<()>;

    /// Remove a product. Removing an unknown id succeeds.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Remove every product. Settings are kept.
    async fn clear(&self) -> StoreResult<()>;

    async fn get_setting(&self, key: &str) -> StoreResult<Option<String>>;

    async fn put_setting(&self, key: &str, value: &str) -> StoreResult<()>;

    async fn delete_setting(&self, key: &str) -> StoreResult<()>;

    /// Replace all products with `products`.
    ///
    /// Backends that can swap atomically override this; the default clears
    /// and then upserts one by one.
    async fn replace_all(&self, products: &[Product]) -> StoreResult<()> {
        self.clear().await?;
        for product in products {
            self.put(product).await?;
        }
        Ok(())
    }
}

/// Open the backend selected by `config`, creating the data directory first.
pub async fn open(config: &Config) -> StoreResult<SharedStore> {
    let store: SharedStore = match config.backend {
        Backend::Memory => Arc::new(MemoryStore::new()),
        Backend::File => {
            tokio::fs::create_dir_all(&config.data_dir).await?;
            Arc::new(FileStore::new(config.document_path()))
        }
        Backend::Sqlite => {
            tokio::fs::create_dir_all(&config.data_dir).await?;
            Arc::new(SqliteStore::open(&config.database_path()).await?)
        }
    };
    tracing::debug!(backend = %config.backend, dir = %config.data_dir.display(), "Opened local store");
    Ok(store)
}
