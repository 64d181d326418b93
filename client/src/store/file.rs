//! Single JSON document backend.
//!
//! The whole store is one file holding `{"products": [...], "settings": {...}}`.
//! Writes go to a sibling temporary file which is then renamed over the
//! original, so readers only ever see a complete document.

use super::{LocalStore, StoreResult};
use crate::error::StorageError;
use async_trait::async_trait;
use locator_engine::Product;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    settings: BTreeMap<String, String>,
}

/// A store persisted as a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serialises read-modify-write cycles.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> StoreResult<Document> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(Document::default()),
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                StorageError::Corrupt(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, document: &Document) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn modify<F>(&self, change: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Document) + Send,
    {
        let _guard = self.lock.lock().await;
        let mut document = self.read().await?;
        change(&mut document);
        self.write(&document).await
    }
}

#[async_trait]
impl LocalStore for FileStore {
    async fn load_all(&self) -> StoreResult<Vec<Product>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.products)
    }

    async fn put(&self, product: &Product) -> StoreResult<()> {
        let product = product.clone();
        self.modify(move |doc| {
            match doc.products.iter_mut().find(|p| p.id == product.id) {
                Some(existing) => *existing = product,
                None => doc.products.push(product),
            }
        })
        .await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.modify(|doc| doc.products.retain(|p| p.id != id)).await
    }

    async fn clear(&self) -> StoreResult<()> {
        self.modify(|doc| doc.products.clear()).await
    }

    async fn get_setting(&self, key: &str) -> StoreResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.settings.remove(key))
    }

    async fn put_setting(&self, key: &str, value: &str) -> StoreResult<()> {
        self.modify(|doc| {
            doc.settings.insert(key.to_string(), value.to_string());
        })
        .await
    }

    async fn delete_setting(&self, key: &str) -> StoreResult<()> {
        self.modify(|doc| {
            doc.settings.remove(key);
        })
        .await
    }

    async fn replace_all(&self, products: &[Product]) -> StoreResult<()> {
        let products = products.to_vec();
        self.modify(move |doc| doc.products = products).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    fn store_in(dir: &tempfile::TempDir) -> FileStore {
        FileStore::new(dir.path().join("products.json"))
    }

    #[tokio::test]
    async fn products_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        contract::products_roundtrip(&store_in(&dir)).await;
    }

    #[tokio::test]
    async fn settings_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        contract::settings_roundtrip(&store_in(&dir)).await;
    }

    #[tokio::test]
    async fn replace_all_swaps_contents() {
        let dir = tempfile::tempdir().unwrap();
        contract::replace_all_swaps_contents(&store_in(&dir)).await;
    }

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        store_in(&dir)
            .put(&contract::product("a", "Anchors", "1"))
            .await
            .unwrap();

        let reopened = store_in(&dir);
        assert_eq!(reopened.load_all().await.unwrap().len(), 1);
        assert!(!dir.path().join("products.json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(
            store.load_all().await,
            Err(StorageError::Corrupt(_))
        ));
        assert!(matches!(
            store.put(&contract::product("a", "A", "1")).await,
            Err(StorageError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("missing").join("products.json"));

        assert!(store.load_all().await.unwrap().is_empty());
        assert!(matches!(
            store.put(&contract::product("a", "A", "1")).await,
            Err(StorageError::Io(_))
        ));
    }
}
