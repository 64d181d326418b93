//! In-memory backend.

use super::{LocalStore, StoreResult};
use async_trait::async_trait;
use locator_engine::Product;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct State {
    products: BTreeMap<String, Product>,
    settings: HashMap<String, String>,
}

/// A store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn load_all(&self) -> StoreResult<Vec<Product>> {
        Ok(self.state.read().await.products.values().cloned().collect())
    }

    async fn put(&self, product: &Product) -> StoreResult<()> {
        self.state
            .write()
            .await
            .products
            .insert(product.id.clone(), product.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.state.write().await.products.remove(id);
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        self.state.write().await.products.clear();
        Ok(())
    }

    async fn get_setting(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.state.read().await.settings.get(key).cloned())
    }

    async fn put_setting(&self, key: &str, value: &str) -> StoreResult<()> {
        self.state
            .write()
            .await
            .settings
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_setting(&self, key: &str) -> StoreResult<()> {
        self.state.write().await.settings.remove(key);
        Ok(())
    }

    async fn replace_all(&self, products: &[Product]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.products = products
            .iter()
            .map(|p| (p.id.clone(), p.clone()))
            .collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    #[tokio::test]
    async fn products_roundtrip() {
        contract::products_roundtrip(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn settings_roundtrip() {
        contract::settings_roundtrip(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn replace_all_swaps_contents() {
        contract::replace_all_swaps_contents(&MemoryStore::new()).await;
    }
}
