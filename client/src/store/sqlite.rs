//! Embedded SQLite backend.

use super::{LocalStore, StoreResult};
use crate::error::StorageError;
use async_trait::async_trait;
use locator_engine::Product;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;

/// A store backed by an SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and run migrations.
    pub async fn open(path: &Path) -> StoreResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// Open a private in-memory database.
    pub async fn in_memory() -> StoreResult<Self> {
        // Every connection to `:memory:` is a separate database, so keep exactly one alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

fn encode(product: &Product) -> StoreResult<String> {
    serde_json::to_string(product).map_err(|e| StorageError::Corrupt(e.to_string()))
}

fn decode(body: &str) -> StoreResult<Product> {
    serde_json::from_str(body).map_err(|e| StorageError::Corrupt(e.to_string()))
}

const UPSERT_PRODUCT: &str = r#"
    INSERT INTO products (id, body) VALUES (?1, ?2)
    ON CONFLICT (id) DO UPDATE SET body = excluded.body
"#;

#[async_trait]
impl LocalStore for SqliteStore {
    async fn load_all(&self) -> StoreResult<Vec<Product>> {
        let bodies: Vec<String> = sqlx::query_scalar("SELECT body FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        bodies.iter().map(|body| decode(body)).collect()
    }

    async fn put(&self, product: &Product) -> StoreResult<()> {
        sqlx::query(UPSERT_PRODUCT)
            .bind(&product.id)
            .bind(encode(product)?)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM products")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_setting(&self, key: &str) -> StoreResult<Option<String>> {
        let value = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn put_setting(&self, key: &str, value: &str) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES (?1, ?2)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_setting(&self, key: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM settings WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn replace_all(&self, products: &[Product]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM products").execute(&mut *tx).await?;
        for product in products {
            sqlx::query(UPSERT_PRODUCT)
                .bind(&product.id)
                .bind(encode(product)?)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
