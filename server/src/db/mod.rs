//! Document persistence: PostgreSQL when configured, process memory otherwise.

mod postgres;

use dashmap::DashMap;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Where documents are kept.
#[derive(Debug, Clone)]
pub enum DocumentStore {
    Memory(Arc<DashMap<String, Value>>),
    Postgres(PgPool),
}

impl DocumentStore {
    /// An empty store that lives as long as the process.
    pub fn memory() -> Self {
        DocumentStore::Memory(Arc::new(DashMap::new()))
    }

    /// Connect to PostgreSQL when a URL is given, otherwise use memory.
    pub async fn connect(database_url: Option<&str>) -> Result<Self, sqlx::Error> {
        match database_url {
            Some(url) => Ok(DocumentStore::Postgres(postgres::connect(url).await?)),
            None => {
                tracing::warn!("DATABASE_URL not set, documents will not survive a restart");
                Ok(Self::memory())
            }
        }
    }

    /// Store a new document and return its generated id.
    pub async fn create(&self, body: Value) -> Result<String, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        match self {
            DocumentStore::Memory(docs) => {
                docs.insert(id.clone(), body);
            }
            DocumentStore::Postgres(pool) => postgres::insert_document(pool, &id, &body).await?,
        }
        Ok(id)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Value>, sqlx::Error> {
        match self {
            DocumentStore::Memory(docs) => Ok(docs.get(id).map(|doc| doc.value().clone())),
            DocumentStore::Postgres(pool) => postgres::get_document(pool, id).await,
        }
    }

    /// Overwrite an existing document. Returns false when the id is unknown.
    pub async fn replace(&self, id: &str, body: Value) -> Result<bool, sqlx::Error> {
        match self {
            DocumentStore::Memory(docs) => match docs.get_mut(id) {
                Some(mut doc) => {
                    *doc = body;
                    Ok(true)
                }
                None => Ok(false),
            },
            DocumentStore::Postgres(pool) => postgres::update_document(pool, id, &body).await,
        }
    }
}
