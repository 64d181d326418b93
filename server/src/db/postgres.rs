//! PostgreSQL document table.

use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Connect to `database_url` and bring the schema up to date.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

pub async fn insert_document(pool: &PgPool, id: &str, body: &Value) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO documents (id, body) VALUES ($1, $2)")
        .bind(id)
        .bind(body)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_document(pool: &PgPool, id: &str) -> Result<Option<Value>, sqlx::Error> {
    sqlx::query_scalar("SELECT body FROM documents WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Overwrite a document. Returns false when no document has the id.
pub async fn update_document(pool: &PgPool, id: &str, body: &Value) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE documents SET body = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(body)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
