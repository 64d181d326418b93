//! Error types for the locator client.

use crate::config::ConfigError;

/// Failure reported by a local store backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Corrupt store: {0}")]
    Corrupt(String),
}

/// Failure talking to the remote document store.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Remote document not found: {0}")]
    NotFound(String),

    #[error("Remote document is not a product list: {0}")]
    InvalidPayload(String),

    #[error("Remote store did not return a document location")]
    MissingLocation,

    #[error("Invalid sync key: {0:?}")]
    InvalidKey(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Top-level client error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("Invalid product data: {0}")]
    Invalid(#[from] locator_engine::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cloud sync is not configured")]
    SyncDisabled,

    #[error("This device has no sync key yet")]
    NoSyncKey,
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::from(SyncError::NotFound("abc".into()));
        assert_eq!(err.to_string(), "Remote document not found: abc");

        let err = Error::from(locator_engine::Error::MissingField("name"));
        assert_eq!(err.to_string(), "Invalid product data: missing required field: name");

        let err = SyncError::Status {
            status: 503,
            message: "busy".into(),
        };
        assert_eq!(err.to_string(), "Remote store returned 503: busy");
    }
}
