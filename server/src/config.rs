//! Configuration management for the server.

use std::env;

/// Default request body limit: 1 MiB.
const DEFAULT_MAX_DOCUMENT_BYTES: usize = 1024 * 1024;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// PostgreSQL connection URL; documents are kept in memory when unset
    pub database_url: Option<String>,
    /// Largest accepted document body in bytes
    pub max_document_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let max_document_bytes = match env::var("MAX_DOCUMENT_BYTES") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidMaxDocumentBytes)?,
            Err(_) => DEFAULT_MAX_DOCUMENT_BYTES,
        };

        Ok(Self {
            host,
            port,
            database_url,
            max_document_bytes,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_url: None,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("Invalid MAX_DOCUMENT_BYTES value")]
    InvalidMaxDocumentBytes,
}
