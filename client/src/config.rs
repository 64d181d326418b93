//! Configuration management for the client.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default timeout for sync requests.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Which local store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Nothing is written to disk.
    Memory,
    /// A single JSON document.
    File,
    /// Embedded SQLite database.
    #[default]
    Sqlite,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "file" | "json" => Ok(Backend::File),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(ConfigError::InvalidBackend(other.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Memory => "memory",
            Backend::File => "file",
            Backend::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the local store and the legacy list
    pub data_dir: PathBuf,
    /// Local store backend
    pub backend: Backend,
    /// Remote document store endpoint; sync is off when unset
    pub sync_url: Option<String>,
    /// Timeout applied to each sync request
    pub http_timeout: Duration,
    /// Pull the linked remote document while opening the repository
    pub pull_on_start: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = match env::var("LOCATOR_DATA_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_data_dir(),
        };

        let backend = match env::var("LOCATOR_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => Backend::default(),
        };

        let sync_url = env::var("LOCATOR_SYNC_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let http_timeout = env::var("LOCATOR_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_HTTP_TIMEOUT_SECS.to_string())
            .parse()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidTimeout)?;

        Ok(Self {
            data_dir,
            backend,
            sync_url,
            http_timeout,
            pull_on_start: true,
        })
    }

    /// Configuration for a given directory with every other setting defaulted.
    pub fn for_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            backend: Backend::default(),
            sync_url: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            pull_on_start: true,
        }
    }

    /// SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("hd_locator.db")
    }

    /// JSON document used by the file backend.
    pub fn document_path(&self) -> PathBuf {
        self.data_dir.join("products.json")
    }

    /// Flat product list written by the first release.
    pub fn legacy_path(&self) -> PathBuf {
        self.data_dir.join(crate::store::legacy::LEGACY_FILE_NAME)
    }
}

fn default_data_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".hd-locator")
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown storage backend {0:?} (expected memory, file or sqlite)")]
    InvalidBackend(String),

    #[error("Invalid LOCATOR_HTTP_TIMEOUT_SECS value")]
    InvalidTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_backend() {
        assert_eq!("sqlite".parse::<Backend>().unwrap(), Backend::Sqlite);
        assert_eq!(" FILE ".parse::<Backend>().unwrap(), Backend::File);
        assert_eq!("json".parse::<Backend>().unwrap(), Backend::File);
        assert_eq!("memory".parse::<Backend>().unwrap(), Backend::Memory);
        assert!(matches!(
            "indexeddb".parse::<Backend>(),
            Err(ConfigError::InvalidBackend(name)) if name == "indexeddb"
        ));
    }

    #[test]
    fn backend_display_roundtrip() {
        for backend in [Backend::Memory, Backend::File, Backend::Sqlite] {
            assert_eq!(backend.to_string().parse::<Backend>().unwrap(), backend);
        }
    }

    #[test]
    fn paths_live_in_data_dir() {
        let config = Config::for_dir("/tmp/locator");
        assert_eq!(config.database_path(), PathBuf::from("/tmp/locator/hd_locator.db"));
        assert_eq!(config.document_path(), PathBuf::from("/tmp/locator/products.json"));
        assert_eq!(config.legacy_path(), PathBuf::from("/tmp/locator/hd_products.json"));
        assert!(config.sync_url.is_none());
    }
}
