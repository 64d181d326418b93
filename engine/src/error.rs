//! Error types for the locator engine.

use thiserror::Error;

/// All possible errors from the locator engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required product field was missing or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A document could not be decoded as a product list.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
