//! # Locator Client
//!
//! Persistence and cloud sync for HD Locator.
//!
//! - [`store`]: the [`LocalStore`](store::LocalStore) contract with memory,
//!   JSON file and SQLite backends, plus migration of the legacy flat list.
//! - [`sync`]: [`RemoteSync`], the client for the remote JSON document store.
//! - [`repository`]: [`Repository`], the in-memory product list that writes
//!   through to a store and pushes to the remote document after each change.
//! - [`app`]: startup wiring used by the `hd-locator` binary.
//!
//! Local data always wins: remote failures during background pushes and the
//! startup pull are logged and ignored.

pub mod app;
pub mod config;
pub mod error;
pub mod repository;
pub mod store;
pub mod sync;

pub use config::{Backend, Config, ConfigError};
pub use error::{Error, Result, StorageError, SyncError};
pub use repository::Repository;
pub use sync::RemoteSync;
