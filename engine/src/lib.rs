//! # Locator Engine
//!
//! Core logic for HD Locator, a small offline-first record of where products
//! live in a store (aisle, bay and notes).
//!
//! This crate has no IO. Storage backends, the sync client and the CLI live
//! in `locator-client`; they all share the types defined here.
//!
//! ## Core Concepts
//!
//! ### Products
//!
//! A [`Product`] carries an immutable id and creation time plus the editable
//! `name`, `aisle`, `bay` and `notes` fields. New products are built from
//! [`ProductFields`] (trimmed, name and aisle required); edits are expressed
//! as a [`ProductPatch`].
//!
//! ### Catalog
//!
//! The [`Catalog`] is the in-memory list. [`Catalog::list`] orders products by
//! the leading integer of their aisle (non-numeric aisles count as 0), then by
//! name ignoring case, and filters by a case-insensitive search over name,
//! aisle and notes.
//!
//! ### Documents
//!
//! The [`document`] module encodes and decodes the JSON array format shared by
//! export files, imports and remote sync payloads. Decoding drops records that
//! lack an `id` or `name`.
//!
//! ## Quick Start
//!
//! ```rust
//! use locator_engine::{Catalog, Product, ProductFields};
//! use chrono::Utc;
//!
//! let mut catalog = Catalog::new();
//! catalog.upsert(Product::new("p-1", ProductFields::new("Wood glue", "10"), Utc::now()).unwrap());
//! catalog.upsert(Product::new("p-2", ProductFields::new("Hinges", "2"), Utc::now()).unwrap());
//!
//! let names: Vec<_> = catalog.list("").iter().map(|p| p.name.clone()).collect();
//! assert_eq!(names, ["Hinges", "Wood glue"]);
//! ```

pub mod catalog;
pub mod document;
pub mod error;
pub mod product;

// Re-export main types at crate root
pub use catalog::{aisle_rank, display_order, Catalog};
pub use document::EXPORT_FILE_NAME;
pub use error::Error;
pub use product::{validate_records, Product, ProductFields, ProductPatch};

/// Product identifiers are opaque strings.
pub type ProductId = String;
