//! # Vise Prefs Store
//!
//! Durable backends for the vise preference store. Provides a trait-based
//! interface over a single `prefs` table with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! Every backend holds rows of `(name, value)` where `value` is the encoded
//! text produced by `vise_prefs_core::encode`. Backends never look inside the
//! text; decoding and caching belong to the layer above.
//!
//! ## Key Types
//!
//! - [`Backend`] - The synchronous trait for all storage operations
//! - [`SqliteBackend`] - SQLite-based persistent storage
//! - [`MemoryBackend`] - In-memory storage for tests
//! - [`WriteOp`] - One write inside an atomic batch
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vise_prefs_store::{Backend, SqliteBackend, WriteOp};
//!
//! let mut backend = SqliteBackend::open("gui-dynamic.sqlite").unwrap();
//! backend.store("zoom", "150").unwrap();
//! assert_eq!(backend.load("zoom").unwrap().as_deref(), Some("150"));
//!
//! // Several writes in one transaction
//! backend
//!     .apply(&[WriteOp::put("a", "1"), WriteOp::delete("zoom")])
//!     .unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Unique names**: the table enforces `UNIQUE(name)`; a store replaces.
//! - **Atomic batches**: `apply` persists every op or none of them.
//! - **Versioned schema**: `PRAGMA user_version` records the schema version.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;
pub use traits::{Backend, WriteOp};
