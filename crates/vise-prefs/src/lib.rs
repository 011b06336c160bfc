//! # Vise Prefs
//!
//! The dynamic preference store used by the vise browser shell: small,
//! string-keyed settings (window geometry, zoom levels, last-used
//! directories) kept in one SQLite file per named store.
//!
//! ## Overview
//!
//! - **Cache**: reads are served from memory after the first lookup,
//!   including lookups that found nothing.
//! - **Defaults**: callers register defaults in memory. A value equal to its
//!   default is never stored; writing it removes the row.
//! - **Buffering**: a session holds writes back and commits them in one
//!   transaction when it ends, even if the code inside it failed.
//! - **Blobs**: raw bytes are stored inside a base64 envelope in the JSON text.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vise_prefs::{DynamicPrefs, PrefsConfig, Value, GUI_DYNAMIC};
//!
//! let config = PrefsConfig::default();
//! let mut prefs = DynamicPrefs::open(GUI_DYNAMIC, &config).unwrap();
//!
//! prefs.set_default("zoom", 100);
//! prefs.set("zoom", 150).unwrap();
//! assert_eq!(prefs.get("zoom").unwrap(), Some(Value::Int(150)));
//!
//! // Many writes, one transaction
//! prefs
//!     .buffered(|p| -> vise_prefs::Result<()> {
//!         p.set("window-geometry", vec![0u8, 1, 2, 3])?;
//!         p.set("sidebar-visible", true)
//!     })
//!     .unwrap();
//! ```
//!
//! ## Re-exports
//!
//! - `vise_prefs::store` - Backends and schema migration

pub mod buffer;
pub mod config;
pub mod error;
pub mod prefs;

pub use vise_prefs_store as store;

pub use buffer::BufferGuard;
pub use config::{PrefsConfig, APP_NAME, CONFIG_DIR_ENV, GUI_DYNAMIC};
pub use error::{PrefsError, Result};
pub use prefs::DynamicPrefs;

pub use vise_prefs_core::{decode, encode, CodecError, Value};
pub use vise_prefs_store::{Backend, MemoryBackend, SqliteBackend, StoreError, WriteOp};
