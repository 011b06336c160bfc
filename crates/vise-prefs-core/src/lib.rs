//! # Vise Prefs Core
//!
//! Pure primitives for the vise preference store: the [`Value`] model and the
//! codec that turns values into the JSON text kept in the `prefs` table.
//!
//! This crate contains no I/O and no storage. It is pure computation over
//! values.
//!
//! ## Key Types
//!
//! - [`Value`] - A JSON-shaped value that can also hold raw bytes
//! - [`CodecError`] - Why a value could not be encoded or decoded
//!
//! ## Codec
//!
//! JSON cannot carry raw bytes, so blobs travel inside an envelope object.
//! See the [`codec`] module.

pub mod codec;
pub mod error;
pub mod value;

pub use codec::{decode, encode, BLOB_CLASS, CLASS_KEY, VALUE_KEY};
pub use error::{CodecError, Result};
pub use value::Value;
