//! Backend trait: the abstract interface for preference persistence.
//!
//! This trait keeps the cache layer storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use crate::error::Result;

/// A single write inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Insert or replace the row for `name`.
    Put { name: String, value: String },
    /// Remove the row for `name`, if any.
    Delete { name: String },
}

impl WriteOp {
    pub fn put(name: impl Into<String>, value: impl Into<String>) -> Self {
        WriteOp::Put {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn delete(name: impl Into<String>) -> Self {
        WriteOp::Delete { name: name.into() }
    }

    /// The row this op touches.
    pub fn name(&self) -> &str {
        match self {
            WriteOp::Put { name, .. } | WriteOp::Delete { name } => name,
        }
    }
}

/// The Backend trait: synchronous interface over the `prefs` table.
///
/// Values are opaque encoded text. Every method returns as soon as the
/// underlying statement finishes; nothing here suspends or spawns.
///
/// # Design Notes
///
/// - **Unique names**: at most one row per name. `store` replaces.
/// - **Idempotent deletes**: removing a missing row is not an error.
/// - **Atomic batches**: `apply` leaves the backend untouched when it fails.
pub trait Backend {
    /// Get the stored text for `name`.
    fn load(&self, name: &str) -> Result<Option<String>>;

    /// Insert or replace the row for `name`.
    fn store(&mut self, name: &str, value: &str) -> Result<()>;

    /// Remove the row for `name`.
    fn remove(&mut self, name: &str) -> Result<()>;

    /// Apply a batch of writes in order, all or nothing.
    fn apply(&mut self, ops: &[WriteOp]) -> Result<()>;

    /// All rows in write order.
    fn entries(&self) -> Result<Vec<(String, String)>>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn load(&self, name: &str) -> Result<Option<String>> {
        (**self).load(name)
    }

    fn store(&mut self, name: &str, value: &str) -> Result<()> {
        (**self).store(name, value)
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        (**self).remove(name)
    }

    fn apply(&mut self, ops: &[WriteOp]) -> Result<()> {
        (**self).apply(ops)
    }

    fn entries(&self) -> Result<Vec<(String, String)>> {
        (**self).entries()
    }
}
