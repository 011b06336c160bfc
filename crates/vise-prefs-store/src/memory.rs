//! In-memory implementation of the Backend trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use crate::error::Result;
use crate::traits::{Backend, WriteOp};

/// In-memory backend.
///
/// All data is lost when the backend is dropped. Rows are kept in write
/// order; replacing a row moves it to the end, as `INSERT OR REPLACE` does.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    rows: Vec<(String, String)>,
}

impl MemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.rows.iter().position(|(n, _)| n == name)
    }

    fn put(&mut self, name: &str, value: &str) {
        if let Some(idx) = self.position(name) {
            self.rows.remove(idx);
        }
        self.rows.push((name.to_owned(), value.to_owned()));
    }

    fn delete(&mut self, name: &str) {
        if let Some(idx) = self.position(name) {
            self.rows.remove(idx);
        }
    }
}

impl Backend for MemoryBackend {
    fn load(&self, name: &str) -> Result<Option<String>> {
        Ok(self.position(name).map(|idx| self.rows[idx].1.clone()))
    }

    fn store(&mut self, name: &str, value: &str) -> Result<()> {
        self.put(name, value);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.delete(name);
        Ok(())
    }

    fn apply(&mut self, ops: &[WriteOp]) -> Result<()> {
        // The swap is the commit point.
        let mut staged = self.clone();
        for op in ops {
            match op {
                WriteOp::Put { name, value } => staged.put(name, value),
                WriteOp::Delete { name } => staged.delete(name),
            }
        }
        *self = staged;
        Ok(())
    }

    fn entries(&self) -> Result<Vec<(String, String)>> {
        Ok(self.rows.clone())
    }
}
