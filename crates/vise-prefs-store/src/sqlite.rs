//! SQLite implementation of the Backend trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled SQLite
//! and one connection held for the lifetime of the backend.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::migration;
use crate::traits::{Backend, WriteOp};

/// SQLite-based backend.
///
/// Owns its connection outright; callers serialize access through `&mut`.
/// Statements outside [`Backend::apply`] run in autocommit mode.
pub struct SqliteBackend {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteBackend {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened preference store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self { conn, path: None })
    }

    /// The backing file, or `None` for an in-memory database.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The raw connection, for inspection and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn put(conn: &Connection, name: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO prefs (name, value) VALUES (?1, ?2)",
        params![name, value],
    )?;
    Ok(())
}

fn delete(conn: &Connection, name: &str) -> Result<()> {
    conn.execute("DELETE FROM prefs WHERE name = ?1", params![name])?;
    Ok(())
}

impl Backend for SqliteBackend {
    fn load(&self, name: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM prefs WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn store(&mut self, name: &str, value: &str) -> Result<()> {
        put(&self.conn, name, value)
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        delete(&self.conn, name)
    }

    fn apply(&mut self, ops: &[WriteOp]) -> Result<()> {
        // Dropping the transaction on an early return rolls it back.
        let tx = self.conn.transaction()?;

        for op in ops {
            match op {
                WriteOp::Put { name, value } => put(&tx, name, value)?,
                WriteOp::Delete { name } => delete(&tx, name)?,
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn entries(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare("SELECT name, value FROM prefs ORDER BY id")?;

        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }
}
