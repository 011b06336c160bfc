//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tempfile::TempDir;
use vise_prefs::{DynamicPrefs, PrefsConfig, SqliteBackend};

/// A configuration directory that is removed when the fixture is dropped.
pub struct TempStore {
    dir: TempDir,
    pub config: PrefsConfig,
}

impl TempStore {
    /// Create a fresh, empty config directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = PrefsConfig::new(dir.path().join("vise"));
        Self { dir, config }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// The file behind the store called `name`.
    pub fn path(&self, name: &str) -> PathBuf {
        self.config.store_path(name).expect("valid store name")
    }

    /// A new store instance over `name`; each call starts with a cold cache.
    pub fn open(&self, name: &str) -> DynamicPrefs<SqliteBackend> {
        DynamicPrefs::open(name, &self.config).expect("valid store name")
    }

    /// Raw `(name, value)` rows of the store file, in id order.
    ///
    /// Opens the file read-only, independent of any store instance.
    pub fn rows(&self, name: &str) -> Vec<(String, String)> {
        let conn = Connection::open_with_flags(self.path(name), OpenFlags::SQLITE_OPEN_READ_ONLY)
            .expect("open store file");
        let mut stmt = conn
            .prepare("SELECT name, value FROM prefs ORDER BY id")
            .expect("prepare");
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .expect("query")
            .collect::<rusqlite::Result<Vec<_>>>()
            .expect("read rows");
        rows
    }

    /// Run raw SQL against the store file (triggers, corrupt rows, ...).
    pub fn execute_batch(&self, name: &str, sql: &str) {
        let conn = Connection::open(self.path(name)).expect("open store file");
        conn.execute_batch(sql).expect("execute sql");
    }
}

impl Default for TempStore {
    fn default() -> Self {
        Self::new()
    }
}
