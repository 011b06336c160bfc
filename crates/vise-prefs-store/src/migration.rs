//! Database schema migrations for SQLite.
//!
//! The schema version lives in `PRAGMA user_version`, which is 0 in a freshly
//! created file. Each migration is a SQL batch that moves the schema from
//! version N-1 to N.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Read the schema version stored in the file header.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
/// A file written by a newer build is left alone.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    let current = schema_version(conn)?;

    if current > CURRENT_VERSION {
        tracing::warn!(
            found = current,
            supported = CURRENT_VERSION,
            "preference store has a newer schema, using it as-is"
        );
        return Ok(());
    }

    if current < CURRENT_VERSION {
        tracing::debug!(from = current, to = CURRENT_VERSION, "migrating preference store");
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;
        }
        tx.pragma_update(None, "user_version", CURRENT_VERSION)?;

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS prefs (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            value TEXT NOT NULL,          -- JSON text, see vise_prefs_core::codec
            UNIQUE(name)
        );
        "#,
    )?;

    Ok(())
}
