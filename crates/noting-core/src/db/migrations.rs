//! Database migrations

use crate::error::{Error, Result};
use rusqlite::Connection;

/// Current schema version
const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations
pub fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::UnsupportedSchema {
            found: version,
            supported: CURRENT_VERSION,
        });
    }

    if version < 1 {
        migrate_v1(conn)?;
    }
    if version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// Get the current schema version
fn get_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| Ok(row.get::<_, i32>(0)? != 0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Run statements inside one transaction, rolling back on the first failure
fn apply(conn: &Connection, statements: &[&str]) -> Result<()> {
    conn.execute("BEGIN TRANSACTION", [])?;

    for stmt in statements {
        if let Err(e) = conn.execute(stmt, []) {
            conn.execute("ROLLBACK", []).ok();
            return Err(e.into());
        }
    }

    if let Err(e) = conn.execute("COMMIT", []) {
        conn.execute("ROLLBACK", []).ok();
        return Err(e.into());
    }

    Ok(())
}

/// Migration to version 1: notes and deletion tombstones
fn migrate_v1(conn: &Connection) -> Result<()> {
    apply(
        conn,
        &[
            // Schema version tracking
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            )",
            // Notes table
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY,
                text TEXT NOT NULL,
                date TEXT NOT NULL,
                user_id TEXT,
                is_synced INTEGER NOT NULL DEFAULT 0,
                is_deleted INTEGER NOT NULL DEFAULT 0
            )",
            "CREATE INDEX IF NOT EXISTS idx_notes_date ON notes(date DESC)",
            "CREATE INDEX IF NOT EXISTS idx_notes_pending ON notes(is_synced, is_deleted)",
            // Deletions waiting for remote confirmation
            "CREATE TABLE IF NOT EXISTS deleted_notes (
                id INTEGER PRIMARY KEY,
                deleted_at INTEGER NOT NULL
            )",
            "INSERT INTO schema_version (version) VALUES (1)",
        ],
    )?;

    tracing::info!("Migrated database to version 1");
    Ok(())
}

/// Migration to version 2: pinned notes
fn migrate_v2(conn: &Connection) -> Result<()> {
    apply(
        conn,
        &[
            "ALTER TABLE notes ADD COLUMN is_pinned INTEGER NOT NULL DEFAULT 0",
            "INSERT INTO schema_version (version) VALUES (2)",
        ],
    )?;

    tracing::info!("Migrated database to version {CURRENT_VERSION}");
    Ok(())
}
