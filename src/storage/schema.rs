//! Database schema definitions
//!
//! This module contains the SQL schema for the SQLite page store.

use rusqlite::Connection;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per persisted page, keyed by its sanitized name
CREATE TABLE IF NOT EXISTS pages (
    name TEXT PRIMARY KEY,
    content BLOB NOT NULL,
    saved_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_pages_saved_at ON pages(saved_at);
"#;

/// Initializes the database schema
///
/// Safe to call on an existing database; every statement is idempotent.
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
