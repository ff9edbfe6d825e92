//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the PageStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{PageStore, StorageError, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite page store
///
/// The connection is shared between workers behind a mutex; writes are
/// short single-row statements.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and initializes the schema
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    /// Counts stored pages
    pub fn count_pages(&self) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Loads the content stored under `name`, if any
    pub fn load_page(&self, name: &str) -> StorageResult<Option<Vec<u8>>> {
        let conn = self.lock()?;
        let content = conn
            .query_row(
                "SELECT content FROM pages WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(content)
    }

    /// Lists stored page names in save order
    #[cfg(test)]
    fn page_names(&self) -> StorageResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name FROM pages ORDER BY saved_at, name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}

impl PageStore for SqliteStore {
    fn prepare(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        initialize_schema(&conn)?;
        Ok(())
    }

    fn save(&self, name: &str, content: &[u8]) -> StorageResult<()> {
        if name.is_empty() {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        let now = Utc::now().to_rfc3339();
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO pages (name, content, saved_at) VALUES (?1, ?2, ?3)",
            params![name, content, now],
        )?;
        Ok(())
    }
}
