//! Storage traits and error types
//!
//! This module defines the trait interface for page storage backends and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid page name: {0:?}")]
    InvalidName(String),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for page storage backends
///
/// A store receives each successfully fetched page exactly once per URL
/// (the frontier guarantees exactly-once admission). Names come from
/// [`page_file_name`](crate::storage::page_file_name); distinct URLs may
/// map to the same name, in which case the later write wins.
///
/// Implementations are shared between the workers of a crawl run, so they
/// must be `Send + Sync`.
pub trait PageStore: Send + Sync {
    /// Makes the storage destination ready (creates directories, tables, ...)
    ///
    /// Called once before the first page of a run is saved.
    fn prepare(&self) -> StorageResult<()>;

    /// Persists `content` under `name`
    fn save(&self, name: &str, content: &[u8]) -> StorageResult<()>;
}
