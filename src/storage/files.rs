//! File system storage implementation
//!
//! Each page is written to its own file inside one output directory.

use crate::storage::traits::{PageStore, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory-backed page store
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Creates a store writing into `directory`
    ///
    /// The directory is created by [`PageStore::prepare`], not here.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Returns the output directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the path a page with the given name is written to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }
}

impl PageStore for FileStore {
    fn prepare(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.directory)?;
        Ok(())
    }

    fn save(&self, name: &str, content: &[u8]) -> StorageResult<()> {
        // Names are sanitized, but never let one escape the output directory
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        fs::write(self.path_for(name), content)?;
        tracing::trace!("Wrote {} bytes to {}", content.len(), self.path_for(name).display());
        Ok(())
    }
}
