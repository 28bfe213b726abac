//! Advisory lock on the data directory
//!
//! Only one process may write the documents at a time. The bot holds the lock
//! for as long as it runs; offline commands take it for their duration.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, StoreError};

const LOCK_FILE: &str = ".lock";

/// Exclusive lock on a data directory, released on drop
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Try to take the lock without blocking
    pub fn acquire(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir).map_err(|e| StoreError::storage(data_dir, e))?;

        let path = data_dir.join(LOCK_FILE);
        debug!(path = %path.display(), "StoreLock::acquire: called");

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| StoreError::storage(&path, e))?;

        file.try_lock_exclusive().map_err(|_| StoreError::Locked { path: path.clone() })?;

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!(error = %e, path = %self.path.display(), "StoreLock::drop: unlock failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let temp = TempDir::new().unwrap();
        let first = StoreLock::acquire(temp.path()).unwrap();

        let second = StoreLock::acquire(temp.path());
        assert!(matches!(second, Err(StoreError::Locked { .. })));

        drop(first);
        assert!(StoreLock::acquire(temp.path()).is_ok());
    }
}
