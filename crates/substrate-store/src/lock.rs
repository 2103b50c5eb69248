//! Per-process exclusive directory lock (`spec.md` §5), grounded on the
//! `daemon.lock` / `fs2::FileExt::try_lock_exclusive` pattern.

use std::fs::File;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use substrate_core::errors::StoreError;

/// Held for the lifetime of a `Substrate` instance. Dropping it releases the
/// OS-level advisory lock.
pub struct DirectoryLock {
    _file: File,
    path: PathBuf,
}

impl DirectoryLock {
    /// Acquire the exclusive lock on `data_dir/.lock`, creating `data_dir`
    /// if necessary. Fails immediately (non-blocking) if another process
    /// already holds it.
    pub fn acquire(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir).map_err(|source| StoreError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;
        let path = data_dir.join(".lock");
        let file = File::create(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        file.try_lock_exclusive()
            .map_err(|_| StoreError::DirectoryLocked { path: path.clone() })?;
        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
