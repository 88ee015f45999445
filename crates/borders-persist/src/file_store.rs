//! JSON snapshot file with atomic replacement.
//!
//! Writes go to a sibling `<name>.tmp` file which is flushed and then
//! renamed over the target, so a crash mid-save leaves either the old
//! snapshot or the new one, never a truncated file.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use borders_core::SnapshotStore;
use tracing::debug;

use crate::error::PersistError;

/// Snapshot stored in a single file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store for the snapshot at `path`. Nothing is touched until
    /// the first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the temporary file used during writes.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileSnapshotStore {
    type Error = PersistError;

    fn read(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                debug!(path = %self.path.display(), bytes = bytes.len(), "Read snapshot");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write(&self, bytes: &[u8]) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PersistError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp = self.temp_path();
        write_synced(&temp, bytes).map_err(|source| PersistError::Write {
            path: temp.clone(),
            source,
        })?;

        fs::rename(&temp, &self.path).map_err(|source| PersistError::Replace {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "Wrote snapshot");
        Ok(())
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
