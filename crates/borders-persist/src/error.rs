//! Error types for snapshot storage.
//!
//! Every filesystem failure carries the path it happened on, since the
//! snapshot, its temp file, and its parent directory are all touched during
//! a single save.

use std::path::PathBuf;

/// Errors that can occur while reading or writing the snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Reading the snapshot file failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Creating the snapshot's parent directory failed.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Writing the temporary file failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File that was being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Renaming the temporary file over the snapshot failed.
    #[error("failed to replace {}: {source}", path.display())]
    Replace {
        /// The snapshot path being replaced.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
