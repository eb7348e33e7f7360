//! Error types for snapshot persistence.

use std::io;
use thiserror::Error;

/// Result type for snapshot operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during snapshot persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backend has no valid location to write to.
    #[error("invalid snapshot path: {0}")]
    InvalidPath(String),
}
