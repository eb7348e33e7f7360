//! Error types for Shule core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in Shule core operations.
///
/// The store's own logic never fails: not-found is a no-op and reads are
/// infallible. Every variant here comes from the persistence boundary.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Snapshot backend error.
    #[error("storage error: {0}")]
    Storage(#[from] shule_persist::StorageError),

    /// Snapshot (de)serialization error.
    #[error("snapshot codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// A restored snapshot could not be interpreted.
    #[error("snapshot corrupted: {message}")]
    SnapshotCorrupted {
        /// Description of the corruption.
        message: String,
    },
}

impl CoreError {
    /// Creates a snapshot corruption error.
    pub fn snapshot_corrupted(message: impl Into<String>) -> Self {
        Self::SnapshotCorrupted {
            message: message.into(),
        }
    }
}
