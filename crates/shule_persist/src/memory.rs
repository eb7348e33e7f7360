//! In-memory snapshot backend for testing.

use crate::backend::SnapshotBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;

/// An in-memory snapshot backend.
///
/// This backend keeps the snapshot in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use shule_persist::{MemoryBackend, SnapshotBackend};
///
/// let backend = MemoryBackend::new();
/// assert!(backend.load().unwrap().is_none());
/// backend.save(b"snapshot").unwrap();
/// assert_eq!(backend.load().unwrap(), Some(b"snapshot".to_vec()));
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    snapshot: RwLock<Option<Vec<u8>>>,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory backend with a pre-existing snapshot.
    ///
    /// Useful for testing restore-at-startup scenarios.
    #[must_use]
    pub fn with_snapshot(bytes: Vec<u8>) -> Self {
        Self {
            snapshot: RwLock::new(Some(bytes)),
        }
    }

    /// Returns true if a snapshot currently exists.
    #[must_use]
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.read().is_some()
    }

    /// Clears the snapshot.
    pub fn clear(&self) {
        *self.snapshot.write() = None;
    }
}

impl SnapshotBackend for MemoryBackend {
    fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.snapshot.read().clone())
    }

    fn save(&self, bytes: &[u8]) -> StorageResult<()> {
        *self.snapshot.write() = Some(bytes.to_vec());
        Ok(())
    }
}
