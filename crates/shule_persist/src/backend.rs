//! Snapshot backend trait definition.

use crate::error::StorageResult;

/// A snapshot store for the Shule survey database.
///
/// Backends are **opaque snapshot stores**. They hold at most one blob of
/// bytes - the serialized survey store - and replace it wholesale on every
/// save. Shule owns all format interpretation; backends do not understand
/// sites, reports, or the sync log.
///
/// # Invariants
///
/// - `load` returns exactly the bytes of the most recent successful `save`,
///   or `None` if no snapshot has ever been saved
/// - `save` replaces the snapshot atomically: a crash mid-save leaves either
///   the previous snapshot or the new one, never a mix
/// - Backends must be `Send + Sync` for shared access
///
/// # Implementors
///
/// - [`super::MemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait SnapshotBackend: Send + Sync {
    /// Loads the current snapshot.
    ///
    /// Returns `None` if no snapshot exists yet (first run).
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read.
    fn load(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the snapshot with the given bytes.
    ///
    /// After this returns successfully, a subsequent `load` (including one
    /// after process restart, for durable backends) returns exactly these
    /// bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written; the previous
    /// snapshot remains intact in that case.
    fn save(&self, bytes: &[u8]) -> StorageResult<()>;
}
