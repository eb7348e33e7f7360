//! Bounded, newest-first log of sync attempt outcomes.

use crate::entity::{EntityId, EntityKind, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Maximum number of entries retained in the sync log.
pub const SYNC_LOG_CAPACITY: usize = 100;

/// Outcome status recorded in a sync log entry.
///
/// `Pending` denotes not-yet-attempted and is never written by the sync
/// engine itself; it exists for UI layers that pre-populate rows before a
/// pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// The attempt succeeded; the server confirmed the entity.
    Synced,
    /// No attempt has been made yet.
    Pending,
    /// The attempt failed; the entity remains dirty.
    Failed,
}

impl SyncStatus {
    /// The lowercase name used in displays and exports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Synced => "synced",
            Self::Pending => "pending",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of one sync attempt.
///
/// Entries survive deletion of their originating entity; they are history,
/// not references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncLogEntry {
    /// Composed identifier: `{kind}-{entity_id}-{timestamp_millis}`.
    ///
    /// Composed rather than random so entries are naturally orderable and
    /// traceable to their source event.
    pub id: String,
    /// When the attempt was recorded.
    pub timestamp: Timestamp,
    /// Which collection the entity belongs to.
    pub kind: EntityKind,
    /// The entity the attempt was for.
    pub entity_id: EntityId,
    /// Outcome of the attempt.
    pub status: SyncStatus,
    /// Human-readable failure detail; present only on failure.
    pub message: Option<String>,
}

impl SyncLogEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(
        kind: EntityKind,
        entity_id: EntityId,
        status: SyncStatus,
        message: Option<String>,
    ) -> Self {
        let timestamp = Timestamp::now();
        Self {
            id: format!("{}-{}-{}", kind.log_name(), entity_id, timestamp),
            timestamp,
            kind,
            entity_id,
            status,
            message,
        }
    }

    /// Creates a successful-attempt entry.
    #[must_use]
    pub fn success(kind: EntityKind, entity_id: EntityId) -> Self {
        Self::new(kind, entity_id, SyncStatus::Synced, None)
    }

    /// Creates a failed-attempt entry with a failure message.
    #[must_use]
    pub fn failure(kind: EntityKind, entity_id: EntityId, message: impl Into<String>) -> Self {
        Self::new(kind, entity_id, SyncStatus::Failed, Some(message.into()))
    }
}

/// Append-only, bounded log of sync attempts, newest first.
///
/// # Invariants
///
/// - Entries are prepended; index 0 is always the most recent attempt
/// - After every append the log is truncated to [`SYNC_LOG_CAPACITY`]
///   entries; the oldest are silently discarded
/// - Entries are never mutated or removed individually
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncLog {
    entries: VecDeque<SyncLogEntry>,
}

impl SyncLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends an entry, then truncates to capacity.
    pub fn append(&mut self, entry: SyncLogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(SYNC_LOG_CAPACITY);
    }

    /// Returns all entries, newest first.
    #[must_use]
    pub fn entries(&self) -> Vec<SyncLogEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Returns the most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&SyncLogEntry> {
        self.entries.front()
    }

    /// Returns the number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no attempts have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: i64) -> SyncLogEntry {
        let mut e = SyncLogEntry::success(EntityKind::Site, EntityId::new());
        // Distinguishable timestamps regardless of clock resolution.
        e.timestamp = Timestamp::from_millis(n);
        e
    }

    #[test]
    fn composed_id_shape() {
        let id = EntityId::new();
        let e = SyncLogEntry::success(EntityKind::Report, id);
        assert!(e.id.starts_with("report-"));
        assert!(e.id.contains(&id.to_string()));
        assert!(e.id.ends_with(&e.timestamp.to_string()));
    }

    #[test]
    fn failure_carries_message() {
        let e = SyncLogEntry::failure(EntityKind::Site, EntityId::new(), "timeout");
        assert_eq!(e.status, SyncStatus::Failed);
        assert_eq!(e.message.as_deref(), Some("timeout"));

        let ok = SyncLogEntry::success(EntityKind::Site, EntityId::new());
        assert!(ok.message.is_none());
    }

    #[test]
    fn newest_first() {
        let mut log = SyncLog::new();
        log.append(entry(1));
        log.append(entry(2));
        log.append(entry(3));

        let entries = log.entries();
        assert_eq!(entries[0].timestamp, Timestamp::from_millis(3));
        assert_eq!(entries[2].timestamp, Timestamp::from_millis(1));
        assert_eq!(log.latest().unwrap().timestamp, Timestamp::from_millis(3));
    }

    #[test]
    fn bounded_at_capacity() {
        let mut log = SyncLog::new();
        for n in 0..250 {
            log.append(entry(n));
        }

        assert_eq!(log.len(), SYNC_LOG_CAPACITY);
        // The 100 most recent survive, newest first.
        let entries = log.entries();
        assert_eq!(entries[0].timestamp, Timestamp::from_millis(249));
        assert_eq!(
            entries[SYNC_LOG_CAPACITY - 1].timestamp,
            Timestamp::from_millis(150)
        );
    }

    #[test]
    fn serde_roundtrip() {
        let mut log = SyncLog::new();
        log.append(SyncLogEntry::failure(
            EntityKind::Report,
            EntityId::new(),
            "server error",
        ));

        let json = serde_json::to_string(&log).unwrap();
        let back: SyncLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
