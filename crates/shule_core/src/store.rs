//! The survey store: single source of truth for sites, reports, and the
//! sync log.

use crate::entity::{EntityId, EntityKind, Report, Site, SyncEntity};
use crate::error::{CoreError, CoreResult};
use crate::log::{SyncLog, SyncLogEntry, SyncStatus};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shule_persist::SnapshotBackend;
use tracing::{debug, trace};

/// The full persisted state of the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    sites: Vec<Site>,
    reports: Vec<Report>,
    sync_log: SyncLog,
    auto_sync: bool,
}

/// Counts exposed for observability and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Total sites.
    pub sites: usize,
    /// Total reports.
    pub reports: usize,
    /// Sites awaiting sync.
    pub unsynced_sites: usize,
    /// Reports awaiting sync.
    pub unsynced_reports: usize,
    /// Retained sync log entries.
    pub log_entries: usize,
    /// Whether the app shell should sync automatically.
    pub auto_sync: bool,
}

/// Single source of truth for survey entities and the sync log.
///
/// The store is a single-writer, synchronous-mutation structure: every
/// mutating operation applies atomically under one lock and saves the full
/// snapshot through the backend before returning. Collections keep
/// insertion order; dirty queries return entities in that order.
///
/// Not-found is never an error here: updates and deletes on a missing id
/// are silent no-ops, and point reads return `Option`.
pub struct SurveyStore {
    state: Mutex<StoreState>,
    backend: Box<dyn SnapshotBackend>,
}

impl SurveyStore {
    /// Opens a store over the given backend, restoring any existing
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read or
    /// parsed.
    pub fn open(backend: Box<dyn SnapshotBackend>) -> CoreResult<Self> {
        let state = match backend.load()? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| CoreError::snapshot_corrupted(err.to_string()))?,
            None => StoreState::default(),
        };
        debug!(
            sites = state.sites.len(),
            reports = state.reports.len(),
            "survey store opened"
        );
        Ok(Self {
            state: Mutex::new(state),
            backend,
        })
    }

    /// Creates an ephemeral store backed by memory, for tests and demos.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            backend: Box::new(shule_persist::MemoryBackend::new()),
        }
    }

    /// Applies a mutation and saves the snapshot, all under the store lock.
    fn mutate<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> CoreResult<T> {
        let mut state = self.state.lock();
        let out = f(&mut state);
        let bytes = serde_json::to_vec(&*state)?;
        self.backend.save(&bytes)?;
        trace!(bytes = bytes.len(), "snapshot saved");
        Ok(out)
    }

    fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        f(&self.state.lock())
    }

    /// Inserts a site, stamped dirty.
    ///
    /// Id uniqueness is the caller's responsibility; the store does not
    /// check.
    pub fn add_site(&self, mut site: Site) -> CoreResult<()> {
        site.mark_dirty();
        debug!(site = %site.id, name = %site.name, "adding site");
        self.mutate(|state| state.sites.push(site))
    }

    /// Inserts a report, stamped dirty.
    pub fn add_report(&self, mut report: Report) -> CoreResult<()> {
        report.mark_dirty();
        debug!(report = %report.id, school = %report.school_id, "adding report");
        self.mutate(|state| state.reports.push(report))
    }

    /// Replaces the stored site with the same id, forcing it dirty.
    ///
    /// Whatever the caller's copy claims about its sync state is ignored.
    /// Missing id is a no-op.
    pub fn update_site(&self, site: Site) -> CoreResult<()> {
        self.mutate(|state| replace_dirty(&mut state.sites, site))
    }

    /// Replaces the stored report with the same id, forcing it dirty.
    ///
    /// Missing id is a no-op.
    pub fn update_report(&self, report: Report) -> CoreResult<()> {
        self.mutate(|state| replace_dirty(&mut state.reports, report))
    }

    /// Removes a site and every report referencing it.
    ///
    /// Both removals happen in the same critical section and the same
    /// snapshot save; no orphaned report can survive. Missing id is a
    /// no-op.
    pub fn delete_site(&self, id: EntityId) -> CoreResult<()> {
        debug!(site = %id, "deleting site with cascade");
        self.mutate(|state| {
            state.sites.retain(|site| site.id != id);
            state.reports.retain(|report| report.school_id != id);
        })
    }

    /// Removes a report. Missing id is a no-op.
    pub fn delete_report(&self, id: EntityId) -> CoreResult<()> {
        self.mutate(|state| state.reports.retain(|report| report.id != id))
    }

    /// Returns the site with the given id, if present.
    #[must_use]
    pub fn site(&self, id: EntityId) -> Option<Site> {
        self.read(|state| state.sites.iter().find(|site| site.id == id).cloned())
    }

    /// Returns the report with the given id, if present.
    #[must_use]
    pub fn report(&self, id: EntityId) -> Option<Report> {
        self.read(|state| state.reports.iter().find(|report| report.id == id).cloned())
    }

    /// Returns all sites in insertion order.
    #[must_use]
    pub fn sites(&self) -> Vec<Site> {
        self.read(|state| state.sites.clone())
    }

    /// Returns all reports in insertion order.
    #[must_use]
    pub fn reports(&self) -> Vec<Report> {
        self.read(|state| state.reports.clone())
    }

    /// Returns dirty sites in insertion order.
    #[must_use]
    pub fn unsynced_sites(&self) -> Vec<Site> {
        self.read(|state| {
            state
                .sites
                .iter()
                .filter(|site| !site.sync.synced)
                .cloned()
                .collect()
        })
    }

    /// Returns dirty reports in insertion order.
    #[must_use]
    pub fn unsynced_reports(&self) -> Vec<Report> {
        self.read(|state| {
            state
                .reports
                .iter()
                .filter(|report| !report.sync.synced)
                .cloned()
                .collect()
        })
    }

    /// Returns all reports referencing the given site.
    #[must_use]
    pub fn reports_by_school(&self, school_id: EntityId) -> Vec<Report> {
        self.read(|state| {
            state
                .reports
                .iter()
                .filter(|report| report.school_id == school_id)
                .cloned()
                .collect()
        })
    }

    /// Records the outcome of one sync attempt.
    ///
    /// The log entry is appended *before* the entity's flag is mutated
    /// (log-then-mutate), so a crash between the two leaves the log
    /// consistent with the attempt having been made. The entry is appended
    /// unconditionally - even if the entity has since been deleted, the
    /// attempt remains visible as history.
    pub fn mark_sync_result(
        &self,
        kind: EntityKind,
        id: EntityId,
        success: bool,
        message: Option<String>,
    ) -> CoreResult<()> {
        self.mutate(|state| {
            let status = if success {
                SyncStatus::Synced
            } else {
                SyncStatus::Failed
            };
            state
                .sync_log
                .append(SyncLogEntry::new(kind, id, status, message));

            match kind {
                EntityKind::Site => {
                    if let Some(site) = state.sites.iter_mut().find(|site| site.id == id) {
                        site.record_sync_outcome(success);
                    }
                }
                EntityKind::Report => {
                    if let Some(report) = state.reports.iter_mut().find(|report| report.id == id) {
                        report.record_sync_outcome(success);
                    }
                }
            }
        })
    }

    /// Appends an arbitrary entry to the sync log.
    pub fn append_sync_log(&self, entry: SyncLogEntry) -> CoreResult<()> {
        self.mutate(|state| state.sync_log.append(entry))
    }

    /// Returns the sync log, newest first.
    #[must_use]
    pub fn sync_log(&self) -> Vec<SyncLogEntry> {
        self.read(|state| state.sync_log.entries())
    }

    /// Sets the persisted auto-sync preference.
    ///
    /// Scheduling is the app shell's concern; the store only remembers the
    /// choice.
    pub fn set_auto_sync(&self, enabled: bool) -> CoreResult<()> {
        self.mutate(|state| state.auto_sync = enabled)
    }

    /// Returns the persisted auto-sync preference.
    #[must_use]
    pub fn auto_sync(&self) -> bool {
        self.read(|state| state.auto_sync)
    }

    /// Returns observability counts.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        self.read(|state| StoreStats {
            sites: state.sites.len(),
            reports: state.reports.len(),
            unsynced_sites: state.sites.iter().filter(|s| !s.sync.synced).count(),
            unsynced_reports: state.reports.iter().filter(|r| !r.sync.synced).count(),
            log_entries: state.sync_log.len(),
            auto_sync: state.auto_sync,
        })
    }
}

impl std::fmt::Debug for SurveyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("SurveyStore")
            .field("sites", &stats.sites)
            .field("reports", &stats.reports)
            .field("log_entries", &stats.log_entries)
            .finish_non_exhaustive()
    }
}

/// Map-and-replace update: the matching entry is replaced with the caller's
/// copy forced dirty; everything else passes through unchanged.
fn replace_dirty<E: SyncEntity>(collection: &mut [E], entity: E) {
    if let Some(slot) = collection.iter_mut().find(|e| e.id() == entity.id()) {
        let mut updated = entity;
        updated.mark_dirty();
        *slot = updated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{SyncMeta, Timestamp};
    use shule_persist::FileBackend;

    fn synced_site(name: &str) -> Site {
        let mut site = Site::new(name, "Test District");
        site.sync = SyncMeta {
            synced: true,
            last_updated: Timestamp::from_millis(0),
        };
        site
    }

    #[test]
    fn add_stamps_dirty() {
        let store = SurveyStore::in_memory();
        let site = synced_site("Claims Synced Primary");
        let id = site.id;

        let before = Timestamp::now();
        store.add_site(site).unwrap();

        let stored = store.site(id).unwrap();
        assert!(!stored.sync.synced);
        assert!(stored.sync.last_updated >= before);
    }

    #[test]
    fn update_forces_dirty() {
        let store = SurveyStore::in_memory();
        let site = Site::new("Kigoma Primary", "Kigoma");
        let id = site.id;
        store.add_site(site).unwrap();
        store.mark_sync_result(EntityKind::Site, id, true, None).unwrap();
        assert!(store.site(id).unwrap().sync.synced);

        // Caller hands back a copy that still claims to be synced.
        let mut edited = store.site(id).unwrap();
        edited.name = "Kigoma Primary School".into();
        store.update_site(edited).unwrap();

        let stored = store.site(id).unwrap();
        assert_eq!(stored.name, "Kigoma Primary School");
        assert!(!stored.sync.synced);
    }

    #[test]
    fn update_missing_is_noop() {
        let store = SurveyStore::in_memory();
        store.add_site(Site::new("Only Site", "Somewhere")).unwrap();

        let phantom = Site::new("Phantom", "Nowhere");
        store.update_site(phantom).unwrap();

        assert_eq!(store.sites().len(), 1);
        assert_eq!(store.sites()[0].name, "Only Site");
    }

    #[test]
    fn get_missing_is_none() {
        let store = SurveyStore::in_memory();
        assert!(store.site(EntityId::new()).is_none());
        assert!(store.report(EntityId::new()).is_none());
    }

    #[test]
    fn delete_site_cascades_to_reports() {
        let store = SurveyStore::in_memory();
        let s1 = Site::new("Keeps Reports", "North");
        let s2 = Site::new("Loses Reports", "South");
        let (id1, id2) = (s1.id, s2.id);
        store.add_site(s1).unwrap();
        store.add_site(s2).unwrap();
        store.add_report(Report::new(id1)).unwrap();
        store.add_report(Report::new(id2)).unwrap();
        store.add_report(Report::new(id2)).unwrap();

        store.delete_site(id2).unwrap();

        assert!(store.site(id2).is_none());
        assert!(store.reports_by_school(id2).is_empty());
        assert_eq!(store.reports().len(), 1);
        assert_eq!(store.reports()[0].school_id, id1);
    }

    #[test]
    fn delete_missing_is_noop() {
        let store = SurveyStore::in_memory();
        store.add_site(Site::new("Still Here", "East")).unwrap();
        store.delete_site(EntityId::new()).unwrap();
        store.delete_report(EntityId::new()).unwrap();
        assert_eq!(store.stats().sites, 1);
    }

    #[test]
    fn unsynced_preserves_insertion_order() {
        let store = SurveyStore::in_memory();
        let names = ["First", "Second", "Third"];
        for name in names {
            store.add_site(Site::new(name, "Order District")).unwrap();
        }

        let dirty = store.unsynced_sites();
        let got: Vec<_> = dirty.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(got, names);
    }

    #[test]
    fn mark_sync_result_updates_flag_and_log() {
        let store = SurveyStore::in_memory();
        let site = Site::new("Flag School", "West");
        let id = site.id;
        store.add_site(site).unwrap();

        store
            .mark_sync_result(EntityKind::Site, id, false, Some("network unreachable".into()))
            .unwrap();

        let stored = store.site(id).unwrap();
        assert!(!stored.sync.synced);

        let log = store.sync_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].status, SyncStatus::Failed);
        assert_eq!(log[0].entity_id, id);
        assert_eq!(log[0].message.as_deref(), Some("network unreachable"));

        store.mark_sync_result(EntityKind::Site, id, true, None).unwrap();
        assert!(store.site(id).unwrap().sync.synced);
        assert_eq!(store.sync_log()[0].status, SyncStatus::Synced);
    }

    #[test]
    fn log_entry_survives_entity_deletion() {
        let store = SurveyStore::in_memory();
        let site = Site::new("Short-Lived", "Gone");
        let id = site.id;
        store.add_site(site).unwrap();
        store.mark_sync_result(EntityKind::Site, id, false, Some("offline".into())).unwrap();
        store.delete_site(id).unwrap();

        // History is not cascaded.
        assert_eq!(store.sync_log().len(), 1);

        // An attempt recorded after deletion still lands in the log.
        store.mark_sync_result(EntityKind::Site, id, true, None).unwrap();
        assert_eq!(store.sync_log().len(), 2);
    }

    #[test]
    fn auto_sync_flag_roundtrip() {
        let store = SurveyStore::in_memory();
        assert!(!store.auto_sync());
        store.set_auto_sync(true).unwrap();
        assert!(store.auto_sync());
    }

    #[test]
    fn snapshot_restores_full_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.json");

        let site_id;
        {
            let backend = Box::new(FileBackend::open(&path).unwrap());
            let store = SurveyStore::open(backend).unwrap();
            let site = Site::new("Persistent Primary", "Durable");
            site_id = site.id;
            store.add_site(site).unwrap();
            store.add_report(Report::new(site_id)).unwrap();
            store
                .mark_sync_result(EntityKind::Site, site_id, true, None)
                .unwrap();
            store.set_auto_sync(true).unwrap();
        }

        let backend = Box::new(FileBackend::open(&path).unwrap());
        let restored = SurveyStore::open(backend).unwrap();

        assert_eq!(restored.stats().sites, 1);
        assert_eq!(restored.stats().reports, 1);
        assert!(restored.site(site_id).unwrap().sync.synced);
        assert_eq!(restored.sync_log().len(), 1);
        assert!(restored.auto_sync());
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.json");
        std::fs::write(&path, b"not json at all").unwrap();

        let backend = Box::new(FileBackend::open(&path).unwrap());
        let result = SurveyStore::open(backend);
        assert!(matches!(result, Err(CoreError::SnapshotCorrupted { .. })));
    }
}
