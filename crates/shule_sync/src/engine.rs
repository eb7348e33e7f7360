//! The sync engine: drives one full pass over all dirty entities.

use crate::error::SyncResult;
use crate::transport::{SyncTransport, UpsertRequest};
use serde::Serialize;
use shule_core::{SurveyStore, SyncEntity};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Success/failure counts for one entity kind within a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts {
    /// Entities confirmed by the remote system.
    pub success: u32,
    /// Entities whose attempt failed; they remain dirty.
    pub failed: u32,
}

impl KindCounts {
    /// Total attempts for this kind.
    #[must_use]
    pub const fn attempted(self) -> u32 {
        self.success + self.failed
    }
}

/// Aggregate result of one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Site attempt counts.
    pub sites: KindCounts,
    /// Report attempt counts.
    pub reports: KindCounts,
    /// Wall time of the whole pass.
    pub duration: Duration,
}

impl SyncSummary {
    /// Total attempts across both kinds.
    #[must_use]
    pub const fn attempted(&self) -> u32 {
        self.sites.attempted() + self.reports.attempted()
    }

    /// Total failures across both kinds.
    #[must_use]
    pub const fn failed(&self) -> u32 {
        self.sites.failed + self.reports.failed
    }

    /// Returns true if every attempt in the pass succeeded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed() == 0
    }
}

/// Stateless orchestrator for sync passes.
///
/// The engine holds no state of its own between invocations; a pass is
/// parameterized entirely by what the store currently reports as dirty.
/// Both collaborators are injected - the engine never reaches for ambient
/// global state.
///
/// A pass is strictly sequential: each entity's transport call completes
/// before the next begins, sites before reports (reports reference sites by
/// id, so pushing sites first reduces the chance of a remote foreign-key
/// violation; the engine does not verify the parent was accepted - this is
/// a best-effort ordering heuristic).
pub struct SyncEngine<T: SyncTransport> {
    store: Arc<SurveyStore>,
    transport: Arc<T>,
}

impl<T: SyncTransport> SyncEngine<T> {
    /// Creates an engine over the given store and transport.
    pub fn new(store: Arc<SurveyStore>, transport: Arc<T>) -> Self {
        Self { store, transport }
    }

    /// Runs one sync pass over every currently-dirty entity.
    ///
    /// Transport failures are isolated per entity: each is recorded in the
    /// sync log with a message, the entity stays dirty, and the pass moves
    /// on. There is no intra-pass retry and no mid-pass abort; entities
    /// already marked synced keep that state regardless of later failures.
    ///
    /// # Errors
    ///
    /// The pass itself fails only if the local store cannot persist an
    /// outcome. Transport errors never surface here.
    pub fn sync_all(&self) -> SyncResult<SyncSummary> {
        let start = Instant::now();
        let mut summary = SyncSummary::default();

        let sites = self.store.unsynced_sites();
        info!(sites = sites.len(), "starting sync pass");

        for site in &sites {
            if self.sync_one(site)? {
                summary.sites.success += 1;
            } else {
                summary.sites.failed += 1;
            }
        }

        // Reports are queried only once every site attempt has settled.
        let reports = self.store.unsynced_reports();
        debug!(reports = reports.len(), "sites attempted, starting reports");

        for report in &reports {
            if self.sync_one(report)? {
                summary.reports.success += 1;
            } else {
                summary.reports.failed += 1;
            }
        }

        summary.duration = start.elapsed();
        info!(
            site_success = summary.sites.success,
            site_failed = summary.sites.failed,
            report_success = summary.reports.success,
            report_failed = summary.reports.failed,
            "sync pass complete"
        );
        Ok(summary)
    }

    /// Attempts one entity and records the outcome.
    ///
    /// Returns whether the attempt succeeded. Never lets a transport error
    /// cross this boundary - every failure becomes a log entry plus a dirty
    /// flag.
    fn sync_one<E: SyncEntity + Serialize>(&self, entity: &E) -> SyncResult<bool> {
        let outcome = UpsertRequest::for_entity(entity)
            .and_then(|request| self.transport.upsert(&request));

        match outcome {
            Ok(ack) => {
                debug!(kind = %E::KIND, entity = %ack.entity_id, "entity synced");
                self.store
                    .mark_sync_result(E::KIND, entity.id(), true, None)?;
                Ok(true)
            }
            Err(err) => {
                warn!(kind = %E::KIND, entity = %entity.id(), error = %err, "sync attempt failed");
                self.store
                    .mark_sync_result(E::KIND, entity.id(), false, Some(err.to_string()))?;
                Ok(false)
            }
        }
    }
}
