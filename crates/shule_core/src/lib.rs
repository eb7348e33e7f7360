//! # Shule Core
//!
//! Entity store, sync log, and domain model for Shule - an offline-first
//! data-collection system for school ICT infrastructure surveys.
//!
//! This crate provides:
//! - Typed survey entities ([`Site`], [`Report`]) with embedded
//!   sync-control fields ([`SyncMeta`])
//! - The [`SurveyStore`]: single source of truth for sites, reports, and
//!   the sync log, persisted through a snapshot backend
//! - The bounded, newest-first [`SyncLog`] of sync attempt outcomes
//!
//! ## Key Invariants
//!
//! - Every local mutation marks the entity dirty (`synced = false`) and
//!   refreshes `last_updated` before any sync attempt
//! - Deleting a site cascades to its reports in the same critical section;
//!   no report with a dangling `school_id` survives
//! - The sync log holds at most the 100 most recent entries, newest first
//! - `mark_sync_result` appends the log entry before flipping the entity's
//!   flag (log-then-mutate), so a crash mid-operation leaves the log
//!   consistent with the attempt having been made
//! - Every mutating store call saves the full snapshot before returning

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entity;
mod error;
mod log;
mod store;

pub use entity::{
    Connectivity, EntityId, EntityKind, PowerSource, Report, Site, SyncEntity, SyncMeta, Timestamp,
};
pub use error::{CoreError, CoreResult};
pub use log::{SyncLog, SyncLogEntry, SyncStatus, SYNC_LOG_CAPACITY};
pub use store::{StoreStats, SurveyStore};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
