//! Property and end-to-end tests for sync passes.

use proptest::prelude::*;
use shule_core::{EntityKind, SurveyStore, SyncEntity, SyncStatus};
use shule_persist::FileBackend;
use shule_sync::{ScriptedTransport, SyncEngine, TransportError};
use shule_testkit::fixtures::{sample_report, sample_site, seeded_store, TestStore};
use shule_testkit::fuzz::run_scripted_pass;
use shule_testkit::generators::{outcome_script_strategy, PropTestConfig};
use std::sync::Arc;

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    /// For arbitrary outcome scripts, a pass attempts every dirty entity
    /// exactly once and `success + failed` accounts for all of them.
    /// The harness asserts the accounting internally.
    #[test]
    fn partial_failure_accounting(
        sites in 0usize..6,
        reports_per_site in 0usize..4,
        script in outcome_script_strategy(40),
    ) {
        let summary = run_scripted_pass(sites, reports_per_site, &script);
        prop_assert_eq!(summary.attempted() as usize, sites * (1 + reports_per_site));
    }

    /// However the first pass went, a fully successful follow-up pass
    /// drains the dirty set, and the pass after that is a no-op.
    #[test]
    fn resync_reaches_fixed_point(
        sites in 1usize..5,
        reports_per_site in 0usize..3,
        script in outcome_script_strategy(20),
    ) {
        let test = seeded_store(sites, reports_per_site);
        let store = test.handle();

        let first_transport = ScriptedTransport::always_succeeds();
        for outcome in &script {
            first_transport.enqueue(outcome.clone());
        }
        let first = SyncEngine::new(Arc::clone(&store), Arc::new(first_transport));
        first.sync_all().unwrap();

        let second =
            SyncEngine::new(Arc::clone(&store), Arc::new(ScriptedTransport::always_succeeds()));
        let summary = second.sync_all().unwrap();
        prop_assert!(summary.is_clean());
        prop_assert_eq!(store.stats().unsynced_sites, 0);
        prop_assert_eq!(store.stats().unsynced_reports, 0);

        let third = second.sync_all().unwrap();
        prop_assert_eq!(third.attempted(), 0);
    }

    /// Entities synced earlier in a pass keep their state when later
    /// entities fail.
    #[test]
    fn earlier_successes_survive_later_failures(failures in 1usize..5) {
        let store = Arc::new(SurveyStore::in_memory());
        let lucky = sample_site(0);
        let lucky_id = lucky.id;
        store.add_site(lucky).unwrap();

        let mut unlucky_ids = Vec::new();
        for n in 0..failures {
            let site = sample_site(n + 1);
            unlucky_ids.push(site.id);
            store.add_site(site).unwrap();
        }

        let transport = ScriptedTransport::always_fails(TransportError::unreachable("mast down"));
        transport.enqueue_ok();

        let engine = SyncEngine::new(Arc::clone(&store), Arc::new(transport));
        let summary = engine.sync_all().unwrap();

        prop_assert_eq!(summary.sites.success, 1);
        prop_assert_eq!(summary.sites.failed as usize, failures);
        prop_assert!(store.site(lucky_id).unwrap().is_synced());
        for id in unlucky_ids {
            prop_assert!(!store.site(id).unwrap().is_synced());
        }
    }
}

/// A partial failure on a file-backed store leaves a durable record: after
/// reopening from disk the failed entity is still dirty and the log still
/// carries the failure message.
#[test]
fn partial_failure_survives_reopen() {
    let test = TestStore::file();
    let store = test.handle();

    let site = sample_site(0);
    let site_id = site.id;
    store.add_site(site.clone()).unwrap();
    store.add_report(sample_report(&site, 0)).unwrap();

    let transport = ScriptedTransport::always_succeeds();
    transport.enqueue_ok();
    transport.enqueue_err(TransportError::server(503, "maintenance window"));

    let engine = SyncEngine::new(Arc::clone(&store), Arc::new(transport));
    let summary = engine.sync_all().unwrap();
    assert_eq!(summary.sites.success, 1);
    assert_eq!(summary.reports.failed, 1);

    let path = test.snapshot_path().unwrap();
    let reopened = SurveyStore::open(Box::new(FileBackend::open(&path).unwrap())).unwrap();

    assert!(reopened.site(site_id).unwrap().is_synced());
    assert_eq!(reopened.stats().unsynced_reports, 1);

    let log = reopened.sync_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].kind, EntityKind::Report);
    assert_eq!(log[0].status, SyncStatus::Failed);
    assert!(log[0].message.as_deref().unwrap().contains("maintenance window"));
    assert_eq!(log[1].kind, EntityKind::Site);
    assert_eq!(log[1].status, SyncStatus::Synced);
}

/// A deleted entity's failed attempts remain visible in the log after
/// further passes.
#[test]
fn log_history_outlives_deleted_entities() {
    let store = Arc::new(SurveyStore::in_memory());
    let site = sample_site(0);
    let site_id = site.id;
    store.add_site(site).unwrap();

    let transport = ScriptedTransport::always_succeeds();
    transport.enqueue_err(TransportError::unreachable("offline"));
    let engine = SyncEngine::new(Arc::clone(&store), Arc::new(transport));
    engine.sync_all().unwrap();

    store.delete_site(site_id).unwrap();
    engine.sync_all().unwrap();

    let log = store.sync_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].entity_id, site_id);
    assert_eq!(log[0].status, SyncStatus::Failed);
}
