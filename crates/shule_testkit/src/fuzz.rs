//! Randomized harnesses for sync passes and store operation sequences.
//!
//! These helpers are written to be driven from property tests or an
//! external fuzzer; every assertion here is an invariant that must hold
//! for arbitrary inputs.

use crate::fixtures::{sample_report, sample_site};
use shule_core::{EntityKind, SurveyStore, SyncEntity};
use shule_sync::{ScriptedTransport, SyncEngine, SyncSummary, TransportError};
use std::sync::Arc;

/// Seeds a store, runs one scripted sync pass, and checks attempt
/// accounting.
///
/// The store gets `sites` dirty sites with `reports_per_site` dirty
/// reports each. Outcomes beyond the script default to success. After the
/// pass this asserts:
/// - every dirty entity was attempted exactly once
/// - `success + failed` covers every attempt
/// - exactly the failed entities remain dirty
pub fn run_scripted_pass(
    sites: usize,
    reports_per_site: usize,
    script: &[Result<(), TransportError>],
) -> SyncSummary {
    let store = Arc::new(SurveyStore::in_memory());
    let mut expected = 0usize;
    for n in 0..sites {
        let site = sample_site(n);
        let parent = site.clone();
        store.add_site(site).expect("seed site");
        expected += 1;
        for r in 0..reports_per_site {
            store.add_report(sample_report(&parent, r)).expect("seed report");
            expected += 1;
        }
    }

    let transport = ScriptedTransport::always_succeeds();
    for outcome in script {
        transport.enqueue(outcome.clone());
    }

    let engine = SyncEngine::new(Arc::clone(&store), Arc::new(transport));
    let summary = engine.sync_all().expect("in-memory persist cannot fail");

    assert_eq!(summary.attempted() as usize, expected);
    assert_eq!(summary.attempted(), summary.failed() + summary.sites.success + summary.reports.success);

    let stats = store.stats();
    assert_eq!(
        stats.unsynced_sites + stats.unsynced_reports,
        summary.failed() as usize
    );
    summary
}

/// Drives arbitrary store operations from a byte stream.
///
/// Every operation sequence must leave the store consistent: no report may
/// reference a deleted site's id once that site has been cascade-deleted,
/// and no operation may panic.
pub fn fuzz_store_operations(data: &[u8]) {
    let store = SurveyStore::in_memory();
    let mut counter = 0usize;

    for &byte in data {
        match byte % 6 {
            0 => {
                counter += 1;
                store.add_site(sample_site(counter)).expect("add site");
            }
            1 => {
                if let Some(site) = pick(&store.sites(), byte) {
                    store
                        .add_report(sample_report(&site, counter))
                        .expect("add report");
                }
            }
            2 => {
                if let Some(mut site) = pick(&store.sites(), byte) {
                    site.name.push('!');
                    store.update_site(site).expect("update site");
                }
            }
            3 => {
                if let Some(site) = pick(&store.sites(), byte) {
                    store.delete_site(site.id).expect("delete site");
                    assert!(store.reports_by_school(site.id).is_empty());
                }
            }
            4 => {
                if let Some(report) = pick(&store.reports(), byte) {
                    store.delete_report(report.id).expect("delete report");
                }
            }
            _ => {
                if let Some(site) = pick(&store.sites(), byte) {
                    let success = byte & 1 == 0;
                    store
                        .mark_sync_result(EntityKind::Site, site.id, success, None)
                        .expect("mark result");
                    assert_eq!(store.site(site.id).expect("still present").is_synced(), success);
                }
            }
        }
    }

    // No cascade may have left an orphan behind.
    for report in store.reports() {
        assert!(store.site(report.school_id).is_some());
    }
}

fn pick<T: Clone>(items: &[T], byte: u8) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[byte as usize % items.len()].clone())
    }
}
