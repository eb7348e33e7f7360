//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores
//! and common seeded scenarios.

use shule_core::{Report, Site, SurveyStore};
use shule_persist::FileBackend;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// A test store with automatic cleanup.
pub struct TestStore {
    /// The store instance.
    pub store: Arc<SurveyStore>,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates a new in-memory test store.
    #[must_use]
    pub fn memory() -> Self {
        Self {
            store: Arc::new(SurveyStore::in_memory()),
            _temp_dir: None,
        }
    }

    /// Creates a new file-backed test store in a temporary directory.
    #[must_use]
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("survey.json");

        let backend =
            FileBackend::open_with_create_dirs(&path).expect("Failed to create snapshot backend");
        let store = SurveyStore::open(Box::new(backend)).expect("Failed to open file store");

        Self {
            store: Arc::new(store),
            _temp_dir: Some(temp_dir),
        }
    }

    /// Returns the snapshot path if file-backed, None if in-memory.
    #[must_use]
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self._temp_dir.as_ref().map(|d| d.path().join("survey.json"))
    }

    /// Returns a cloned handle to the underlying store.
    #[must_use]
    pub fn handle(&self) -> Arc<SurveyStore> {
        Arc::clone(&self.store)
    }
}

impl std::ops::Deref for TestStore {
    type Target = SurveyStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Runs a test with a temporary in-memory store.
///
/// # Example
///
/// ```rust,ignore
/// use shule_testkit::with_temp_store;
///
/// #[test]
/// fn my_test() {
///     with_temp_store(|store| {
///         store.add_site(shule_testkit::sample_site(0)).unwrap();
///         // ... test operations
///     });
/// }
/// ```
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&SurveyStore) -> R,
{
    let store = SurveyStore::in_memory();
    f(&store)
}

/// Creates a sample site with deterministic field content.
///
/// The id is still freshly assigned; only the descriptive fields are
/// derived from `n`.
#[must_use]
pub fn sample_site(n: usize) -> Site {
    let mut site = Site::new(format!("Test School {n}"), format!("District {}", n % 7));
    site.contact = Some(format!("Officer {n}"));
    site
}

/// Creates a sample report for the given site.
#[must_use]
pub fn sample_report(site: &Site, n: usize) -> Report {
    let mut report = Report::new(site.id);
    report.computers = (n as u32) * 3;
    report.tablets = n as u32;
    report.notes = Some(format!("Visit {n}"));
    report
}

/// Creates an in-memory store seeded with dirty sites and reports.
///
/// Every seeded entity is dirty, so a following sync pass attempts
/// `sites * (1 + reports_per_site)` entities.
#[must_use]
pub fn seeded_store(sites: usize, reports_per_site: usize) -> TestStore {
    let test = TestStore::memory();
    for n in 0..sites {
        let site = sample_site(n);
        let report_parent = site.clone();
        test.store.add_site(site).expect("seed site");
        for r in 0..reports_per_site {
            test.store
                .add_report(sample_report(&report_parent, r))
                .expect("seed report");
        }
    }
    test
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_starts_empty() {
        let test = TestStore::memory();
        assert_eq!(test.stats().sites, 0);
        assert!(test.snapshot_path().is_none());
    }

    #[test]
    fn file_store_persists_under_temp_dir() {
        let test = TestStore::file();
        test.add_site(sample_site(1)).unwrap();

        let path = test.snapshot_path().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn seeded_store_counts_match() {
        let test = seeded_store(3, 2);
        let stats = test.stats();
        assert_eq!(stats.sites, 3);
        assert_eq!(stats.reports, 6);
        assert_eq!(stats.unsynced_sites, 3);
        assert_eq!(stats.unsynced_reports, 6);
    }

    #[test]
    fn seeded_reports_reference_seeded_sites() {
        let test = seeded_store(2, 3);
        for report in test.reports() {
            assert!(test.site(report.school_id).is_some());
        }
    }
}
