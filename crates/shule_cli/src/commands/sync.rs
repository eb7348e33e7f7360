//! Sync command implementation.

use shule_sync::{DemoTransport, SyncEngine};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Runs one sync pass against the simulated field network.
pub fn run(path: &Path, failure_rate: f64, instant: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(super::open_store(path)?);

    info!(failure_rate, instant, "starting simulated sync pass");
    let mut transport = DemoTransport::new(failure_rate);
    if instant {
        transport = transport.with_delay(Duration::ZERO, Duration::ZERO);
    }

    let engine = SyncEngine::new(Arc::clone(&store), Arc::new(transport));
    let summary = engine.sync_all()?;

    println!(
        "Sites:   {} synced, {} failed",
        summary.sites.success, summary.sites.failed
    );
    println!(
        "Reports: {} synced, {} failed",
        summary.reports.success, summary.reports.failed
    );
    println!("Took {:.1?}", summary.duration);
    if !summary.is_clean() {
        println!("Failed entities remain unsynced; run sync again to retry.");
    }
    Ok(())
}
