//! Inspect command implementation.

use std::path::Path;

/// Runs the inspect command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(path)?;
    let stats = store.stats();

    println!("Store: {}", path.display());
    println!("  Sites:       {} ({} unsynced)", stats.sites, stats.unsynced_sites);
    println!(
        "  Reports:     {} ({} unsynced)",
        stats.reports, stats.unsynced_reports
    );
    println!("  Log entries: {}", stats.log_entries);
    println!("  Auto-sync:   {}", if stats.auto_sync { "on" } else { "off" });
    Ok(())
}
