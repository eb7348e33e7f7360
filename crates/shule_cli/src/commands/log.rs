//! Log command implementation.

use std::path::Path;

/// Runs the log command.
pub fn run(path: &Path, limit: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(path)?;
    let entries = store.sync_log();

    if entries.is_empty() {
        println!("No sync attempts recorded.");
        return Ok(());
    }

    let shown = limit.unwrap_or(entries.len());
    for entry in entries.iter().take(shown) {
        match &entry.message {
            Some(message) => println!(
                "{}  {}  {}  {}  - {}",
                entry.timestamp, entry.kind, entry.entity_id, entry.status, message
            ),
            None => println!(
                "{}  {}  {}  {}",
                entry.timestamp, entry.kind, entry.entity_id, entry.status
            ),
        }
    }
    Ok(())
}
