//! Auto-sync command implementation.

use std::path::Path;

/// Runs the auto-sync command.
pub fn run(path: &Path, enabled: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(path)?;
    store.set_auto_sync(enabled)?;
    println!("Auto-sync {}", if enabled { "on" } else { "off" });
    Ok(())
}
