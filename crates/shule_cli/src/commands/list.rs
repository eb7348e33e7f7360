//! List command implementation.

use shule_core::EntityKind;
use std::path::Path;

/// Runs the list command.
pub fn run(
    path: &Path,
    kind: EntityKind,
    unsynced_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(path)?;

    match kind {
        EntityKind::Site => {
            let sites = if unsynced_only {
                store.unsynced_sites()
            } else {
                store.sites()
            };
            if sites.is_empty() {
                println!("No sites.");
                return Ok(());
            }
            for site in sites {
                let flag = if site.sync.synced { "synced" } else { "dirty" };
                println!("{}  {}  ({}) [{flag}]", site.id, site.name, site.district);
            }
        }
        EntityKind::Report => {
            let reports = if unsynced_only {
                store.unsynced_reports()
            } else {
                store.reports()
            };
            if reports.is_empty() {
                println!("No reports.");
                return Ok(());
            }
            for report in reports {
                let flag = if report.sync.synced { "synced" } else { "dirty" };
                println!(
                    "{}  school={}  computers={} tablets={} [{flag}]",
                    report.id, report.school_id, report.computers, report.tablets
                );
            }
        }
    }
    Ok(())
}
