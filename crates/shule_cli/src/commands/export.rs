//! Export command implementation.
//!
//! Emits row-oriented CSV over stdout. This is a plain field enumeration of
//! the store's read path; document layout is an app-shell concern.

use shule_core::EntityKind;
use std::path::Path;

/// Quotes a field if it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn opt_num<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Runs the export command.
pub fn run(path: &Path, kind: EntityKind) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(path)?;

    match kind {
        EntityKind::Site => {
            println!("id,name,district,contact,latitude,longitude,synced,last_updated");
            for site in store.sites() {
                println!(
                    "{},{},{},{},{},{},{},{}",
                    site.id,
                    csv_field(&site.name),
                    csv_field(&site.district),
                    csv_field(site.contact.as_deref().unwrap_or_default()),
                    opt_num(site.latitude),
                    opt_num(site.longitude),
                    site.sync.synced,
                    site.sync.last_updated
                );
            }
        }
        EntityKind::Report => {
            println!("id,school_id,computers,tablets,connectivity,power,notes,synced,last_updated");
            for report in store.reports() {
                println!(
                    "{},{},{},{},{},{},{},{},{}",
                    report.id,
                    report.school_id,
                    report.computers,
                    report.tablets,
                    report.connectivity.as_str(),
                    report.power.as_str(),
                    csv_field(report.notes.as_deref().unwrap_or_default()),
                    report.sync.synced,
                    report.sync.last_updated
                );
            }
        }
    }
    Ok(())
}
