//! Add-site command implementation.

use shule_core::Site;
use std::path::Path;

/// Runs the add-site command.
pub fn run(
    path: &Path,
    name: String,
    district: String,
    contact: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(path)?;

    let mut site = Site::new(name, district);
    site.contact = contact;
    site.latitude = latitude;
    site.longitude = longitude;
    let id = site.id;

    store.add_site(site)?;
    println!("Added site {id} (unsynced)");
    Ok(())
}
