//! Add-report command implementation.

use shule_core::{Connectivity, EntityId, PowerSource, Report};
use std::path::Path;

fn parse_connectivity(value: &str) -> Result<Connectivity, String> {
    match value {
        "none" => Ok(Connectivity::None),
        "cellular" => Ok(Connectivity::Cellular),
        "broadband" => Ok(Connectivity::Broadband),
        "satellite" => Ok(Connectivity::Satellite),
        other => Err(format!("unknown connectivity: {other}")),
    }
}

fn parse_power(value: &str) -> Result<PowerSource, String> {
    match value {
        "none" => Ok(PowerSource::None),
        "grid" => Ok(PowerSource::Grid),
        "solar" => Ok(PowerSource::Solar),
        "generator" => Ok(PowerSource::Generator),
        other => Err(format!("unknown power source: {other}")),
    }
}

/// Runs the add-report command.
#[allow(clippy::too_many_arguments)]
pub fn run(
    path: &Path,
    school: &str,
    computers: u32,
    tablets: u32,
    connectivity: &str,
    power: &str,
    notes: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let school_id =
        EntityId::parse(school).ok_or_else(|| format!("invalid school id: {school}"))?;

    let store = super::open_store(path)?;
    if store.site(school_id).is_none() {
        return Err(format!("no site with id {school_id}").into());
    }

    let mut report = Report::new(school_id);
    report.computers = computers;
    report.tablets = tablets;
    report.connectivity = parse_connectivity(connectivity)?;
    report.power = parse_power(power)?;
    report.notes = notes;
    let id = report.id;

    store.add_report(report)?;
    println!("Added report {id} for school {school_id} (unsynced)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_values() {
        assert_eq!(
            parse_connectivity("cellular").unwrap(),
            Connectivity::Cellular
        );
        assert_eq!(parse_power("solar").unwrap(), PowerSource::Solar);
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(parse_connectivity("5g").is_err());
        assert!(parse_power("wind").is_err());
    }
}
