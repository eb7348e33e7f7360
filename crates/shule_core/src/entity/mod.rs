//! Survey entities and their sync-control fields.

mod id;
mod kind;

pub use id::EntityId;
pub use kind::EntityKind;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock timestamp in milliseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Returns the current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| {
                i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
            });
        Self(millis)
    }

    /// Creates a timestamp from milliseconds since the Unix epoch.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns milliseconds since the Unix epoch.
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Synchronization-control fields embedded in every entity.
///
/// `synced` is true iff the last known server state matches the local
/// state. An entity is *dirty* the instant it diverges from the last
/// confirmed-synced state, whether or not that divergence is ever
/// transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMeta {
    /// True iff the last known server state matches the local state.
    pub synced: bool,
    /// Wall-clock time of the most recent local mutation or sync-status
    /// change.
    pub last_updated: Timestamp,
}

impl SyncMeta {
    /// Creates sync metadata for a freshly mutated (dirty) entity.
    #[must_use]
    pub fn dirty() -> Self {
        Self {
            synced: false,
            last_updated: Timestamp::now(),
        }
    }
}

impl Default for SyncMeta {
    fn default() -> Self {
        Self::dirty()
    }
}

/// Shared interface for sync-field mutation across entity types.
///
/// The entity's only persisted sync state is the binary synced/unsynced
/// flag; a richer "failed" status lives only in the sync log.
pub trait SyncEntity {
    /// The collection this entity type belongs to.
    const KIND: EntityKind;

    /// The entity's unique identifier.
    fn id(&self) -> EntityId;

    /// The sync-control fields.
    fn sync_meta(&self) -> &SyncMeta;

    /// Mutable access to the sync-control fields.
    fn sync_meta_mut(&mut self) -> &mut SyncMeta;

    /// Returns true if the last known server state matches local state.
    fn is_synced(&self) -> bool {
        self.sync_meta().synced
    }

    /// Marks the entity dirty and refreshes its mutation time.
    fn mark_dirty(&mut self) {
        *self.sync_meta_mut() = SyncMeta::dirty();
    }

    /// Records a sync attempt outcome on the entity's flag.
    fn record_sync_outcome(&mut self, success: bool) {
        let meta = self.sync_meta_mut();
        meta.synced = success;
        meta.last_updated = Timestamp::now();
    }
}

/// Internet connectivity available at a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// No connectivity at all.
    #[default]
    None,
    /// Mobile data (2G/3G/4G).
    Cellular,
    /// Fixed-line broadband.
    Broadband,
    /// Satellite link.
    Satellite,
}

impl Connectivity {
    /// The lowercase name used in displays and exports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Cellular => "cellular",
            Self::Broadband => "broadband",
            Self::Satellite => "satellite",
        }
    }
}

/// Primary power source available at a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PowerSource {
    /// No power available.
    #[default]
    None,
    /// National grid connection.
    Grid,
    /// Solar installation.
    Solar,
    /// Diesel or petrol generator.
    Generator,
}

impl PowerSource {
    /// The lowercase name used in displays and exports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Grid => "grid",
            Self::Solar => "solar",
            Self::Generator => "generator",
        }
    }
}

/// A school site captured by a field officer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Unique identifier, assigned on the device.
    pub id: EntityId,
    /// School name.
    pub name: String,
    /// Administrative district.
    pub district: String,
    /// Contact person at the school, if recorded.
    pub contact: Option<String>,
    /// Latitude in decimal degrees, if recorded.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, if recorded.
    pub longitude: Option<f64>,
    /// Sync-control fields.
    pub sync: SyncMeta,
}

impl Site {
    /// Creates a new dirty site with a fresh id.
    pub fn new(name: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            district: district.into(),
            contact: None,
            latitude: None,
            longitude: None,
            sync: SyncMeta::dirty(),
        }
    }
}

impl SyncEntity for Site {
    const KIND: EntityKind = EntityKind::Site;

    fn id(&self) -> EntityId {
        self.id
    }

    fn sync_meta(&self) -> &SyncMeta {
        &self.sync
    }

    fn sync_meta_mut(&mut self) -> &mut SyncMeta {
        &mut self.sync
    }
}

/// An ICT infrastructure report for one school site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Unique identifier, assigned on the device.
    pub id: EntityId,
    /// The site this report describes.
    pub school_id: EntityId,
    /// Number of working computers.
    pub computers: u32,
    /// Number of working tablets.
    pub tablets: u32,
    /// Internet connectivity at the site.
    pub connectivity: Connectivity,
    /// Primary power source at the site.
    pub power: PowerSource,
    /// Free-form observations.
    pub notes: Option<String>,
    /// Sync-control fields.
    pub sync: SyncMeta,
}

impl Report {
    /// Creates a new dirty report for the given site with a fresh id.
    #[must_use]
    pub fn new(school_id: EntityId) -> Self {
        Self {
            id: EntityId::new(),
            school_id,
            computers: 0,
            tablets: 0,
            connectivity: Connectivity::default(),
            power: PowerSource::default(),
            notes: None,
            sync: SyncMeta::dirty(),
        }
    }
}

impl SyncEntity for Report {
    const KIND: EntityKind = EntityKind::Report;

    fn id(&self) -> EntityId {
        self.id
    }

    fn sync_meta(&self) -> &SyncMeta {
        &self.sync
    }

    fn sync_meta_mut(&mut self) -> &mut SyncMeta {
        &mut self.sync
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entities_are_dirty() {
        let site = Site::new("Mwanza Primary", "Mwanza");
        assert!(!site.is_synced());

        let report = Report::new(site.id);
        assert!(!report.is_synced());
        assert_eq!(report.school_id, site.id);
    }

    #[test]
    fn mark_dirty_refreshes_timestamp() {
        let mut site = Site::new("Arusha Secondary", "Arusha");
        site.sync = SyncMeta {
            synced: true,
            last_updated: Timestamp::from_millis(0),
        };

        let before = Timestamp::now();
        site.mark_dirty();

        assert!(!site.is_synced());
        assert!(site.sync.last_updated >= before);
    }

    #[test]
    fn record_sync_outcome_flips_flag() {
        let mut site = Site::new("Dodoma Primary", "Dodoma");

        site.record_sync_outcome(true);
        assert!(site.is_synced());

        site.record_sync_outcome(false);
        assert!(!site.is_synced());
    }

    #[test]
    fn site_serde_roundtrip() {
        let mut site = Site::new("Tabora Girls", "Tabora");
        site.latitude = Some(-5.016);
        site.longitude = Some(32.827);

        let json = serde_json::to_string(&site).unwrap();
        let back: Site = serde_json::from_str(&json).unwrap();
        assert_eq!(back, site);
    }

    #[test]
    fn timestamp_now_is_monotonic_enough() {
        let a = Timestamp::now();
        let b = Timestamp::now();
        assert!(b >= a);
    }
}
