//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random survey data and sync
//! outcome scripts.

use proptest::prelude::*;
use shule_core::{Connectivity, EntityId, PowerSource, Report, Site};
use shule_sync::TransportError;
use uuid::Uuid;

/// Strategy for generating valid entity IDs.
pub fn entity_id_strategy() -> impl Strategy<Value = EntityId> {
    prop::array::uniform16(any::<u8>())
        .prop_map(|bytes| EntityId::from_uuid(Uuid::from_bytes(bytes)))
}

/// Strategy for generating school names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{2,12}( [A-Z][a-z]{2,12}){0,2}").expect("Invalid regex")
}

/// Strategy for generating district names.
pub fn district_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{3,10}").expect("Invalid regex")
}

/// Strategy for generating connectivity levels.
pub fn connectivity_strategy() -> impl Strategy<Value = Connectivity> {
    prop::sample::select(vec![
        Connectivity::None,
        Connectivity::Cellular,
        Connectivity::Broadband,
        Connectivity::Satellite,
    ])
}

/// Strategy for generating power sources.
pub fn power_strategy() -> impl Strategy<Value = PowerSource> {
    prop::sample::select(vec![
        PowerSource::None,
        PowerSource::Grid,
        PowerSource::Solar,
        PowerSource::Generator,
    ])
}

/// Strategy for generating sites with a fresh id and dirty sync fields.
pub fn site_strategy() -> impl Strategy<Value = Site> {
    (
        name_strategy(),
        district_strategy(),
        prop::option::of(name_strategy()),
        prop::option::of(-12.0f64..0.0),
        prop::option::of(29.0f64..41.0),
    )
        .prop_map(|(name, district, contact, latitude, longitude)| {
            let mut site = Site::new(name, district);
            site.contact = contact;
            site.latitude = latitude;
            site.longitude = longitude;
            site
        })
}

/// Strategy for generating reports attached to the given site.
pub fn report_strategy(school_id: EntityId) -> impl Strategy<Value = Report> {
    (
        0u32..500,
        0u32..500,
        connectivity_strategy(),
        power_strategy(),
        prop::option::of(prop::string::string_regex("[a-z ]{0,40}").expect("Invalid regex")),
    )
        .prop_map(move |(computers, tablets, connectivity, power, notes)| {
            let mut report = Report::new(school_id);
            report.computers = computers;
            report.tablets = tablets;
            report.connectivity = connectivity;
            report.power = power;
            report.notes = notes;
            report
        })
}

/// Strategy for generating one scripted transport outcome.
///
/// Failures are drawn from the full error surface so log messages and
/// retryability classification both get exercised.
pub fn outcome_strategy() -> impl Strategy<Value = Result<(), TransportError>> {
    prop_oneof![
        3 => Just(Ok(())),
        1 => Just(Err(TransportError::unreachable("no route to host"))),
        1 => (500u64..30_000).prop_map(|millis| Err(TransportError::Timeout { millis })),
        1 => (500u16..=599).prop_map(|status| Err(TransportError::server(status, "server error"))),
        1 => Just(Err(TransportError::Rejected("validation failed".into()))),
    ]
}

/// Strategy for generating a scripted outcome sequence.
pub fn outcome_script_strategy(
    max_len: usize,
) -> impl Strategy<Value = Vec<Result<(), TransportError>>> {
    prop::collection::vec(outcome_strategy(), 0..max_len)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
