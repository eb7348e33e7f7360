//! Entity kind discriminant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two survey entity collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A school site.
    Site,
    /// An ICT infrastructure report for a site.
    Report,
}

impl EntityKind {
    /// The name used in sync log entries and composed entry ids.
    #[must_use]
    pub const fn log_name(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Report => "report",
        }
    }

    /// The remote resource name used by the transport upsert.
    ///
    /// The remote API calls sites "schools".
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::Site => "schools",
            Self::Report => "reports",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.log_name())
    }
}
