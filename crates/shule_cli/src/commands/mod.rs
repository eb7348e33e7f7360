//! CLI command implementations.

pub mod add_report;
pub mod add_site;
pub mod auto_sync;
pub mod export;
pub mod inspect;
pub mod list;
pub mod log;
pub mod sync;

use shule_core::SurveyStore;
use shule_persist::FileBackend;
use std::path::Path;
use tracing::debug;

/// Opens (or creates) the survey store at the given snapshot path.
pub(crate) fn open_store(path: &Path) -> Result<SurveyStore, Box<dyn std::error::Error>> {
    debug!(path = %path.display(), "opening survey store");
    let backend = FileBackend::open_with_create_dirs(path)?;
    Ok(SurveyStore::open(Box::new(backend))?)
}
