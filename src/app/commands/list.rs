//! `list`: summaries of stored configurations.

use serde::Serialize;
use tracing::warn;

use crate::app::AppContext;
use crate::domain::{AppError, PipelineKind, SchemaVersion, StoredConfig};
use crate::ports::{ConfigId, ConfigStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub id: String,
    pub pipeline: PipelineKind,
    pub version: String,
    /// Stored under an older major (or unreadable) version; re-ingest before use.
    pub legacy: bool,
}

/// List stored configurations, optionally filtered by pipeline.
///
/// Documents that fail to load are skipped with a warning.
pub fn execute<C: ConfigStore>(
    ctx: &AppContext<C>,
    pipeline: Option<PipelineKind>,
) -> Result<Vec<ListEntry>, AppError> {
    let mut entries = Vec::new();
    for id in ctx.store().list()? {
        match ctx.store().load(&id) {
            Ok(stored) if pipeline.is_none_or(|kind| kind == stored.pipeline) => {
                entries.push(entry(&id, stored));
            }
            Ok(_) => {}
            Err(err) => warn!(id = %id, error = %err, "skipping unreadable configuration"),
        }
    }
    Ok(entries)
}

fn entry(id: &ConfigId, stored: StoredConfig) -> ListEntry {
    let current = SchemaVersion::current();
    let legacy = stored.schema_version().is_none_or(|version| version.major() < current.major());
    ListEntry { id: id.to_string(), pipeline: stored.pipeline, version: stored.version, legacy }
}
