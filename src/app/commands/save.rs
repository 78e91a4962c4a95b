//! `save`: ingest a blob and persist it under a config id.

use serde_json::Value;
use tracing::info;

use super::schema_ops;
use crate::app::AppContext;
use crate::domain::{AppError, Detection, IngestRoute, PipelineKind, StoredConfig};
use crate::ports::{ConfigId, ConfigStore};

#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub id: ConfigId,
    pub route: IngestRoute,
    pub detection: Detection,
}

/// Ingest `raw` for `pipeline` and store the v2 result.
///
/// With `existing`, the stored document is replaced; the id must already exist
/// and hold the same pipeline.
pub fn execute<C: ConfigStore>(
    ctx: &AppContext<C>,
    pipeline: PipelineKind,
    raw: &Value,
    existing: Option<&ConfigId>,
) -> Result<SaveOutcome, AppError> {
    let report = schema_ops(pipeline)?.ingest(raw)?;

    if let Some(id) = existing {
        let current = ctx.store().load(id)?;
        if current.pipeline != pipeline {
            return Err(AppError::PipelineMismatch {
                id: id.to_string(),
                expected: pipeline.to_string(),
                found: current.pipeline.to_string(),
            });
        }
    }

    let stored = StoredConfig::new(pipeline, &report.config)?;
    let id = ctx.store().save(existing, &stored)?;
    info!(id = %id, route = %report.route, "saved configuration");
    Ok(SaveOutcome { id, route: report.route, detection: report.detection })
}
