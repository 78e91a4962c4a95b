//! `show`: load a stored configuration.

use crate::app::AppContext;
use crate::domain::{AppError, PipelineKind, StoredConfig};
use crate::ports::{ConfigId, ConfigStore};

/// Load `id`, checking its pipeline when `expected` is given.
pub fn execute<C: ConfigStore>(
    ctx: &AppContext<C>,
    id: &ConfigId,
    expected: Option<PipelineKind>,
) -> Result<StoredConfig, AppError> {
    let stored = ctx.store().load(id)?;
    match expected {
        Some(pipeline) if pipeline != stored.pipeline => Err(AppError::PipelineMismatch {
            id: id.to_string(),
            expected: pipeline.to_string(),
            found: stored.pipeline.to_string(),
        }),
        _ => Ok(stored),
    }
}
