//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together context creation
//! and command execution.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::adapters::FilesystemConfigStore;
use crate::app::config::ToolConfig;
use crate::app::{
    AppContext,
    commands::{defaults, detect, import, list, save, schema, show, steps},
};
use crate::domain::{FieldDescriptor, PipelineKind, StoredConfig};
use crate::ports::ConfigId;

pub use crate::app::commands::detect::DetectReport;
pub use crate::app::commands::list::ListEntry;
pub use crate::app::commands::save::SaveOutcome;
pub use crate::app::commands::schema::SchemaRow;
pub use crate::app::commands::{IngestReport, StepView};
pub use crate::domain::AppError;

/// Create an `AppContext` rooted at `path`, reading `confwiz.toml` there.
pub(crate) fn create_context(path: &Path) -> Result<AppContext<FilesystemConfigStore>, AppError> {
    let config = ToolConfig::load(path)?;
    let store = FilesystemConfigStore::new(config.store_dir(path));
    Ok(AppContext::new(store, config))
}

/// Tool configuration of the current directory.
pub fn tool_config() -> Result<ToolConfig, AppError> {
    ToolConfig::load(&std::env::current_dir()?)
}

/// Resolved defaults of a pipeline as JSON.
pub fn defaults(pipeline: PipelineKind) -> Result<Value, AppError> {
    defaults::execute(pipeline)
}

/// Field descriptor tree of a pipeline.
pub fn schema(pipeline: PipelineKind) -> Result<FieldDescriptor, AppError> {
    schema::execute(pipeline)
}

/// Flattened leaf rows of a pipeline's schema.
pub fn schema_rows(pipeline: PipelineKind) -> Result<Vec<SchemaRow>, AppError> {
    Ok(schema::rows(&schema::execute(pipeline)?))
}

/// Classify a blob as legacy or current for a pipeline.
pub fn detect(pipeline: PipelineKind, raw: &Value) -> Result<DetectReport, AppError> {
    detect::execute(pipeline, raw)
}

/// Run a blob through migration or sanitization.
pub fn import(pipeline: PipelineKind, raw: &Value) -> Result<IngestReport, AppError> {
    import::execute(pipeline, raw)
}

/// Step plan with visibility, evaluated against `raw` or the defaults.
pub fn steps(pipeline: PipelineKind, raw: Option<&Value>) -> Result<Vec<StepView>, AppError> {
    steps::execute(pipeline, raw)
}

/// Ingest and store a configuration in the current directory's store.
pub fn save(
    pipeline: PipelineKind,
    raw: &Value,
    existing: Option<&ConfigId>,
) -> Result<SaveOutcome, AppError> {
    save_at(std::env::current_dir()?, pipeline, raw, existing)
}

/// Ingest and store a configuration in the store configured under `path`.
pub fn save_at(
    path: impl Into<PathBuf>,
    pipeline: PipelineKind,
    raw: &Value,
    existing: Option<&ConfigId>,
) -> Result<SaveOutcome, AppError> {
    let ctx = create_context(&path.into())?;
    save::execute(&ctx, pipeline, raw, existing)
}

/// Load a stored configuration from the current directory's store.
pub fn show(id: &ConfigId, expected: Option<PipelineKind>) -> Result<StoredConfig, AppError> {
    show_at(std::env::current_dir()?, id, expected)
}

pub fn show_at(
    path: impl Into<PathBuf>,
    id: &ConfigId,
    expected: Option<PipelineKind>,
) -> Result<StoredConfig, AppError> {
    let ctx = create_context(&path.into())?;
    show::execute(&ctx, id, expected)
}

/// List stored configurations in the current directory's store.
pub fn list(pipeline: Option<PipelineKind>) -> Result<Vec<ListEntry>, AppError> {
    list_at(std::env::current_dir()?, pipeline)
}

pub fn list_at(
    path: impl Into<PathBuf>,
    pipeline: Option<PipelineKind>,
) -> Result<Vec<ListEntry>, AppError> {
    let ctx = create_context(&path.into())?;
    list::execute(&ctx, pipeline)
}
