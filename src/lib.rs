//! confwiz: wizard-driven application configurations with legacy import,
//! sanitization and migration.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use adapters::FilesystemConfigStore;
pub use app::api::{
    DetectReport, IngestReport, ListEntry, SaveOutcome, SchemaRow, StepView, defaults, detect,
    import, list, list_at, save, save_at, schema, schema_rows, show, show_at, steps, tool_config,
};
pub use app::config::{LogFormat, ToolConfig};
pub use domain::{
    AppError, ConfigSchema, Detection, FieldDescriptor, FieldKind, ImportOutcome, ImportTicket,
    IngestRoute, Ingested, LegacyReason, PipelineKind, PresetConfig, PresetSchema, SchemaVersion,
    StoredConfig, WebsiteConfig, WebsiteSchema, Wizard, WizardEvent, WizardOptions, WorkflowConfig,
    WorkflowSchema, detect as detect_legacy, ingest, is_legacy_shape, migrate_legacy_to_v2,
    resolve_defaults, sanitize_imported_config,
};
pub use ports::{ConfigId, ConfigStore};
