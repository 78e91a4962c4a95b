pub mod coerce;
pub mod envelope;
pub mod error;
pub mod migration;
pub mod pipeline;
pub mod sanitize;
pub mod schema;
pub mod steps;
pub mod version;
pub mod wizard;

pub use envelope::{StoredConfig, VersionTag};
pub use error::AppError;
pub use migration::{Detection, IngestRoute, Ingested, LegacyReason, detect, ingest, is_legacy_shape, migrate_legacy_to_v2};
pub use pipeline::PipelineKind;
pub use sanitize::sanitize_imported_config;
pub use schema::{
    ConfigSchema, FieldDescriptor, FieldKind, PresetConfig, PresetSchema, WebsiteConfig, WebsiteSchema,
    WorkflowConfig, WorkflowSchema, describe, resolve_defaults, validate_value,
};
pub use steps::{StepPlan, WizardStep};
pub use version::{Generation, SchemaVersion};
pub use wizard::{ImportOutcome, ImportTicket, SubscriptionId, Wizard, WizardEvent, WizardOptions};
