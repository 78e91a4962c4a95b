//! Command implementations, independent of terminal I/O.

pub mod defaults;
pub mod detect;
pub mod import;
pub mod list;
pub mod save;
pub mod schema;
pub mod show;
pub mod steps;

use std::marker::PhantomData;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    AppError, ConfigSchema, Detection, FieldDescriptor, IngestRoute, PipelineKind, PresetSchema,
    WebsiteSchema, WorkflowSchema, describe, ingest, resolve_defaults,
};

/// Ingestion result with the configuration as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub pipeline: PipelineKind,
    pub config: Value,
    pub route: IngestRoute,
    pub detection: Detection,
}

/// One step of a pipeline's plan, as listed by `steps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub ordinal: u8,
    pub title: &'static str,
    pub visible: bool,
    /// Conditional group the step belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<&'static str>,
    /// Field whose value decides the group's visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<&'static str>,
}

/// Schema operations over untyped JSON, selectable at runtime.
pub trait SchemaOps: Sync {
    fn pipeline(&self) -> PipelineKind;

    fn defaults(&self) -> Result<Value, AppError>;

    fn describe(&self) -> FieldDescriptor;

    fn ingest(&self, raw: &Value) -> Result<IngestReport, AppError>;

    /// Full plan with visibility evaluated against `raw` (defaults when absent).
    fn steps(&self, raw: Option<&Value>) -> Vec<StepView>;
}

struct Ops<S>(PhantomData<fn() -> S>);

impl<S: ConfigSchema> SchemaOps for Ops<S> {
    fn pipeline(&self) -> PipelineKind {
        S::PIPELINE
    }

    fn defaults(&self) -> Result<Value, AppError> {
        Ok(serde_json::to_value(resolve_defaults::<S>())?)
    }

    fn describe(&self) -> FieldDescriptor {
        describe::<S>()
    }

    fn ingest(&self, raw: &Value) -> Result<IngestReport, AppError> {
        let ingested = ingest::<S>(raw);
        Ok(IngestReport {
            pipeline: S::PIPELINE,
            config: serde_json::to_value(&ingested.config)?,
            route: ingested.route,
            detection: ingested.detection,
        })
    }

    fn steps(&self, raw: Option<&Value>) -> Vec<StepView> {
        let config = match raw {
            Some(raw) => ingest::<S>(raw).config,
            None => resolve_defaults::<S>(),
        };
        let plan = S::steps();
        plan.steps
            .iter()
            .map(|step| {
                let group = plan.group_of(step.ordinal);
                StepView {
                    ordinal: step.ordinal,
                    title: step.title,
                    visible: plan.is_visible(&config, step.ordinal),
                    group: group.map(|group| group.name),
                    selector: group.map(|group| group.selector),
                }
            })
            .collect()
    }
}

static PRESET_OPS: Ops<PresetSchema> = Ops(PhantomData);
static WORKFLOW_OPS: Ops<WorkflowSchema> = Ops(PhantomData);
static WEBSITE_OPS: Ops<WebsiteSchema> = Ops(PhantomData);

/// Schema operations for a pipeline, or `UnsupportedPipeline` for `game`.
pub fn schema_ops(pipeline: PipelineKind) -> Result<&'static dyn SchemaOps, AppError> {
    match pipeline {
        PipelineKind::Preset => Ok(&PRESET_OPS),
        PipelineKind::Workflow => Ok(&WORKFLOW_OPS),
        PipelineKind::Website => Ok(&WEBSITE_OPS),
        PipelineKind::Game => Err(AppError::UnsupportedPipeline(pipeline.to_string())),
    }
}
