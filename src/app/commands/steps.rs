//! `steps`: the step plan with visibility for a configuration.

use serde_json::Value;

use super::{StepView, schema_ops};
use crate::domain::{AppError, PipelineKind};

pub fn execute(pipeline: PipelineKind, raw: Option<&Value>) -> Result<Vec<StepView>, AppError> {
    Ok(schema_ops(pipeline)?.steps(raw))
}
