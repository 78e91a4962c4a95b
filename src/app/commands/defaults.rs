//! `defaults`: the resolved default configuration of a pipeline.

use serde_json::Value;

use super::schema_ops;
use crate::domain::{AppError, PipelineKind};

pub fn execute(pipeline: PipelineKind) -> Result<Value, AppError> {
    schema_ops(pipeline)?.defaults()
}
