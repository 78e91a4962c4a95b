//! `detect`: classify a blob as legacy or current.

use serde_json::Value;

use super::schema_ops;
use crate::domain::envelope;
use crate::domain::{AppError, Detection, PipelineKind, VersionTag};

#[derive(Debug, Clone, PartialEq)]
pub struct DetectReport {
    pub pipeline: PipelineKind,
    pub tag: VersionTag,
    pub detection: Detection,
}

pub fn execute(pipeline: PipelineKind, raw: &Value) -> Result<DetectReport, AppError> {
    let ops = schema_ops(pipeline)?;
    let (tag, _) = envelope::split(raw);
    let detection = ops.ingest(raw)?.detection;
    Ok(DetectReport { pipeline, tag, detection })
}
