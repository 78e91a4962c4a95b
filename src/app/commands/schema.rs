//! `schema`: field descriptors of a pipeline.

use super::schema_ops;
use crate::domain::{AppError, FieldDescriptor, PipelineKind};

/// One leaf row of the flattened schema listing.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRow {
    pub path: String,
    pub kind: String,
    pub default: String,
}

pub fn execute(pipeline: PipelineKind) -> Result<FieldDescriptor, AppError> {
    Ok(schema_ops(pipeline)?.describe())
}

/// Leaf fields as `path / kind / default` rows.
pub fn rows(descriptor: &FieldDescriptor) -> Vec<SchemaRow> {
    descriptor
        .leaves()
        .into_iter()
        .map(|(path, field)| SchemaRow {
            path,
            kind: field.kind.label().to_string(),
            default: field.default.to_string(),
        })
        .collect()
}
