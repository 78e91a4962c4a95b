//! Version tag carried alongside persisted configurations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::version::{Generation, SchemaVersion};
use crate::domain::{AppError, PipelineKind};

pub const TYPE_KEY: &str = "type";
pub const VERSION_KEY: &str = "version";

/// Out-of-band `type` / `version` pair found at the top level of a blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionTag {
    /// Raw discriminator, kept even when it names no known pipeline.
    pub pipeline: Option<String>,
    pub version: Option<SchemaVersion>,
}

impl VersionTag {
    pub fn is_empty(&self) -> bool {
        self.pipeline.is_none() && self.version.is_none()
    }

    pub fn pipeline_kind(&self) -> Option<PipelineKind> {
        self.pipeline.as_deref().and_then(PipelineKind::from_name)
    }

    /// Generation declared by the tag, if it carries a parsable version.
    pub fn generation(&self) -> Option<Generation> {
        self.version.as_ref().map(SchemaVersion::generation)
    }
}

/// Peel the version tag off a raw blob.
///
/// Non-object input is returned unchanged with an empty tag. The tag keys are
/// always removed from the body, even when their values are unusable.
pub fn split(raw: &Value) -> (VersionTag, Value) {
    let Value::Object(map) = raw else {
        return (VersionTag::default(), raw.clone());
    };
    let mut body = map.clone();
    let pipeline = body.remove(TYPE_KEY).and_then(|value| value.as_str().map(str::to_string));
    let version = body.remove(VERSION_KEY).and_then(|value| match value {
        Value::String(text) => SchemaVersion::parse(&text),
        Value::Number(number) => SchemaVersion::parse(&number.to_string()),
        _ => None,
    });
    (VersionTag { pipeline, version }, Value::Object(body))
}

/// A configuration as persisted server-side: the tag plus the flattened body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(rename = "type")]
    pub pipeline: PipelineKind,
    pub version: String,
    #[serde(flatten)]
    pub config: Map<String, Value>,
}

impl StoredConfig {
    /// Wrap a current-generation configuration.
    pub fn new<T: Serialize>(pipeline: PipelineKind, config: &T) -> Result<Self, AppError> {
        match serde_json::to_value(config)? {
            Value::Object(config) => {
                Ok(Self { pipeline, version: SchemaVersion::CURRENT.to_string(), config })
            }
            other => Err(AppError::validation(format!(
                "configuration must serialize to an object, got {}",
                kind_name(&other)
            ))),
        }
    }

    /// Bare configuration without the tag, as written by exports.
    pub fn export(&self) -> Value {
        Value::Object(self.config.clone())
    }

    /// Full document including the tag.
    pub fn to_document(&self) -> Result<Value, AppError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn schema_version(&self) -> Option<SchemaVersion> {
        SchemaVersion::parse(&self.version)
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
