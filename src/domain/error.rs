use std::io;

use thiserror::Error;

/// Library-wide error type for confwiz operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// JSON encoding or decoding failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Tool configuration is present but invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Pipeline name could not be parsed.
    #[error("Invalid pipeline '{name}': must be one of preset, workflow, website, game")]
    InvalidPipeline { name: String },

    /// Pipeline is recognised but has no wizard schema.
    #[error("Pipeline '{0}' has no configuration schema")]
    UnsupportedPipeline(String),

    /// Stored document belongs to a different pipeline.
    #[error("Stored configuration '{id}' is a '{found}' document, expected '{expected}'")]
    PipelineMismatch { id: String, expected: String, found: String },

    /// Stored configuration not found.
    #[error("Configuration '{0}' not found")]
    ConfigNotFound(String),

    /// Configuration failed schema validation.
    #[error("{0}")]
    Validation(String),

    /// A single configuration field violates a semantic rule.
    #[error("{path}: {message}")]
    InvalidField { path: String, message: String },

    /// Interactive prompt failed.
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl AppError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        AppError::Validation(message.into())
    }

    pub fn invalid_field<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        AppError::InvalidField { path: path.into(), message: message.into() }
    }

    /// Dotted field path of a semantic violation.
    pub fn field_path(&self) -> Option<&str> {
        match self {
            AppError::InvalidField { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Provide an `io::ErrorKind`-like view for callers mapping to exit codes.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Json(_)
            | AppError::TomlParse(_)
            | AppError::InvalidConfig(_)
            | AppError::InvalidPipeline { .. }
            | AppError::UnsupportedPipeline(_)
            | AppError::PipelineMismatch { .. }
            | AppError::Validation(_)
            | AppError::InvalidField { .. } => io::ErrorKind::InvalidInput,
            AppError::ConfigNotFound(_) => io::ErrorKind::NotFound,
            AppError::Prompt(_) => io::ErrorKind::Interrupted,
        }
    }
}
