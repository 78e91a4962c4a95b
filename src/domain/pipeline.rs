use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Generation pipelines that produce a configuration document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    /// App presets.
    #[default]
    Preset,
    /// Automation workflows.
    Workflow,
    /// Websites.
    Website,
    /// Games. Recognised in stored documents, no wizard schema.
    Game,
}

impl PipelineKind {
    /// All pipelines in discriminator order.
    pub const ALL: [PipelineKind; 4] =
        [PipelineKind::Preset, PipelineKind::Workflow, PipelineKind::Website, PipelineKind::Game];

    /// Discriminator written to the `type` field of stored documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineKind::Preset => "preset",
            PipelineKind::Workflow => "workflow",
            PipelineKind::Website => "website",
            PipelineKind::Game => "game",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            PipelineKind::Preset => "App preset",
            PipelineKind::Workflow => "Workflow",
            PipelineKind::Website => "Website",
            PipelineKind::Game => "Game",
        }
    }

    /// Whether this crate ships a wizard schema for the pipeline.
    pub fn has_schema(&self) -> bool {
        !matches!(self, PipelineKind::Game)
    }

    /// Parse a pipeline from a discriminator or one of its aliases.
    pub fn from_name(name: &str) -> Option<PipelineKind> {
        match name.trim().to_lowercase().as_str() {
            "preset" | "presets" | "app" => Some(PipelineKind::Preset),
            "workflow" | "workflows" | "flow" => Some(PipelineKind::Workflow),
            "website" | "websites" | "site" | "web" => Some(PipelineKind::Website),
            "game" | "games" => Some(PipelineKind::Game),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PipelineKind::from_name(s).ok_or_else(|| AppError::InvalidPipeline { name: s.to_string() })
    }
}
