//! Tool configuration read from `confwiz.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{AppError, PipelineKind, WizardOptions};

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "confwiz.toml";

/// Environment variable overriding `[log] level`.
pub const LOG_ENV: &str = "CONFWIZ_LOG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl ToolConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.store.validate()?;
        self.wizard.validate()?;
        self.log.validate()?;
        Ok(())
    }

    /// Parse and validate TOML content.
    pub fn parse(content: &str) -> Result<Self, AppError> {
        let config: ToolConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `confwiz.toml` from `dir`; a missing file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(AppError::from)?;
        Self::parse(&content)
    }

    /// Store directory, resolved against `base` when relative.
    pub fn store_dir(&self, base: &Path) -> PathBuf {
        if self.store.dir.is_absolute() { self.store.dir.clone() } else { base.join(&self.store.dir) }
    }

    pub fn wizard_options(&self) -> WizardOptions {
        WizardOptions { relocate_hidden_step: self.wizard.relocate_hidden_step }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory holding stored configurations.
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { dir: default_store_dir() }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.dir.as_os_str().is_empty() {
            return Err(AppError::InvalidConfig("store.dir must not be empty".to_string()));
        }
        Ok(())
    }
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(".confwiz")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WizardConfig {
    /// Pipeline used by `wizard` when none is given.
    #[serde(default)]
    pub default_pipeline: PipelineKind,
    #[serde(default = "default_true")]
    pub relocate_hidden_step: bool,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self { default_pipeline: PipelineKind::default(), relocate_hidden_step: default_true() }
    }
}

impl WizardConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.default_pipeline.has_schema() {
            return Err(AppError::InvalidConfig(format!(
                "wizard.default_pipeline '{}' has no wizard schema",
                self.default_pipeline
            )));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `warn` or `confwiz=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: LogFormat::default() }
    }
}

impl LogConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        tracing_subscriber::EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|err| AppError::InvalidConfig(format!("log.level '{}': {}", self.level, err)))
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_uses_defaults() {
        let config = ToolConfig::parse("").unwrap();
        assert_eq!(config.store.dir, PathBuf::from(".confwiz"));
        assert_eq!(config.wizard.default_pipeline, PipelineKind::Preset);
        assert!(config.wizard.relocate_hidden_step);
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.log.format, LogFormat::Text);
    }

    #[test]
    fn parses_all_sections() {
        let config = ToolConfig::parse(
            r#"
[store]
dir = "saved"

[wizard]
default_pipeline = "website"
relocate_hidden_step = false

[log]
level = "confwiz=debug"
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(config.store.dir, PathBuf::from("saved"));
        assert_eq!(config.wizard.default_pipeline, PipelineKind::Website);
        assert!(!config.wizard_options().relocate_hidden_step);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(ToolConfig::parse("[store]\npath = \"x\"\n"), Err(AppError::TomlParse(_))));
    }

    #[test]
    fn rejects_game_as_default_pipeline() {
        let err = ToolConfig::parse("[wizard]\ndefault_pipeline = \"game\"\n").unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_bad_log_directive() {
        assert!(ToolConfig::parse("[log]\nlevel = \"confwiz=loud\"\n").is_err());
    }

    #[test]
    fn load_without_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ToolConfig::load(dir.path()).unwrap();
        assert_eq!(config.store_dir(dir.path()), dir.path().join(".confwiz"));
    }
}
