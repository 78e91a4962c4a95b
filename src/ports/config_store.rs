//! Persistence port for finished configurations.

use std::fmt;
use std::str::FromStr;

use crate::domain::{AppError, StoredConfig};

/// Stable identifier of a stored configuration.
///
/// Lower-case ASCII letters, digits and `-` only, so an id can never name a
/// path outside the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigId(String);

impl ConfigId {
    pub fn new(value: &str) -> Result<Self, AppError> {
        let valid = !value.is_empty()
            && value.len() <= 128
            && !value.starts_with('-')
            && value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            return Err(AppError::validation(format!("Invalid configuration id '{}'", value)));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ConfigId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigId::new(s)
    }
}

/// Storage for tagged configuration documents.
///
/// Implementations surface failures verbatim and never retry.
pub trait ConfigStore {
    /// Persist a document. With `existing`, overwrite that id, which must exist;
    /// without, allocate a new id.
    fn save(&self, existing: Option<&ConfigId>, config: &StoredConfig) -> Result<ConfigId, AppError>;

    fn load(&self, id: &ConfigId) -> Result<StoredConfig, AppError>;

    /// All stored ids, sorted.
    fn list(&self) -> Result<Vec<ConfigId>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_generated_shape() {
        assert!(ConfigId::new("website-20260101120000-0a1b2c3d").is_ok());
    }

    #[test]
    fn rejects_path_like_ids() {
        for bad in ["", "../etc/passwd", "a/b", "Upper", "-leading", "with space", "x.json"] {
            assert!(ConfigId::new(bad).is_err(), "{bad} accepted");
        }
    }
}
