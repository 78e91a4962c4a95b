//! `ConfigStore` backed by one JSON file per configuration.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::domain::{AppError, StoredConfig};
use crate::ports::{ConfigId, ConfigStore};

/// Stores `<root>/<id>.json`, pretty-printed.
#[derive(Debug, Clone)]
pub struct FilesystemConfigStore {
    root: PathBuf,
}

impl FilesystemConfigStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &ConfigId) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    /// `<pipeline>-<UTC timestamp>-<first 8 hex of the document digest>`, with a
    /// `-2`, `-3`, ... suffix when that file is already taken.
    fn allocate_id(&self, config: &StoredConfig, document: &str) -> Result<ConfigId, AppError> {
        let stamp = Utc::now().format("%Y%m%d%H%M%S");
        let digest = Sha256::digest(document.as_bytes());
        let short: String = digest.iter().take(4).map(|byte| format!("{:02x}", byte)).collect();
        let base = format!("{}-{}-{}", config.pipeline, stamp, short);

        let mut id = ConfigId::new(&base)?;
        let mut attempt = 1u32;
        while self.path_for(&id).exists() {
            attempt += 1;
            id = ConfigId::new(&format!("{}-{}", base, attempt))?;
        }
        Ok(id)
    }
}

impl ConfigStore for FilesystemConfigStore {
    fn save(&self, existing: Option<&ConfigId>, config: &StoredConfig) -> Result<ConfigId, AppError> {
        let mut document = serde_json::to_string_pretty(config)?;
        document.push('\n');

        let id = match existing {
            Some(id) => {
                if !self.path_for(id).exists() {
                    return Err(AppError::ConfigNotFound(id.to_string()));
                }
                id.clone()
            }
            None => self.allocate_id(config, &document)?,
        };

        fs::create_dir_all(&self.root).map_err(AppError::from)?;
        fs::write(self.path_for(&id), document).map_err(AppError::from)?;
        tracing::debug!(id = %id, root = %self.root.display(), "stored configuration");
        Ok(id)
    }

    fn load(&self, id: &ConfigId) -> Result<StoredConfig, AppError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(AppError::ConfigNotFound(id.to_string()));
        }
        let content = fs::read_to_string(path).map_err(AppError::from)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn list(&self) -> Result<Vec<ConfigId>, AppError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(AppError::from)? {
            let path = entry.map_err(AppError::from)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path.file_stem().and_then(|stem| stem.to_str()).and_then(|stem| ConfigId::new(stem).ok()) {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}
