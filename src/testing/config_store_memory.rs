use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::domain::{AppError, StoredConfig};
use crate::ports::{ConfigId, ConfigStore};

/// In-memory config store with sequential ids.
#[derive(Default)]
pub struct MemoryConfigStore {
    pub documents: RefCell<BTreeMap<ConfigId, StoredConfig>>,
    pub saves: RefCell<usize>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn save(&self, existing: Option<&ConfigId>, config: &StoredConfig) -> Result<ConfigId, AppError> {
        *self.saves.borrow_mut() += 1;
        let id = match existing {
            Some(id) if self.documents.borrow().contains_key(id) => id.clone(),
            Some(id) => return Err(AppError::ConfigNotFound(id.to_string())),
            None => ConfigId::new(&format!("{}-{}", config.pipeline, self.documents.borrow().len() + 1))?,
        };
        self.documents.borrow_mut().insert(id.clone(), config.clone());
        Ok(id)
    }

    fn load(&self, id: &ConfigId) -> Result<StoredConfig, AppError> {
        self.documents.borrow().get(id).cloned().ok_or_else(|| AppError::ConfigNotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<ConfigId>, AppError> {
        Ok(self.documents.borrow().keys().cloned().collect())
    }
}
