use crate::app::config::ToolConfig;
use crate::ports::ConfigStore;

/// Application context holding dependencies for command execution.
pub struct AppContext<C: ConfigStore> {
    store: C,
    config: ToolConfig,
}

impl<C: ConfigStore> AppContext<C> {
    pub fn new(store: C, config: ToolConfig) -> Self {
        Self { store, config }
    }

    /// Get a reference to the configuration store.
    pub fn store(&self) -> &C {
        &self.store
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }
}
