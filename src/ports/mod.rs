mod config_store;

pub use config_store::{ConfigId, ConfigStore};
