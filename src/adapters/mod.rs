pub mod config_store_filesystem;

pub use config_store_filesystem::FilesystemConfigStore;
