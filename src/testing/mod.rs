mod config_store_memory;
pub(crate) mod strategies;

#[allow(unused_imports)]
pub use config_store_memory::MemoryConfigStore;
