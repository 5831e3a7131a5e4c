//! Key-value store adapters.

pub mod file;
pub mod memory;

pub use file::JsonFileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
