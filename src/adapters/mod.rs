//! Adapters implementing the domain ports.

pub mod content;
pub mod json_file_store;
pub mod memory_store;

pub use content::{BuiltinContent, LayeredContent, YamlContentDirectory};
pub use json_file_store::JsonFileStore;
pub use memory_store::InMemoryStore;
