//! Storage layer: atomic files and key-value stores.

mod atomic_file;
mod json_file_store;
mod memory_store;

pub use atomic_file::{AtomicFile, FileFormat};
pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
