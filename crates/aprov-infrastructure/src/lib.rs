//! Infrastructure layer: filesystem paths, configuration and key-value
//! persistence for the aprov client.

pub mod config_service;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use paths::AprovPaths;
pub use storage::{AtomicFile, FileFormat, JsonFileStore, MemoryStore};
