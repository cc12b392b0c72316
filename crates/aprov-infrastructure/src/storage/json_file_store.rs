//! Key-value store persisted as one JSON object on disk.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use aprov_core::error::{AprovError, Result};
use aprov_core::storage::KeyValueStore;

use super::atomic_file::{AtomicFile, FileFormat};

type StateMap = BTreeMap<String, String>;

/// [`KeyValueStore`] backed by a JSON file (`state.json` by default).
///
/// File access runs on the blocking pool; every write is a locked
/// read-modify-write so concurrent processes do not drop each other's keys.
#[derive(Clone)]
pub struct JsonFileStore {
    file: Arc<AtomicFile<StateMap>>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicFile::new(path, FileFormat::Json)),
        }
    }

    async fn blocking<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&AtomicFile<StateMap>) -> Result<R> + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || f(&file))
            .await
            .map_err(|e| AprovError::internal(format!("Failed to join task: {}", e)))?
    }
}

#[async_trait::async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.blocking(move |file| Ok(file.load()?.and_then(|mut map| map.remove(&key))))
            .await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        tracing::debug!("[JsonFileStore] Writing key '{}'", key);
        self.blocking(move |file| {
            file.update(StateMap::new(), |map| {
                map.insert(key, value);
                Ok(())
            })
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        tracing::debug!("[JsonFileStore] Removing key '{}'", key);
        self.blocking(move |file| {
            file.update(StateMap::new(), |map| {
                map.remove(&key);
                Ok(())
            })
        })
        .await
    }
}
