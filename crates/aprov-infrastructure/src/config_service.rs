//! Configuration service.
//!
//! Loads [`AppConfig`] from `config.toml` and caches it for the process.

use std::sync::{Arc, RwLock};

use aprov_core::config::AppConfig;
use aprov_core::error::{AprovError, Result};

use crate::paths::AprovPaths;
use crate::storage::{AtomicFile, FileFormat};

/// Loads and caches the client configuration.
///
/// A missing file yields the defaults and is written back so users have a
/// template to edit.
#[derive(Clone)]
pub struct ConfigService {
    paths: AprovPaths,
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    pub fn new(paths: AprovPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn paths(&self) -> &AprovPaths {
        &self.paths
    }

    /// Gets the configuration, loading it from disk if not cached.
    pub fn get_config(&self) -> Result<AppConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|e| AprovError::internal(format!("Config lock poisoned: {}", e)))?;
            if let Some(cached) = read_lock.as_ref() {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load()?;

        let mut write_lock = self
            .config
            .write()
            .map_err(|e| AprovError::internal(format!("Config lock poisoned: {}", e)))?;
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    /// Persists `config` and replaces the cached copy.
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        self.file()?.save(config)?;
        let mut write_lock = self
            .config
            .write()
            .map_err(|e| AprovError::internal(format!("Config lock poisoned: {}", e)))?;
        *write_lock = Some(config.clone());
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load(&self) -> Result<AppConfig> {
        let file = self.file()?;
        match file.load()? {
            Some(config) => {
                tracing::debug!("[ConfigService] Loaded {}", file.path().display());
                Ok(config)
            }
            None => {
                let config = AppConfig::default();
                if let Err(e) = file.save(&config) {
                    tracing::warn!("[ConfigService] Could not write default config: {}", e);
                }
                Ok(config)
            }
        }
    }

    fn file(&self) -> Result<AtomicFile<AppConfig>> {
        Ok(AtomicFile::new(self.paths.config_file()?, FileFormat::Toml))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(AprovPaths::new(Some(temp_dir.path().to_path_buf())));

        let config = service.get_config().unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(temp_dir.path().join("config.toml").exists());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("config.toml"),
            "[paging]\nitems_page_size = 25\n",
        )
        .unwrap();

        let service = ConfigService::new(AprovPaths::new(Some(temp_dir.path().to_path_buf())));
        let config = service.get_config().unwrap();
        assert_eq!(config.paging.items_page_size, 25);
        assert_eq!(config.paging.item_history_page_size, 30);
        assert_eq!(config.http.probe_timeout_ms, 10_000);
    }

    #[test]
    fn test_save_updates_cache() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(AprovPaths::new(Some(temp_dir.path().to_path_buf())));

        let mut config = service.get_config().unwrap();
        config.http.fallback_ports = vec!["9999".into()];
        service.save(&config).unwrap();

        assert_eq!(service.get_config().unwrap().http.fallback_ports, vec!["9999"]);
        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().http.fallback_ports, vec!["9999"]);
    }
}
