//! Path management for aprov configuration and state files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/aprov/             # Config directory
//! ├── config.toml              # Client configuration
//! └── state.json               # Persisted stores (auth, connection, branch, module)
//! ```

use std::path::{Path, PathBuf};

use aprov_core::error::{AprovError, Result};

const APP_DIR: &str = "aprov";
const CONFIG_FILE: &str = "config.toml";

/// Resolves where aprov keeps its files.
///
/// A base override replaces the platform config directory entirely, which is
/// how the CLI's `--config-dir` flag and the tests isolate their state.
#[derive(Debug, Clone, Default)]
pub struct AprovPaths {
    base_override: Option<PathBuf>,
}

impl AprovPaths {
    pub fn new(base_override: Option<PathBuf>) -> Self {
        Self { base_override }
    }

    /// Returns the config directory (e.g. `~/.config/aprov/`).
    ///
    /// Fails only when no override is set and the platform reports no
    /// config directory.
    pub fn config_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base_override {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| AprovError::config("Cannot find config directory"))
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE))
    }

    /// Path of the key-value state file; absolute names are used as-is.
    pub fn state_file(&self, file_name: &str) -> Result<PathBuf> {
        let candidate = Path::new(file_name);
        if candidate.is_absolute() {
            return Ok(candidate.to_path_buf());
        }
        Ok(self.config_dir()?.join(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let paths = AprovPaths::new(Some(PathBuf::from("/tmp/aprov-test")));
        assert_eq!(paths.config_dir().unwrap(), PathBuf::from("/tmp/aprov-test"));
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/aprov-test/config.toml")
        );
        assert_eq!(
            paths.state_file("state.json").unwrap(),
            PathBuf::from("/tmp/aprov-test/state.json")
        );
    }

    #[test]
    fn test_absolute_state_file() {
        let paths = AprovPaths::new(Some(PathBuf::from("/tmp/a")));
        assert_eq!(
            paths.state_file("/var/lib/state.json").unwrap(),
            PathBuf::from("/var/lib/state.json")
        );
    }
}
