//! Client configuration loaded from `config.toml`.

use serde::{Deserialize, Serialize};

/// Root of `config.toml`. Every section falls back to its defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: LogLevel,
    pub http: HttpSettings,
    pub paging: PagingSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Timeout of the connection probe only; other calls rely on the transport.
    pub probe_timeout_ms: u64,
    /// Ports tried in order when a profile without a port fails to answer.
    pub fallback_ports: Vec<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 10_000,
            fallback_ports: ["8080", "8081", "8090", "9090", "3000"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingSettings {
    pub items_page_size: u32,
    pub item_history_page_size: u32,
}

impl Default for PagingSettings {
    fn default() -> Self {
        Self {
            items_page_size: 10,
            item_history_page_size: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// File name of the key-value state file, relative to the config directory.
    pub state_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            state_file: "state.json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            log_level = "debug"

            [http]
            probe_timeout_ms = 2500
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.http.probe_timeout_ms, 2500);
        assert_eq!(config.http.fallback_ports.len(), 5);
        assert_eq!(config.paging.items_page_size, 10);
        assert_eq!(config.storage.state_file, "state.json");
    }
}
