use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Base path used when a profile carries an empty one.
pub const DEFAULT_BASE_PATH: &str = "rest";

static IPV4_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .expect("IPv4 pattern is valid")
});

static HOSTNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)*[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$",
    )
    .expect("hostname pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Protocol {
    Http,
    Https,
}

/// Where the Protheus REST server lives.
///
/// The port is kept as typed by the user so validation can report a
/// malformed value instead of losing it during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionProfile {
    pub protocol: Protocol,
    pub address: String,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(alias = "endpoint")]
    pub base_path: String,
}

/// Outcome of [`ConnectionProfile::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ConnectionProfile {
    pub fn new(
        protocol: Protocol,
        address: impl Into<String>,
        port: Option<String>,
        base_path: impl Into<String>,
    ) -> Self {
        Self {
            protocol,
            address: address.into(),
            port,
            base_path: base_path.into(),
        }
    }

    /// Port with surrounding whitespace removed, `None` when blank.
    pub fn port(&self) -> Option<&str> {
        self.port.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    pub fn has_port(&self) -> bool {
        self.port().is_some()
    }

    pub fn with_port(&self, port: impl Into<String>) -> Self {
        Self {
            port: Some(port.into()),
            ..self.clone()
        }
    }

    pub fn without_port(&self) -> Self {
        Self {
            port: None,
            ..self.clone()
        }
    }

    /// Pure, synchronous validation of the profile fields.
    pub fn validate(&self) -> ValidationReport {
        let mut errors = Vec::new();

        let address = self.address.trim();
        if address.is_empty() {
            errors.push("Address is required".to_string());
        } else if !IPV4_RE.is_match(address)
            && !HOSTNAME_RE.is_match(address)
            && address != "localhost"
        {
            errors.push("Invalid address format".to_string());
        }

        if let Some(port) = self.port() {
            match port.parse::<u32>() {
                Ok(p) if (1..=65535).contains(&p) => {}
                _ => errors.push("Port must be between 1 and 65535".to_string()),
            }
        }

        if self.base_path.trim().is_empty() {
            errors.push("Base path is required".to_string());
        }

        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Base URL every REST call is resolved against, without a trailing slash.
    pub fn base_url(&self) -> String {
        let port_part = self.port().map(|p| format!(":{}", p)).unwrap_or_default();
        let base_path = self.base_path.trim().trim_start_matches('/');
        let base_path = if base_path.is_empty() {
            DEFAULT_BASE_PATH
        } else {
            base_path.trim_end_matches('/')
        };
        format!(
            "{}://{}{}/{}",
            self.protocol,
            self.address.trim(),
            port_part,
            base_path
        )
    }

    /// Joins a sub-path onto the base URL.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }
}
