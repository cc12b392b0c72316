use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::profile::ConnectionProfile;
use crate::error::AprovError;

/// Sub-path hit by the reachability probe.
pub const TOKEN_PROBE_PATH: &str = "api/oauth2/v1/token?grant_type=password";

/// Result of one reachability probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProbeResult {
    pub success: bool,
    pub url: Option<String>,
    pub status_code: Option<u16>,
    pub error: Option<String>,
    #[serde(default)]
    pub timed_out: bool,
}

impl ProbeResult {
    pub fn failure(url: Option<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            url,
            status_code: None,
            error: Some(error.into()),
            timed_out: false,
        }
    }

    pub fn timeout(url: Option<String>, error: impl Into<String>) -> Self {
        Self {
            timed_out: true,
            ..Self::failure(url, error)
        }
    }

    /// Converts a failed probe into the matching error.
    pub fn to_error(&self) -> Option<AprovError> {
        if self.success {
            return None;
        }
        let message = self
            .error
            .clone()
            .unwrap_or_else(|| "Connection failed".to_string());
        Some(match self.status_code {
            Some(status) => AprovError::Http { status, message },
            None => AprovError::Transport {
                message,
                timeout: self.timed_out,
            },
        })
    }
}

/// Any answer below 500 proves a Protheus REST server is listening, even a 401
/// for the credential-less token request.
pub fn is_probe_success_status(status: u16) -> bool {
    (200..500).contains(&status)
}

/// Issues a network round trip against a profile.
#[async_trait]
pub trait ConnectionProbe: Send + Sync {
    /// Probes the token endpoint of `profile`.
    ///
    /// Never returns an error: transport failures are reported through
    /// [`ProbeResult::error`], with timeouts worded distinctly.
    async fn probe(&self, profile: &ConnectionProfile, timeout: Duration) -> ProbeResult;
}
