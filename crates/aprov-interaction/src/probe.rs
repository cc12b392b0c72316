//! Reachability probe against the OAuth2 token endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use aprov_core::connection::{
    ConnectionProbe, ConnectionProfile, ProbeResult, TOKEN_PROBE_PATH, is_probe_success_status,
};

/// Probes a profile with an unauthenticated password-grant request.
///
/// Any 2xx-4xx answer means a Protheus REST server is listening there, since
/// a 401 is the expected reply without credentials.
#[derive(Clone, Default)]
pub struct RestProbe {
    http: Client,
}

impl RestProbe {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionProbe for RestProbe {
    async fn probe(&self, profile: &ConnectionProfile, timeout: Duration) -> ProbeResult {
        let url = profile.url_for(TOKEN_PROBE_PATH);
        tracing::debug!("[RestProbe] Probing {}", url);

        match self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status().as_u16();
                let success = is_probe_success_status(status);
                tracing::debug!("[RestProbe] {} answered {}", url, status);
                ProbeResult {
                    success,
                    url: Some(url),
                    status_code: Some(status),
                    error: (!success).then(|| format!("Server returned status {}", status)),
                    timed_out: false,
                }
            }
            Err(e) if e.is_timeout() => {
                tracing::debug!("[RestProbe] {} timed out", url);
                ProbeResult::timeout(
                    Some(url),
                    format!("Connection timed out (more than {} seconds)", timeout.as_secs()),
                )
            }
            Err(e) => {
                tracing::debug!("[RestProbe] {} failed: {}", url, e);
                ProbeResult::failure(Some(url), e.to_string())
            }
        }
    }
}
