use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use serde::{Deserialize, Serialize};

use aprov_core::config::HttpSettings;
use aprov_core::connection::{
    ActiveProfile, ConnectionProbe, ConnectionProfile, ProbeResult, ValidationReport,
};
use aprov_core::error::{AprovError, Result};
use aprov_core::storage::{CONNECTION_STORAGE_KEY, KeyValueStore, load_json, save_json};

/// Record kept under `connection-storage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedConnection {
    pub config: Option<ConnectionProfile>,
    pub is_valid: bool,
}

/// Outcome of a probe with fallback: the result and the profile variant
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProbe {
    pub result: ProbeResult,
    pub profile: ConnectionProfile,
}

#[derive(Default)]
struct ResolverState {
    profile: Option<ConnectionProfile>,
    is_testing: bool,
    is_valid: bool,
    error: Option<String>,
    hydrated: bool,
}

/// Validates, probes and activates the Protheus connection profile.
///
/// The active profile is a shared cell read by the REST client on every
/// call; it only changes when a probe succeeds or on [`clear`](Self::clear).
/// A failed test leaves a previously active profile in place.
pub struct ConnectionResolver {
    probe: Arc<dyn ConnectionProbe>,
    store: Arc<dyn KeyValueStore>,
    active: ActiveProfile,
    settings: HttpSettings,
    state: RwLock<ResolverState>,
}

impl ConnectionResolver {
    pub fn new(
        probe: Arc<dyn ConnectionProbe>,
        store: Arc<dyn KeyValueStore>,
        active: ActiveProfile,
        settings: HttpSettings,
    ) -> Self {
        Self {
            probe,
            store,
            active,
            settings,
            state: RwLock::new(ResolverState::default()),
        }
    }

    /// Restores the persisted profile; a valid one becomes active.
    pub async fn hydrate(&self) -> Result<()> {
        let persisted: PersistedConnection = load_json(self.store.as_ref(), CONNECTION_STORAGE_KEY)
            .await?
            .unwrap_or_default();

        let mut state = self.state.write().await;
        if persisted.is_valid
            && let Some(profile) = &persisted.config
        {
            tracing::info!("[ConnectionResolver] Restored profile {}", profile.base_url());
            self.active.set(profile.clone());
        }
        state.profile = persisted.config;
        state.is_valid = persisted.is_valid;
        state.hydrated = true;
        Ok(())
    }

    pub fn validate(&self, profile: &ConnectionProfile) -> ValidationReport {
        profile.validate()
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.settings.probe_timeout_ms)
    }

    /// Probes one profile. Invalid profiles fail without any network traffic.
    pub async fn probe(&self, profile: &ConnectionProfile) -> ProbeResult {
        let report = profile.validate();
        if !report.valid {
            return ProbeResult::failure(None, report.errors.join(", "));
        }
        self.probe.probe(profile, self.timeout()).await
    }

    /// Probes `profile`, then retries on common ports when it had none, or
    /// once without its port when it had one.
    ///
    /// On total failure the first probe's result is returned.
    pub async fn probe_with_fallback(&self, profile: &ConnectionProfile) -> ResolvedProbe {
        let first = self.probe(profile).await;
        if first.success || !profile.validate().valid {
            return ResolvedProbe {
                result: first,
                profile: profile.clone(),
            };
        }

        let candidates: Vec<ConnectionProfile> = if profile.has_port() {
            vec![profile.without_port()]
        } else {
            self.settings
                .fallback_ports
                .iter()
                .map(|port| profile.with_port(port.clone()))
                .collect()
        };

        for candidate in candidates {
            tracing::debug!("[ConnectionResolver] Retrying with {}", candidate.base_url());
            let result = self.probe.probe(&candidate, self.timeout()).await;
            if result.success {
                return ResolvedProbe {
                    result,
                    profile: candidate,
                };
            }
        }

        ResolvedProbe {
            result: first,
            profile: profile.clone(),
        }
    }

    /// Probes with fallback; on success the answering profile becomes active
    /// and is persisted.
    pub async fn test_and_save(&self, profile: ConnectionProfile) -> Result<ConnectionProfile> {
        let report = profile.validate();
        if !report.valid {
            let mut state = self.state.write().await;
            state.is_valid = false;
            state.error = Some(report.errors.join(", "));
            return Err(AprovError::Validation(report.errors));
        }

        {
            let mut state = self.state.write().await;
            state.is_testing = true;
            state.error = None;
        }

        let resolved = self.probe_with_fallback(&profile).await;

        let mut state = self.state.write().await;
        state.is_testing = false;

        if let Some(error) = resolved.result.to_error() {
            tracing::warn!(
                "[ConnectionResolver] {} is unreachable: {}",
                profile.base_url(),
                error
            );
            state.is_valid = false;
            state.error = resolved.result.error.clone();
            return Err(error);
        }

        let answering = resolved.profile;
        tracing::info!("[ConnectionResolver] Connected to {}", answering.base_url());
        self.active.set(answering.clone());
        state.profile = Some(answering.clone());
        state.is_valid = true;
        state.error = None;
        drop(state);

        save_json(
            self.store.as_ref(),
            CONNECTION_STORAGE_KEY,
            &PersistedConnection {
                config: Some(answering.clone()),
                is_valid: true,
            },
        )
        .await?;

        Ok(answering)
    }

    /// Forgets the profile, in memory and on disk.
    pub async fn clear(&self) -> Result<()> {
        self.active.clear();
        {
            let mut state = self.state.write().await;
            state.profile = None;
            state.is_valid = false;
            state.error = None;
        }
        self.store.remove(CONNECTION_STORAGE_KEY).await
    }

    pub async fn profile(&self) -> Option<ConnectionProfile> {
        self.state.read().await.profile.clone()
    }

    pub async fn is_testing(&self) -> bool {
        self.state.read().await.is_testing
    }

    pub async fn is_valid(&self) -> bool {
        self.state.read().await.is_valid
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn is_hydrated(&self) -> bool {
        self.state.read().await.hydrated
    }

    pub fn active(&self) -> &ActiveProfile {
        &self.active
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
