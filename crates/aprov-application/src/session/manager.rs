use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use aprov_core::error::{AprovError, Result};
use aprov_core::session::{
    AuthApi, BiometricAuthenticator, BiometricEnableOutcome, BiometricKind, PersistedSession,
    TokenSlot, User,
};
use aprov_core::storage::{AUTH_STORAGE_KEY, KeyValueStore, load_json, save_json};

const BIOMETRIC_PROMPT: &str = "Unlock APROV";

/// Result of the one-shot biometric login attempted when the app comes to
/// the foreground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoLoginOutcome {
    AlreadyAuthenticated,
    /// The attempt for this foreground cycle was already made
    AlreadyAttempted,
    /// Biometric unlock disabled, no refresh token, or no usable hardware
    Unavailable,
    ChallengeFailed,
    LoggedIn,
    /// The refresh after a passed challenge failed; the session was wiped
    SessionReset,
}

#[derive(Default)]
struct SessionState {
    user: Option<User>,
    is_authenticated: bool,
    is_loading: bool,
    error: Option<String>,
    biometric_enabled: bool,
    biometric_kind: BiometricKind,
    hydrated: bool,
}

impl SessionState {
    fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            user: self.user.clone(),
            is_authenticated: self.is_authenticated,
            biometric_enabled: self.biometric_enabled,
            biometric_kind: self.biometric_kind,
        }
    }

    fn refresh_token(&self) -> Option<String> {
        self.user.as_ref().and_then(|u| u.refresh_token.clone())
    }
}

/// Owns the signed-in user, its tokens and the biometric unlock preference.
///
/// Every token change is mirrored into the shared [`TokenSlot`] so the REST
/// client picks it up on its next call, and persisted under `auth-storage`.
///
/// Failures of `login` are reported as `false` plus [`error`](Self::error);
/// the other operations return explicit results.
pub struct SessionManager {
    auth: Arc<dyn AuthApi>,
    biometric: Arc<dyn BiometricAuthenticator>,
    store: Arc<dyn KeyValueStore>,
    token: TokenSlot,
    state: RwLock<SessionState>,
    auto_login_attempted: AtomicBool,
}

impl SessionManager {
    /// Creates a new `SessionManager`.
    ///
    /// # Arguments
    ///
    /// * `auth` - Token endpoint used for password and refresh grants
    /// * `biometric` - Device biometric capability
    /// * `store` - Persistent storage for the session record
    /// * `token` - Shared bearer token slot read by the REST client
    pub fn new(
        auth: Arc<dyn AuthApi>,
        biometric: Arc<dyn BiometricAuthenticator>,
        store: Arc<dyn KeyValueStore>,
        token: TokenSlot,
    ) -> Self {
        Self {
            auth,
            biometric,
            store,
            token,
            state: RwLock::new(SessionState::default()),
            auto_login_attempted: AtomicBool::new(false),
        }
    }

    /// Restores the persisted session.
    ///
    /// With biometric unlock enabled the session comes back locked: the user
    /// and refresh token are known, but no bearer token is published until
    /// a biometric login succeeds.
    pub async fn hydrate(&self) -> Result<()> {
        let persisted: PersistedSession = load_json(self.store.as_ref(), AUTH_STORAGE_KEY)
            .await?
            .unwrap_or_default();

        let mut state = self.state.write().await;
        state.is_authenticated =
            persisted.is_authenticated && persisted.user.is_some() && !persisted.biometric_enabled;
        state.user = persisted.user;
        state.biometric_enabled = persisted.biometric_enabled;
        state.biometric_kind = persisted.biometric_kind;
        state.hydrated = true;

        self.token.set(if state.is_authenticated {
            state.user.as_ref().map(|u| u.token.clone())
        } else {
            None
        });

        tracing::info!(
            "[SessionManager] Hydrated (authenticated: {}, biometric: {})",
            state.is_authenticated,
            state.biometric_enabled
        );
        Ok(())
    }

    async fn persist(&self) -> Result<()> {
        let persisted = self.state.read().await.to_persisted();
        save_json(self.store.as_ref(), AUTH_STORAGE_KEY, &persisted).await
    }

    async fn persist_or_warn(&self) {
        if let Err(e) = self.persist().await {
            tracing::warn!("[SessionManager] Failed to persist session: {}", e);
        }
    }

    /// Password login. Credentials travel as headers, never in a body.
    ///
    /// Returns `true` on success; on failure the message is kept in
    /// [`error`](Self::error) and the session stays anonymous.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.error = None;
        }

        tracing::info!("[SessionManager] Logging in '{}'", username);
        let result = self.auth.login(username, password).await;

        {
            let mut state = self.state.write().await;
            state.is_loading = false;
            match result {
                Ok(response) => {
                    let user = User {
                        username: username.to_string(),
                        name: response
                            .name
                            .clone()
                            .filter(|n| !n.trim().is_empty())
                            .unwrap_or_else(|| username.to_string()),
                        token: response.access_token,
                        refresh_token: response.refresh_token,
                    };
                    self.token.set(Some(user.token.clone()));
                    state.user = Some(user);
                    state.is_authenticated = true;
                }
                Err(e) => {
                    tracing::warn!("[SessionManager] Login failed: {}", e);
                    state.error = Some(e.user_message());
                    return false;
                }
            }
        }

        self.persist_or_warn().await;
        true
    }

    /// Mints a new access token from the stored refresh token.
    ///
    /// A response without a refresh token keeps the previous one.
    pub async fn refresh(&self) -> Result<User> {
        let (current, refresh_token) = {
            let state = self.state.read().await;
            let user = state
                .user
                .clone()
                .ok_or_else(|| AprovError::authentication("No signed-in user"))?;
            let refresh_token = state
                .refresh_token()
                .ok_or_else(|| AprovError::authentication("No refresh token available"))?;
            (user, refresh_token)
        };

        tracing::debug!(
            "[SessionManager] Refreshing token (refresh token length {})",
            refresh_token.len()
        );
        let response = self.auth.refresh(&refresh_token).await?;
        let user = current.refreshed(&response);

        {
            let mut state = self.state.write().await;
            self.token.set(Some(user.token.clone()));
            state.user = Some(user.clone());
            state.is_authenticated = true;
            state.error = None;
        }
        self.persist_or_warn().await;

        Ok(user)
    }

    /// Turns biometric unlock on when a refresh token exists and the device
    /// has enrolled biometric hardware.
    pub async fn enable_biometric(&self) -> Result<BiometricEnableOutcome> {
        if self.state.read().await.refresh_token().is_none() {
            return Ok(BiometricEnableOutcome::NoRefresh);
        }
        if !self.biometric.has_hardware().await {
            return Ok(BiometricEnableOutcome::NoHardware);
        }
        if !self.biometric.is_enrolled().await {
            return Ok(BiometricEnableOutcome::NotEnrolled);
        }

        let kind = BiometricKind::best_of(&self.biometric.supported_kinds().await);
        {
            let mut state = self.state.write().await;
            state.biometric_enabled = true;
            state.biometric_kind = kind;
        }
        self.persist().await?;

        tracing::info!("[SessionManager] Biometric unlock enabled ({})", kind);
        Ok(BiometricEnableOutcome::Success)
    }

    /// Turns biometric unlock off. Tokens are untouched.
    pub async fn disable_biometric(&self) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.biometric_enabled = false;
            state.biometric_kind = BiometricKind::None;
        }
        self.persist().await
    }

    async fn biometric_ready(&self) -> bool {
        let enabled_with_token = {
            let state = self.state.read().await;
            state.biometric_enabled && state.refresh_token().is_some()
        };
        enabled_with_token && self.biometric.has_hardware().await && self.biometric.is_enrolled().await
    }

    /// Biometric challenge followed by a token refresh.
    pub async fn biometric_login(&self) -> Result<User> {
        if !self.biometric_ready().await {
            return Err(AprovError::authentication("Biometric unlock is not available"));
        }
        if !self.biometric.authenticate(BIOMETRIC_PROMPT).await {
            let message = "Biometric authentication failed";
            self.state.write().await.error = Some(message.to_string());
            return Err(AprovError::authentication(message));
        }

        self.refresh().await.inspect_err(|e| {
            tracing::warn!("[SessionManager] Biometric refresh failed: {}", e);
        })
    }

    /// One biometric login attempt per foreground cycle.
    ///
    /// Any refresh failure after a passed challenge wipes the session, so the
    /// biometric option is never left enabled but unusable. The cause stays
    /// readable through [`error`](Self::error).
    pub async fn try_auto_biometric_login(&self) -> AutoLoginOutcome {
        if self.state.read().await.is_authenticated {
            return AutoLoginOutcome::AlreadyAuthenticated;
        }
        if self.auto_login_attempted.swap(true, Ordering::AcqRel) {
            return AutoLoginOutcome::AlreadyAttempted;
        }
        if !self.biometric_ready().await {
            return AutoLoginOutcome::Unavailable;
        }
        if !self.biometric.authenticate(BIOMETRIC_PROMPT).await {
            return AutoLoginOutcome::ChallengeFailed;
        }

        match self.refresh().await {
            Ok(_) => AutoLoginOutcome::LoggedIn,
            Err(e) => {
                tracing::warn!(
                    "[SessionManager] Refresh after biometric unlock failed, resetting session: {}",
                    e
                );
                if let Err(clear_err) = self.logout().await {
                    tracing::warn!("[SessionManager] Failed to clear session: {}", clear_err);
                }
                self.state.write().await.error = Some(e.user_message());
                AutoLoginOutcome::SessionReset
            }
        }
    }

    /// Re-arms the auto biometric login for a new foreground cycle.
    pub fn begin_foreground_cycle(&self) {
        self.auto_login_attempted.store(false, Ordering::Release);
    }

    /// Clears the user, the tokens and the biometric preference.
    pub async fn logout(&self) -> Result<()> {
        {
            let mut state = self.state.write().await;
            let hydrated = state.hydrated;
            *state = SessionState {
                hydrated,
                ..SessionState::default()
            };
        }
        self.token.set(None);
        tracing::info!("[SessionManager] Logged out");
        self.store.remove(AUTH_STORAGE_KEY).await
    }

    /// Replaces the user; `None` signs out without touching the biometric flag.
    pub async fn set_user(&self, user: Option<User>) -> Result<()> {
        {
            let mut state = self.state.write().await;
            self.token.set(user.as_ref().map(|u| u.token.clone()));
            state.is_authenticated = user.is_some();
            state.user = user;
        }
        self.persist().await
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn biometric_enabled(&self) -> bool {
        self.state.read().await.biometric_enabled
    }

    pub async fn biometric_kind(&self) -> BiometricKind {
        self.state.read().await.biometric_kind
    }

    pub async fn is_hydrated(&self) -> bool {
        self.state.read().await.hydrated
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
