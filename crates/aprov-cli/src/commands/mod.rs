pub mod connection;
pub mod directory;
pub mod documents;
pub mod session;

use anyhow::{Result, bail};

use aprov_application::{AprovApp, AutoLoginOutcome, FetchOutcome};

use crate::output;

/// Whether a paging loop should keep going. A page without rows ends it
/// even when the server still reports more.
pub fn brought_rows(outcome: FetchOutcome) -> bool {
    matches!(outcome, FetchOutcome::Loaded { count, .. } if count > 0)
}

/// Fails unless a connection is saved and a session is usable, trying the
/// biometric unlock once when the stored session is locked.
pub async fn ensure_session(app: &AprovApp) -> Result<()> {
    if !app.resolver.is_valid().await {
        bail!("No connection configured. Run `aprov connect` first.");
    }

    match app.session.try_auto_biometric_login().await {
        AutoLoginOutcome::AlreadyAuthenticated | AutoLoginOutcome::LoggedIn => Ok(()),
        AutoLoginOutcome::SessionReset => {
            let reason = app.session.error().await.unwrap_or_default();
            output::warn(format!("The stored session was cleared: {}", reason));
            bail!("Not signed in. Run `aprov login`.")
        }
        AutoLoginOutcome::ChallengeFailed => bail!("Biometric challenge was not passed."),
        AutoLoginOutcome::Unavailable | AutoLoginOutcome::AlreadyAttempted => {
            bail!("Not signed in. Run `aprov login`.")
        }
    }
}
