use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;

use aprov_application::AprovApp;
use aprov_core::session::BiometricEnableOutcome;

use crate::output;

#[derive(Args)]
pub struct LoginArgs {
    pub username: String,
    /// Read from stdin when omitted
    #[arg(long, env = "APROV_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Subcommand)]
pub enum BiometricAction {
    /// Allow unlocking the stored session with biometrics
    Enable,
    Disable,
    /// Unlock the stored session now
    Unlock,
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(app: &AprovApp, args: LoginArgs) -> Result<()> {
    if !app.resolver.is_valid().await {
        bail!("No connection configured. Run `aprov connect` first.");
    }

    let password = match args.password {
        Some(password) => password,
        None => tokio::task::spawn_blocking(read_password).await??,
    };

    if !app.session.login(&args.username, &password).await {
        let message = app
            .session
            .error()
            .await
            .unwrap_or_else(|| "Login failed".to_string());
        bail!(message);
    }

    let name = app.session.user().await.map(|u| u.name).unwrap_or_default();
    output::success(format!("Signed in as {}", name));
    Ok(())
}

pub async fn logout(app: &AprovApp) -> Result<()> {
    app.session.logout().await?;
    app.selection.clear().await;
    output::success("Signed out");
    Ok(())
}

pub async fn biometric(app: &AprovApp, action: BiometricAction) -> Result<()> {
    match action {
        BiometricAction::Enable => match app.session.enable_biometric().await? {
            BiometricEnableOutcome::Success => output::success(format!(
                "Biometric unlock enabled ({})",
                app.session.biometric_kind().await
            )),
            BiometricEnableOutcome::NoRefresh => {
                bail!("Sign in first; the session has no refresh token")
            }
            BiometricEnableOutcome::NoHardware => bail!("No biometric hardware available"),
            BiometricEnableOutcome::NotEnrolled => bail!("No biometric credential enrolled"),
        },
        BiometricAction::Disable => {
            app.session.disable_biometric().await?;
            output::success("Biometric unlock disabled");
        }
        BiometricAction::Unlock => {
            let user = app.session.biometric_login().await?;
            output::success(format!("Unlocked session of {}", user.name));
        }
    }
    Ok(())
}

pub async fn status(app: &AprovApp) -> Result<()> {
    let connection = match (app.resolver.profile().await, app.resolver.is_valid().await) {
        (Some(profile), true) => profile.base_url().green().to_string(),
        (Some(profile), false) => format!("{} (not verified)", profile.base_url())
            .yellow()
            .to_string(),
        (None, _) => "not configured".red().to_string(),
    };
    println!("Connection : {}", connection);

    let session = match app.session.user().await {
        Some(user) if app.session.is_authenticated().await => {
            format!("{} ({})", user.name, user.username).green().to_string()
        }
        Some(user) => format!("{} (locked)", user.name).yellow().to_string(),
        None => "signed out".red().to_string(),
    };
    println!("Session    : {}", session);

    let biometric = if app.session.biometric_enabled().await {
        format!("enabled ({})", app.session.biometric_kind().await)
    } else {
        "disabled".to_string()
    };
    println!("Biometric  : {}", biometric);

    let branch = app
        .branches
        .selected()
        .await
        .map(|b| format!("{} {}", b.code, b.description))
        .unwrap_or_else(|| "-".to_string());
    println!("Branch     : {}", branch);

    let module = app
        .modules
        .selected()
        .await
        .map(|m| m.name)
        .unwrap_or_else(|| "-".to_string());
    println!("Module     : {}", module);
    Ok(())
}
