use anyhow::Result;
use clap::Args;

use aprov_application::AprovApp;
use aprov_core::connection::{ConnectionProfile, DEFAULT_BASE_PATH, Protocol};

use crate::output;

#[derive(Args)]
pub struct ConnectArgs {
    /// Host name or IPv4 address of the REST server
    pub address: String,
    #[arg(long)]
    pub port: Option<String>,
    #[arg(long, default_value = "http")]
    pub protocol: Protocol,
    #[arg(long, default_value = DEFAULT_BASE_PATH)]
    pub base_path: String,
}

pub async fn connect(app: &AprovApp, args: ConnectArgs) -> Result<()> {
    let profile = ConnectionProfile::new(args.protocol, args.address, args.port, args.base_path);

    let report = app.resolver.validate(&profile);
    if !report.valid {
        for error in &report.errors {
            output::warn(error);
        }
        anyhow::bail!("Invalid connection settings");
    }

    output::info(format!("Testing {} ...", profile.base_url()));
    let answering = app.resolver.test_and_save(profile.clone()).await?;
    if answering != profile {
        output::info(format!("Server answered on {}", answering.base_url()));
    }
    output::success(format!("Connected to {}", answering.base_url()));
    Ok(())
}

pub async fn disconnect(app: &AprovApp) -> Result<()> {
    app.resolver.clear().await?;
    output::success("Connection removed");
    Ok(())
}
