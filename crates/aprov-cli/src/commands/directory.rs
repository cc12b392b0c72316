use anyhow::{Result, bail};
use clap::Args;

use aprov_application::AprovApp;

use super::{brought_rows, ensure_session};
use crate::output;

#[derive(Args)]
pub struct BranchesArgs {
    /// Branch code to select
    #[arg(long)]
    pub select: Option<String>,
    /// Load every page
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ModulesArgs {
    /// Module id to select
    #[arg(long)]
    pub select: Option<String>,
}

pub async fn branches(app: &AprovApp, args: BranchesArgs) -> Result<()> {
    ensure_session(app).await?;

    app.branches.fetch(true).await?;
    if args.all || args.select.is_some() {
        while app.branches.has_next().await && brought_rows(app.branches.fetch(false).await?) {}
    }

    if let Some(code) = args.select {
        let Some(branch) = app.branches.find(&code).await else {
            bail!("Unknown branch '{}'", code);
        };
        app.branches.select(branch.clone()).await?;
        output::success(format!("Selected branch {} {}", branch.code, branch.description));
        return Ok(());
    }

    let selected = app.branches.selected().await.map(|b| b.code);
    for branch in app.branches.branches().await {
        output::branch_row(&branch, selected.as_deref() == Some(branch.code.as_str()));
    }
    if app.branches.has_next().await {
        output::info("More branches available (use --all)");
    }
    Ok(())
}

pub async fn modules(app: &AprovApp, args: ModulesArgs) -> Result<()> {
    if let Some(id) = args.select {
        let module = app.modules.select(&id).await?;
        output::success(format!("Selected module {}", module.name));
        return Ok(());
    }

    let selected = app.modules.selected().await.map(|m| m.id);
    for module in app.modules.modules() {
        output::module_row(module, selected.as_deref() == Some(module.id.as_str()));
    }
    Ok(())
}
