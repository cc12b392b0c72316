use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use aprov_application::AprovApp;
use aprov_core::approval::ApprovalAction;
use aprov_infrastructure::AprovPaths;

mod biometric;
mod commands;
mod logging;
mod output;

use biometric::ConsoleBiometric;
use commands::{connection, directory, documents, session};

#[derive(Parser)]
#[command(name = "aprov")]
#[command(about = "APROV - approve and reject Protheus back-office documents", long_about = None)]
struct Cli {
    /// Directory holding config.toml and the state file
    #[arg(long, global = true, env = "APROV_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Test a Protheus REST endpoint and remember it
    Connect(connection::ConnectArgs),
    /// Forget the saved connection
    Disconnect,
    /// Sign in with username and password
    Login(session::LoginArgs),
    /// Sign out and clear stored tokens
    Logout,
    /// Manage biometric unlock
    Biometric {
        #[command(subcommand)]
        action: session::BiometricAction,
    },
    /// List documents awaiting a decision
    List(documents::ListArgs),
    /// Approve documents by scrId
    Approve(documents::DecisionArgs),
    /// Reject documents by scrId
    Reject(documents::DecisionArgs),
    /// Show the line items of one document
    Items(documents::ItemsArgs),
    /// Show the approval history of a document number
    History {
        document_number: String,
    },
    /// Show the purchase history of a product
    ItemHistory {
        product_code: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show the additional information fields of a line item
    ItemInfo {
        record_number: String,
        item_number: String,
        item_recno: i64,
    },
    /// List the attachments of a document
    Attachments {
        scr_id: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show the cost-center apportionment of a purchase document
    Apportionment(documents::ApportionmentArgs),
    /// List branches, optionally selecting one
    Branches(directory::BranchesArgs),
    /// List modules, optionally selecting one
    Modules(directory::ModulesArgs),
    /// Show connection, session and selections
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = AprovPaths::new(cli.config_dir);
    let app = AprovApp::open(paths, Arc::new(ConsoleBiometric::from_env()))?;
    logging::init(app.config.log_level)?;
    app.hydrate().await?;

    match cli.command {
        Commands::Connect(args) => connection::connect(&app, args).await?,
        Commands::Disconnect => connection::disconnect(&app).await?,
        Commands::Login(args) => session::login(&app, args).await?,
        Commands::Logout => session::logout(&app).await?,
        Commands::Biometric { action } => session::biometric(&app, action).await?,
        Commands::List(args) => documents::list(&app, args).await?,
        Commands::Approve(args) => documents::decide(&app, ApprovalAction::Approve, args).await?,
        Commands::Reject(args) => documents::decide(&app, ApprovalAction::Reject, args).await?,
        Commands::Items(args) => documents::items(&app, args).await?,
        Commands::History { document_number } => {
            documents::history(&app, &document_number).await?
        }
        Commands::ItemHistory { product_code, page } => {
            documents::item_history(&app, &product_code, page).await?
        }
        Commands::ItemInfo {
            record_number,
            item_number,
            item_recno,
        } => documents::item_info(&app, &record_number, &item_number, item_recno).await?,
        Commands::Attachments { scr_id, page } => {
            documents::attachments(&app, scr_id, page).await?
        }
        Commands::Apportionment(args) => documents::apportionment(&app, args).await?,
        Commands::Branches(args) => directory::branches(&app, args).await?,
        Commands::Modules(args) => directory::modules(&app, args).await?,
        Commands::Status => session::status(&app).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_dir_reads_environment() {
        let command = Cli::command();
        let arg = command
            .get_arguments()
            .find(|arg| arg.get_id() == "config_dir")
            .unwrap();
        assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new("APROV_CONFIG_DIR")));
    }

    #[test]
    fn test_reject_parses_justification() {
        let cli = Cli::try_parse_from(["aprov", "reject", "11", "12", "-j", "over budget"]).unwrap();
        match cli.command {
            Commands::Reject(args) => {
                assert_eq!(args.scr_ids, vec![11, 12]);
                assert_eq!(args.justification, "over budget");
            }
            _ => panic!("expected reject"),
        }
    }

    #[test]
    fn test_apportionment_parses_all_flag() {
        let cli = Cli::try_parse_from(["aprov", "apportionment", "SC", "000123", "--all"]).unwrap();
        match cli.command {
            Commands::Apportionment(args) => {
                assert_eq!(args.document_type, "SC");
                assert_eq!(args.document_number, "000123");
                assert!(args.all);
            }
            _ => panic!("expected apportionment"),
        }
    }
}
