use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod context;
mod extractor;
mod logging;
mod terminal_view;

use context::AppContext;

#[derive(Parser)]
#[command(name = "mentor")]
#[command(about = "Mentor - problem-scoped tutoring conversations for coding practice pages", long_about = None)]
struct Cli {
    /// Data directory (defaults to $MENTOR_HOME or the platform config dir)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Also write logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a tutoring session for a problem page
    Chat {
        /// Problem page address
        url: String,
        /// Problem title as shown on the page
        #[arg(long)]
        title: Option<String>,
        /// Difficulty badge text (Easy, Medium, Hard)
        #[arg(long)]
        difficulty: Option<String>,
        /// Problem statement
        #[arg(long)]
        description: Option<String>,
    },
    /// Print the stored transcript for a problem
    Show {
        url: String,
        /// Include the system turn
        #[arg(long)]
        system: bool,
    },
    /// Print the canonical key for a page address
    Normalize { url: String },
    /// Re-key stored conversations and merge duplicates
    Reconcile,
    /// Manage the API key override
    Credential {
        #[command(subcommand)]
        action: CredentialAction,
    },
}

#[derive(Subcommand)]
enum CredentialAction {
    /// Store an API key (must start with "sk-")
    Set { key: String },
    /// Remove the stored API key
    Clear,
    /// Show where the active API key comes from
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Normalize { url } = &cli.command {
        commands::normalize::run(url);
        return Ok(());
    }

    let context = AppContext::load(cli.home.as_deref())?;
    let _log_guard = logging::init(&context.paths.log_dir(), cli.verbose);

    match cli.command {
        Commands::Chat {
            url,
            title,
            difficulty,
            description,
        } => {
            let page = extractor::PageDetails {
                title,
                difficulty,
                description,
            };
            commands::chat::run(&context, &url, page).await?
        }
        Commands::Show { url, system } => commands::show::run(&context, &url, system).await?,
        Commands::Normalize { .. } => {}
        Commands::Reconcile => commands::reconcile::run(&context).await?,
        Commands::Credential { action } => match action {
            CredentialAction::Set { key } => commands::credential::set(&context, &key).await?,
            CredentialAction::Clear => commands::credential::clear(&context).await?,
            CredentialAction::Status => commands::credential::status(&context).await,
        },
    }

    Ok(())
}
