//! intake - form intake from the command line
//!
//! CLI binary over the sheet-intake library: create sheets, upload files,
//! submit form data and manage the session timer.

use clap::{Parser, Subcommand};
use sheet_intake::config::IntakeConfig;
use sheet_intake::service::create_local_service;
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

use cli::style::Stylize;

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Form intake - uploads, sheet appends and confirmation mail")]
#[command(version)]
struct Cli {
    /// Data directory (defaults to INTAKE_DATA_DIR, then the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create sheets (and the consolidated sheet)
    Init {
        /// Sheet names to create
        sheets: Vec<String>,

        /// Write column titles as the first row of new sheets
        #[arg(long)]
        headers: bool,
    },

    /// List the sheets a submission can target
    Sheets,

    /// Upload a file and print its URL
    Upload {
        /// File to upload
        path: PathBuf,

        /// MIME type (guessed from the extension when omitted)
        #[arg(long)]
        mime: Option<String>,
    },

    /// Submit form data from a JSON file
    Submit {
        /// Submission JSON
        file: PathBuf,

        /// Target sheet, overriding the file's selectedSheet
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Session timer
    Session {
        #[command(subcommand)]
        action: SessionAction,

        /// User the session belongs to (defaults to INTAKE_USER, then USER)
        #[arg(long, global = true)]
        user: Option<String>,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Start a 30-minute session
    Start,
    /// Report whether the session expired
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            anstream::eprintln!("{}: {e:#}", "error".error());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = IntakeConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Commands::Init { sheets, headers } => cli::run_init(&config, &sheets, headers).await,
        Commands::Sheets => {
            let service = create_local_service(&config)?;
            cli::run_sheets(&service).await;
            Ok(())
        }
        Commands::Upload { path, mime } => {
            let service = create_local_service(&config)?;
            cli::run_upload(&service, &path, mime.as_deref()).await
        }
        Commands::Submit { file, sheet } => {
            let service = create_local_service(&config)?;
            cli::run_submit(&service, &file, sheet.as_deref()).await
        }
        Commands::Session { action, user } => {
            let service = create_local_service(&config)?;
            let user = user.unwrap_or_else(|| config.user.clone());
            match action {
                SessionAction::Start => cli::run_session_start(&service, &user).await,
                SessionAction::Check => {
                    cli::run_session_check(&service, &user).await;
                    Ok(())
                }
            }
        }
    }
}
