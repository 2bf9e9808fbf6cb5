//! Proposal Desk CLI
//!
//! ```bash
//! proposal-desk template ./                      # write the official import template
//! proposal-desk import planilha.xlsx             # analyse only (preview)
//! proposal-desk import planilha.xlsx --commit    # analyse and store the candidates
//! proposal-desk dashboard --praca BH             # funnel statistics
//! proposal-desk audit                            # AI audit (needs GEMINI_API_KEY)
//! ```

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use proposal_desk::app::{get_default_db_path, AppState};
use proposal_desk::engine::ProposalFilter;
use proposal_desk::logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "proposal-desk")]
#[command(about = "Territorial sales-proposal tracking", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database (default: OS data dir or PROPOSAL_DESK_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Acting user id (default: the seeded admin)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the official import template
    Template {
        /// Target file or directory
        #[arg(default_value = ".")]
        target: PathBuf,
    },

    /// Analyse a spreadsheet; store the valid rows with --commit
    Import {
        /// .xlsx, .xls or .csv file
        input: PathBuf,

        /// Store the candidate proposals after the analysis
        #[arg(long)]
        commit: bool,
    },

    /// Funnel statistics for the visible proposals
    Dashboard {
        #[arg(long)]
        praca: Option<String>,

        #[arg(long)]
        executive: Option<String>,
    },

    /// AI audit of the visible proposals
    Audit {
        #[arg(long)]
        praca: Option<String>,

        #[arg(long)]
        executive: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let db_path = cli
        .db
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(get_default_db_path);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
    let user = state
        .acting_user(cli.user.as_deref())
        .map_err(|e| anyhow!(e))?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Template { target } => {
            let import = state.import_api.lock().await;
            let path = import.download_template(&target)?;
            println!("{}", path.display());
        }

        Commands::Import { input, commit } => {
            let mut import = state.import_api.lock().await;
            let summary = import
                .select_file(&input, &user)
                .await
                .with_context(|| format!("analysing {}", input.display()))?;

            println!("{}", summary.message);
            println!(
                "linhas analisadas: {} | propostas válidas: {} | correções: {} | erros: {}",
                summary.total_analyzed,
                summary.new_proposals,
                summary.corrections_count,
                summary.errors_count
            );
            for correction in import.corrections() {
                println!("  ~ {}", correction);
            }
            for error in import.errors() {
                println!("  ! {}", error);
            }

            if commit {
                let summary = import.confirm_import().await?;
                println!("{}", summary.message);
            }
        }

        Commands::Dashboard { praca, executive } => {
            let filter = ProposalFilter {
                praca_id: praca,
                executive_id: executive,
            };
            let stats = state.dashboard_api.stats(&user, &filter, today).await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }

        Commands::Audit { praca, executive } => {
            let filter = ProposalFilter {
                praca_id: praca,
                executive_id: executive,
            };
            let report = state.dashboard_api.audit(&user, &filter, today).await?;
            println!("{}", report);
        }
    }

    Ok(())
}
