//! Vigil CLI - Main entry point

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vigil_compliance::{ComplianceConfig, ComplianceService};
use vigil_core::{AlertStatus, ReviewDecision};
use vigil_store::JsonlRepository;

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Vigil - KYC/AML compliance checks", long_about = None)]
struct Cli {
    /// Data directory path
    #[arg(short, long, default_value = "./data")]
    data: PathBuf,

    /// JSON config file (thresholds, retention, screening policy)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a KYC check on a profile JSON file
    Kyc {
        /// Subject (user) ID
        subject: String,
        /// Path to the KYC profile JSON
        profile: PathBuf,
    },

    /// Run an AML check on a transactions JSON file
    Aml {
        /// Subject (user) ID
        subject: String,
        /// Path to a JSON array of transactions
        transactions: PathBuf,
    },

    /// List recent checks
    Checks {
        /// Filter by subject ID
        #[arg(long)]
        subject: Option<String>,
        /// Maximum number of checks to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// List recent alerts
    Alerts {
        /// Filter by status (open, investigating, resolved, false_positive)
        #[arg(long)]
        status: Option<AlertStatus>,
        /// Maximum number of alerts to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Record a manual review decision on a check
    Review {
        /// Check ID
        check_id: String,
        /// Decision (approved, rejected)
        decision: ReviewDecision,
        /// Reviewer ID
        #[arg(long)]
        reviewer: String,
        /// Review notes
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Move an alert through the investigation workflow
    Alert {
        /// Alert ID
        alert_id: String,
        /// New status (investigating, resolved, false_positive)
        status: AlertStatus,
        /// Analyst ID
        #[arg(long)]
        actor: String,
        /// Resolution notes
        #[arg(long)]
        resolution: Option<String>,
    },

    /// Show check and alert counters
    Stats,

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ComplianceConfig::from_file(path)?,
        None => ComplianceConfig::default(),
    };

    tracing::debug!(data = %cli.data.display(), retention = config.retention, "Opening repository");
    let repository = JsonlRepository::open_with_retention(&cli.data, config.retention)?;
    let mut service = ComplianceService::new(config, Box::new(repository));

    match cli.command {
        Commands::Kyc { subject, profile } => {
            commands::kyc(&mut service, &subject, &profile).await?;
        }

        Commands::Aml { subject, transactions } => {
            commands::aml(&mut service, &subject, &transactions).await?;
        }

        Commands::Checks { subject, limit } => {
            commands::checks(&service, subject.as_deref(), limit)?;
        }

        Commands::Alerts { status, limit } => {
            commands::alerts(&service, status, limit)?;
        }

        Commands::Review {
            check_id,
            decision,
            reviewer,
            notes,
        } => {
            commands::review(&mut service, &check_id, decision, &reviewer, &notes)?;
        }

        Commands::Alert {
            alert_id,
            status,
            actor,
            resolution,
        } => {
            commands::update_alert(&mut service, &alert_id, status, &actor, resolution.as_deref())?;
        }

        Commands::Stats => {
            commands::stats(&service)?;
        }

        Commands::Config => {
            commands::show_config(service.config())?;
        }
    }

    Ok(())
}
