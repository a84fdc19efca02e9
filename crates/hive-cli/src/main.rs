//! `hive`: operator tooling for the incident workflow engine
//!
//! Encodes CAP documents, verifies triage decision hashes and replays
//! workflow scenarios against an in-memory engine.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use hive_cli::commands::{cap, scenario, verify};
use hive_cli::HiveConfig;
use hive_effects::SystemEffects;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hive")]
#[command(about = "Hive - Incident Triage and Alert Publication", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = "hive.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a CAP 1.2 alert document
    Cap(cap::CapArgs),

    /// Recompute the content hash of a stored triage decision
    Verify {
        /// JSON file holding one triage decision
        #[arg(long)]
        decision: PathBuf,
    },

    /// Replay a workflow scenario and print the resulting state as JSON
    Scenario {
        /// Scenario TOML file
        file: PathBuf,

        /// Continue past steps that fail unexpectedly
        #[arg(long)]
        keep_going: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = HiveConfig::load(&cli.config)?;

    // Logs go to stderr; stdout carries command output
    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let effects = SystemEffects::new();

    match cli.command {
        Commands::Cap(args) => {
            let document = cap::run(&args, &config.workflow, &effects).await?;
            println!("{document}");
        }

        Commands::Verify { decision } => {
            let verification = verify::run(&decision)?;
            println!("{}", serde_json::to_string_pretty(&verification)?);
            if !verification.valid {
                bail!("hash mismatch for decision {}", verification.decision_id);
            }
        }

        Commands::Scenario { file, keep_going } => {
            let outcome = scenario::run(&file, effects, config.workflow, keep_going).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if !outcome.succeeded() {
                bail!("scenario {} had failing steps", file.display());
            }
        }
    }

    Ok(())
}
