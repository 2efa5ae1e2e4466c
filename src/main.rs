//! Binary entry point for uniguide.
//!
//! This binary provides the CLI interface for the university advisor.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use uniguide::cli;
use uniguide::config::UniguideConfig;
use uniguide::observability;
use uniguide::{AdvisorService, Catalogue, FuzzyRanker};

/// Uniguide - a conversational UK university advisor.
#[derive(Parser)]
#[command(name = "uniguide")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the catalogue JSON file (overrides configuration).
    #[arg(long, global = true)]
    catalogue: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Print the preference state after one utterance.
    Extract {
        /// The chat utterance.
        utterance: String,

        /// Prior state as a JSON file.
        #[arg(short, long)]
        state: Option<PathBuf>,
    },

    /// Recommend universities for one utterance.
    Recommend {
        /// The chat utterance.
        utterance: String,

        /// Prior state as a JSON file.
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Model reply text to scan for university names.
        #[arg(short, long, conflicts_with = "reply_file")]
        reply: Option<String>,

        /// File containing the model reply.
        #[arg(long)]
        reply_file: Option<PathBuf>,
    },

    /// Start an interactive advisor session.
    Chat {
        /// Use heuristic replies even if a model is configured.
        #[arg(long)]
        offline: bool,
    },

    /// Inspect or repair the catalogue.
    Catalogue {
        /// Catalogue subcommand.
        #[command(subcommand)]
        action: CatalogueAction,
    },

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Catalogue subcommands.
#[derive(Subcommand)]
enum CatalogueAction {
    /// List slug, name and location of every record.
    List,
    /// Print one record as JSON.
    Show {
        /// Record slug.
        slug: String,
    },
    /// Write a cleaned copy of the catalogue.
    Clean {
        /// Output file.
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let args = Cli::parse();

    let config = match UniguideConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };
    let config = match args.catalogue.clone() {
        Some(path) => config.with_catalogue_path(path),
        None => config,
    };

    if let Err(e) = observability::init_from_settings(&config.logging, args.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let metrics_config = observability::MetricsConfig::from_settings(&config.metrics);
    if let Err(e) = observability::install_prometheus(&metrics_config) {
        tracing::warn!(error = %e, "Metrics exporter unavailable");
    }

    match run_command(args, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(args: Cli, config: UniguideConfig) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Commands::Extract { utterance, state } => cli::cmd_extract(&utterance, state.as_deref()),

        Commands::Recommend {
            utterance,
            state,
            reply,
            reply_file,
        } => {
            let catalogue = Catalogue::load(&config.catalogue_path)?;
            let reply = cli::load_reply(reply, reply_file.as_deref())?;
            cli::cmd_recommend(
                &FuzzyRanker::from_config(&config.ranking),
                catalogue.records(),
                &utterance,
                state.as_deref(),
                reply.as_deref(),
            )
        },

        Commands::Chat { offline } => {
            let catalogue = Catalogue::load(&config.catalogue_path)?;
            let advisor = AdvisorService::from_config(catalogue, &config);
            let advisor = if offline { advisor.offline() } else { advisor };
            cli::cmd_chat(&advisor)
        },

        Commands::Catalogue { action } => {
            let catalogue = Catalogue::load(&config.catalogue_path)?;
            match action {
                CatalogueAction::List => cli::cmd_catalogue_list(&catalogue),
                CatalogueAction::Show { slug } => cli::cmd_catalogue_show(&catalogue, &slug),
                CatalogueAction::Clean { output } => cli::cmd_catalogue_clean(&catalogue, &output),
            }
        },

        Commands::Config { show } => cli::cmd_config(&config, show),
    }
}
