//! Atlas search CLI
//!
//! Ops and debugging tool over the unified search client: run searches from
//! a terminal, check index health, inspect collection sizes, and manage the
//! curated synonym sets.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::process::ExitCode;

mod commands;

use commands::{health, search, stats, suggest, synonyms};

/// Search operations CLI for the Atlas discovery index
#[derive(Parser)]
#[command(name = "atlas-search")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search across places, events, and articles
    Search {
        /// Query text (empty string browses top content)
        query: String,

        /// Collections to search, comma-separated (place,event,article)
        #[arg(short, long)]
        types: Option<String>,

        /// Origin latitude
        #[arg(long, requires = "lng")]
        lat: Option<f64>,

        /// Origin longitude
        #[arg(long, requires = "lat")]
        lng: Option<f64>,

        /// Geo radius in kilometers
        #[arg(short, long)]
        radius: Option<f64>,

        /// Maximum results
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Category filters, comma-separated
        #[arg(short, long)]
        categories: Option<String>,
    },

    /// Autocomplete suggestions for a typed prefix
    Suggest {
        /// The prefix as typed
        prefix: String,

        /// Maximum suggestions
        #[arg(short, long, default_value = "8")]
        limit: usize,
    },

    /// Check index health
    Health {
        /// Include response times
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show collection document counts
    Stats,

    /// Manage curated place synonyms
    Synonyms {
        #[command(subcommand)]
        action: SynonymsAction,
    },
}

#[derive(Subcommand)]
enum SynonymsAction {
    /// List the curated synonym sets
    List,

    /// Upload every curated set to the index
    Sync,

    /// Delete every curated set from the index
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        let config = atlas_telemetry::TelemetryConfig {
            log_level: "atlas_search=debug,atlas_search_client=debug".to_string(),
            ..atlas_telemetry::TelemetryConfig::default()
        };
        if let Err(e) = atlas_telemetry::init_with_config(config) {
            eprintln!("{} {}", "Warning:".yellow(), e);
        }
    }

    let result = match cli.command {
        Commands::Search {
            query,
            types,
            lat,
            lng,
            radius,
            limit,
            categories,
        } => {
            search::run(
                &query,
                types.as_deref(),
                lat.zip(lng),
                radius,
                limit,
                categories.as_deref(),
                &cli.format,
                cli.verbose,
            )
            .await
        }

        Commands::Suggest { prefix, limit } => suggest::run(&prefix, limit, &cli.format).await,

        Commands::Health { detailed } => health::run(detailed, &cli.format).await,

        Commands::Stats => stats::run(&cli.format).await,

        Commands::Synonyms { action } => match action {
            SynonymsAction::List => synonyms::list(&cli.format),
            SynonymsAction::Sync => synonyms::sync(&cli.format).await,
            SynonymsAction::Clear => synonyms::clear(&cli.format).await,
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
