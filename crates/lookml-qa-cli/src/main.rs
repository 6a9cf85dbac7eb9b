//! lookml-qa CLI tool.
//!
//! Usage:
//! ```bash
//! lookml-qa check [OPTIONS] [PATHS]...
//! lookml-qa list-checks
//! lookml-qa init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Static quality analysis for LookML models and dashboards
#[derive(Parser)]
#[command(name = "lookml-qa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze LookML files
    Check {
        /// Files or directories to analyze; `-` reads from stdin
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run matching checks: ids, names, categories or globs
        /// (comma-separated)
        #[arg(long, value_delimiter = ',')]
        checks: Vec<String>,

        /// Check preset: full, code or design (overrides the config file)
        #[arg(long)]
        preset: Option<String>,

        /// Write a text report for each analyzed file into this directory
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,

        /// Evaluate checks in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// List available checks
    ListChecks,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for analysis results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One line per finding.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            paths,
            format,
            checks,
            preset,
            export,
            parallel,
        } => {
            let source = config_resolver::resolve(std::path::Path::new("."), cli.config.as_deref());
            commands::check::run(
                &commands::check::CheckOptions {
                    paths,
                    format,
                    checks,
                    preset,
                    export,
                    parallel,
                },
                &source,
            )
        }
        Commands::ListChecks => {
            commands::list_checks::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
