//! manifesto CLI tool.
//!
//! Usage:
//! ```bash
//! manifesto check [OPTIONS] [PATHS]...
//! manifesto check --project App.csproj
//! manifesto list-rules
//! manifesto init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Style linter enforcing the 700 by 128 manifesto on C-family sources
#[derive(Parser)]
#[command(name = "manifesto")]
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
    /// Scan files or directories
    Check {
        /// Files or directories to scan (default: current directory)
        paths: Vec<PathBuf>,

        /// MSBuild project whose compile items are scanned (can be specified multiple times)
        #[arg(short, long)]
        project: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules, by name or code (comma-separated)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Diagnostics drawn over the offending lines.
    Pretty,
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
            mut paths,
            project,
            format,
            rules,
            exclude,
        } => {
            if paths.is_empty() && project.is_empty() {
                paths.push(PathBuf::from("."));
            }
            let targets: Vec<PathBuf> = paths.iter().chain(&project).cloned().collect();
            let project_dir = config_resolver::project_dir(&targets);
            let source = config_resolver::resolve(&project_dir, cli.config.as_deref());
            commands::check::run(&paths, &project, format, rules, exclude, &source)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
