//! CLI parsing and command dispatch.

use std::{io, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::{
    commands::{
        self, Location,
        sync::{ReportFormat, SyncOptions},
    },
    error::Result,
};

/// Parsed command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "skill-index",
    version,
    about = "Keep a skills catalog in sync with the SKILL.md documents on disk"
)]
struct Cli {
    /// Control colored output.
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,
    /// Enable verbose output.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    /// Skills root holding the catalog, `skills/` and `plugins/`.
    #[arg(long, global = true, alias = "github-dir")]
    root: Option<PathBuf>,
    /// Config file (defaults to ~/.skill-index.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Show what would change without writing.
    #[arg(long, short = 'n', global = true)]
    dry_run: bool,
    /// Command to execute (defaults to sync).
    #[command(subcommand)]
    command: Option<Command>,
}

/// Supported color output modes.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorMode {
    /// Only colorize when stdout is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

// Commands are ordered alphabetically - maintain this order.
/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Append new skills and plugin links from a seed file.
    Register {
        /// YAML or JSON seed file with `skills` and `links`.
        seed: PathBuf,
    },
    /// Sync the catalog with skill document metadata.
    Sync {
        /// Print a unified diff of the catalog changes.
        #[arg(long)]
        diff: bool,
        /// Report format.
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
    },
}

/// Run the requested command.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let color = cli.color.into_choice();
    let location = Location {
        root: cli.root,
        config: cli.config,
    };

    // Match arms are ordered alphabetically - maintain this order.
    match cli.command.unwrap_or(Command::Sync {
        diff: false,
        format: ReportFormat::Text,
    }) {
        Command::Register { seed } => {
            commands::register::run(color, location, seed, cli.dry_run).await
        }
        Command::Sync { diff, format } => {
            let options = SyncOptions {
                dry_run: cli.dry_run,
                show_diff: diff,
                format,
            };
            commands::sync::run(color, cli.verbose, location, options).await
        }
    }
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default = if verbose { "skill_index=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("Warning: failed to install logger: {error}");
    }
}

impl ColorMode {
    /// Convert a CLI color mode into a color choice.
    fn into_choice(self) -> commands::ColorChoice {
        match self {
            Self::Auto => commands::ColorChoice::Auto,
            Self::Always => commands::ColorChoice::Always,
            Self::Never => commands::ColorChoice::Never,
        }
    }
}
