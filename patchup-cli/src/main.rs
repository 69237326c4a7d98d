//! patchup — keep per-file patches for a Chromium-style checkout in sync.
//!
//! # Usage
//!
//! ```text
//! patchup --config <file> apply [--dry-run] [--json]
//! patchup --config <file> generate
//! patchup --config <file> --quiet <command>
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{apply::ApplyArgs, generate::GenerateArgs};
use patchup_core::ProgramConfig;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "patchup",
    version,
    about = "Manage per-file patches for Chromium-based project submodules",
    long_about = None,
)]
struct Cli {
    /// Path to the patchup YAML config file.
    #[arg(long, value_name = "FILE")]
    config: PathBuf,

    /// Only log errors.
    #[arg(long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile patches against the tree: apply, reset-and-drop, or skip
    /// each one based on stored checksums.
    Apply(ApplyArgs),

    /// Regenerate patch files from working-tree modifications and prune
    /// stale ones.
    Generate(GenerateArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let config = ProgramConfig::load(&cli.config)
        .with_context(|| format!("failed to load config at {}", cli.config.display()))?;

    match cli.command {
        Commands::Apply(args) => args.run(&config),
        Commands::Generate(args) => args.run(&config),
    }
}

fn init_logging(quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}
