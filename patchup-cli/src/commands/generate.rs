//! `patchup generate` — regenerate patch files from working-tree changes.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use patchup_core::ProgramConfig;
use patchup_generator::generate_all;

/// Arguments for `patchup generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {}

impl GenerateArgs {
    pub fn run(self, config: &ProgramConfig) -> Result<()> {
        let summaries = generate_all(config).context("patch generation failed")?;

        for summary in &summaries {
            println!(
                "{} '{}' — {} written, {} pruned",
                "✓".green().bold(),
                summary.scope,
                summary.written.len(),
                summary.removed.len()
            );
            for name in &summary.written {
                println!("  ✎  {name}");
            }
            for name in &summary.removed {
                println!("  ✂  {name}");
            }
        }

        if summaries.is_empty() {
            println!("No submodule scopes configured.");
        }
        Ok(())
    }
}
