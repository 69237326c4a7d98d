//! `patchup apply` — reconcile every configured scope.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use patchup_core::ProgramConfig;
use patchup_reconcile::{pipeline, Action, RunReport, TargetOutcome};

/// Arguments for `patchup apply`.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Classify and report without touching the tree or metadata.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ApplyArgs {
    pub fn run(self, config: &ProgramConfig) -> Result<()> {
        let report = pipeline::run(config, self.dry_run).context("reconciliation run failed")?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize report")?
            );
        } else {
            print_report(&report);
        }

        if report.has_failures() {
            eprintln!("{}", "Error: not all patches were reconciled cleanly!".red());
            std::process::exit(1);
        }
        Ok(())
    }
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "target")]
    target: String,
    #[tabled(rename = "action")]
    action: String,
    #[tabled(rename = "why")]
    why: String,
    #[tabled(rename = "result")]
    result: String,
}

fn print_report(report: &RunReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    let totals = report.totals();
    println!(
        "{prefix}patchup v{} | {} applied | {} dropped | {} up to date | {} failed",
        env!("CARGO_PKG_VERSION"),
        totals.applied,
        totals.dropped,
        totals.up_to_date,
        totals.failed,
    );

    let mut any = false;
    for scope in &report.scopes {
        if scope.outcomes.is_empty() {
            continue;
        }
        any = true;
        println!("{}", scope.scope.bold());
        let rows: Vec<OutcomeRow> = scope.outcomes.iter().map(outcome_row).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    if !any {
        println!("{prefix}no patches or records found — nothing to do");
    }
}

fn outcome_row(outcome: &TargetOutcome) -> OutcomeRow {
    OutcomeRow {
        target: outcome.target.to_string(),
        action: action_label(outcome),
        why: outcome
            .reason
            .map(|r| r.describe().to_string())
            .unwrap_or_else(|| "-".to_string()),
        result: result_label(outcome),
    }
}

fn action_label(outcome: &TargetOutcome) -> String {
    match outcome.action {
        Action::Apply => "apply".to_string(),
        Action::ResetAndDrop => "reset + drop".to_string(),
        Action::UpToDate => "up to date".to_string(),
    }
}

fn result_label(outcome: &TargetOutcome) -> String {
    match &outcome.error {
        Some(error) => format!("{} {error}", "✗".red().bold()),
        None => format!("{}", "✓".green().bold()),
    }
}
