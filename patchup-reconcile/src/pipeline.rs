//! Shared reconciliation entrypoint used by the CLI.

use patchup_core::config::ProgramConfig;
use patchup_core::types::SubmoduleScope;
use patchup_git::GitRepo;

use crate::error::ReconcileError;
use crate::executor;
use crate::planner::{self, Plan};
use crate::report::{RunReport, ScopeReport};
use crate::store;

/// Run reconciliation across every configured submodule scope.
///
/// Phase 1 is read-only: every scope is scanned and classified up front, so
/// a structural failure (corrupt metadata, codec misconfiguration, missing
/// repo directory) aborts the whole run before anything is mutated — even
/// when the bad scope is not the first one. Phase 2 executes; per-target
/// failures are isolated into the report.
pub fn run(config: &ProgramConfig, dry_run: bool) -> Result<RunReport, ReconcileError> {
    let codec = config.codec();
    let schema_version = config.patchinfo_file.version;

    let mut planned: Vec<(SubmoduleScope, GitRepo, Plan)> = Vec::new();
    for scope in config.scopes() {
        let repo = GitRepo::open(&scope.repo_dir)?;
        let records = store::load_scope(&scope.patch_dir, &codec)?;
        let plan = planner::plan_scope(&scope, &codec, schema_version, &records)?;
        tracing::info!(
            "planned {} item(s) for scope {} (patches in {})",
            plan.items.len(),
            scope.rel,
            scope.patch_dir.display()
        );
        planned.push((scope, repo, plan));
    }

    let mut scopes = Vec::new();
    for (scope, repo, plan) in planned {
        let outcomes = executor::execute(plan, &scope, &repo, &codec, schema_version, dry_run);
        scopes.push(ScopeReport {
            scope: scope.rel.clone(),
            outcomes,
        });
    }

    Ok(RunReport { dry_run, scopes })
}
