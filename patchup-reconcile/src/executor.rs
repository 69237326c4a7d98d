//! Plan execution.
//!
//! Mutation ordering is the safety contract:
//! - apply: restore the affected files to baseline, apply the patch, and
//!   only then commit the sidecar (a single atomic replace);
//! - reset-and-drop: restore every affected file, only then delete the
//!   sidecar.
//!
//! A failure at any step leaves the sidecar untouched, so the next run
//! reclassifies from checksums instead of trusting partial state. Failures
//! are captured per target; one bad patch never blocks the rest of the plan.

use std::path::Path;

use patchup_core::checksum;
use patchup_core::codec::PatchNameCodec;
use patchup_core::types::{SubmoduleScope, TargetPath};

use patchup_git::GitRepo;

use crate::error::{io_err, ReconcileError};
use crate::planner::{Disposition, Plan, StaleReason};
use crate::report::{Action, TargetOutcome};
use crate::store::{self, AffectedFile, PatchRecord};

/// Execute one scope's plan, in plan order.
pub fn execute(
    plan: Plan,
    scope: &SubmoduleScope,
    repo: &GitRepo,
    codec: &PatchNameCodec,
    schema_version: u32,
    dry_run: bool,
) -> Vec<TargetOutcome> {
    plan.items
        .into_iter()
        .map(|item| execute_item(item, scope, repo, codec, schema_version, dry_run))
        .collect()
}

fn execute_item(
    item: Disposition,
    scope: &SubmoduleScope,
    repo: &GitRepo,
    codec: &PatchNameCodec,
    schema_version: u32,
    dry_run: bool,
) -> TargetOutcome {
    match item {
        Disposition::UpToDate { target } => TargetOutcome {
            target,
            patch: None,
            action: Action::UpToDate,
            reason: None,
            error: None,
        },
        Disposition::ResetAndDrop { target, record } => {
            let error = if dry_run {
                None
            } else {
                drop_one(&target, &record, scope, repo, codec)
                    .err()
                    .map(|e| e.to_string())
            };
            TargetOutcome {
                target,
                patch: None,
                action: Action::ResetAndDrop,
                reason: Some(StaleReason::PatchRemoved),
                error,
            }
        }
        Disposition::Apply {
            target,
            patch_path,
            record,
            reason,
        } => {
            let error = if dry_run {
                None
            } else {
                apply_one(
                    &target,
                    &patch_path,
                    record.as_ref(),
                    scope,
                    repo,
                    codec,
                    schema_version,
                )
                .err()
                .map(|e| e.to_string())
            };
            TargetOutcome {
                target,
                patch: Some(patch_path),
                action: Action::Apply,
                reason: Some(reason),
                error,
            }
        }
    }
}

/// Restore every affected file, then delete the stale sidecar.
fn drop_one(
    target: &TargetPath,
    record: &PatchRecord,
    scope: &SubmoduleScope,
    repo: &GitRepo,
    codec: &PatchNameCodec,
) -> Result<(), ReconcileError> {
    let affected: Vec<String> = record
        .affected_files
        .iter()
        .map(|f| f.file_relative_path.clone())
        .collect();
    restore_all(repo, &affected)?;

    let sidecar = store::record_path(&scope.patch_dir, codec, target)?;
    store::delete(&sidecar)?;
    tracing::info!("dropped {target}: files restored to baseline, sidecar removed");
    Ok(())
}

/// Reset to baseline, apply, then commit a fresh record.
fn apply_one(
    target: &TargetPath,
    patch_path: &Path,
    old_record: Option<&PatchRecord>,
    scope: &SubmoduleScope,
    repo: &GitRepo,
    codec: &PatchNameCodec,
    schema_version: u32,
) -> Result<(), ReconcileError> {
    let patch_text = std::fs::read_to_string(patch_path).map_err(|e| io_err(patch_path, e))?;

    // The patch's own headers name what it touches; for a fallback, the
    // decoded target itself.
    let mut declared = declared_paths(&patch_text);
    if declared.is_empty() {
        declared.push(target.0.clone());
    }

    // Reset the union of old and new affected sets, so a patch that now
    // touches fewer files still clears the residue of its previous shape.
    let mut reset_set = declared.clone();
    if let Some(record) = old_record {
        for entry in &record.affected_files {
            if !reset_set.contains(&entry.file_relative_path) {
                reset_set.push(entry.file_relative_path.clone());
            }
        }
    }
    restore_all(repo, &reset_set)?;

    repo.apply_patch(patch_path)
        .map_err(|source| ReconcileError::PatchApplyFailed {
            patch: patch_path.to_path_buf(),
            source,
        })?;

    let record = PatchRecord {
        schema_version,
        patch_checksum: checksum::digest_file(patch_path),
        affected_files: declared
            .iter()
            .map(|rel| AffectedFile {
                file_relative_path: rel.clone(),
                file_checksum: checksum::digest_file(
                    &TargetPath::from(rel.as_str()).join_under(&scope.repo_dir),
                ),
            })
            .collect(),
    };
    let sidecar = store::record_path(&scope.patch_dir, codec, target)?;
    store::save(&sidecar, &record)?;
    tracing::info!("applied {target} from {}", patch_path.display());
    Ok(())
}

fn restore_all(repo: &GitRepo, paths: &[String]) -> Result<(), ReconcileError> {
    for path in paths {
        repo.restore_path(path)
            .map_err(|source| ReconcileError::RestoreFailed {
                file: path.clone(),
                source,
            })?;
    }
    Ok(())
}

/// Paths a unified diff declares, in order of first appearance.
///
/// Primary source is the `diff --git a/X b/X` header; `+++ b/X` lines are a
/// fallback for hand-written patches without git headers.
pub(crate) fn declared_paths(patch_text: &str) -> Vec<String> {
    let mut paths = Vec::new();
    for line in patch_text.lines() {
        if let Some(rest) = line.strip_prefix("diff --git a/") {
            if let Some((_, b_side)) = rest.split_once(" b/") {
                push_unique(&mut paths, b_side.trim());
            }
        }
    }
    if paths.is_empty() {
        for line in patch_text.lines() {
            if let Some(rest) = line.strip_prefix("+++ b/") {
                push_unique(&mut paths, rest.trim());
            }
        }
    }
    paths
}

fn push_unique(paths: &mut Vec<String>, candidate: &str) {
    if !candidate.is_empty() && !paths.iter().any(|p| p == candidate) {
        paths.push(candidate.to_string());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
