//! Disposition planning.
//!
//! Classification precedence per patch file:
//! 1. no sidecar → apply (new patch)
//! 2. sidecar schema version differs → apply
//! 3. patch blob digest differs from the record, or either side unknown → apply
//! 4. any affected file digest differs, missing, or unknown → apply
//! 5. otherwise up to date
//!
//! A sidecar whose patch file is gone plans reset-and-drop instead. The plan
//! orders every reset-and-drop strictly before every apply so a dropped
//! patch's residue is cleared before new preconditions are staged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use patchup_core::checksum;
use patchup_core::codec::PatchNameCodec;
use patchup_core::types::{SubmoduleScope, TargetPath};

use crate::error::{io_err, ReconcileError};
use crate::store::PatchRecord;

/// Why a patch classifies as needing (re)application or removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    /// No sidecar recorded for this patch.
    MissingRecord,
    /// The sidecar carries a different schema version.
    RecordOutdated,
    /// The patch file's bytes changed since it was last applied.
    PatchChanged,
    /// A target file changed (or vanished) since the patch was applied.
    SourceChanged,
    /// The patch file was removed; its sidecar is stale.
    PatchRemoved,
}

impl StaleReason {
    pub fn describe(&self) -> &'static str {
        match self {
            StaleReason::MissingRecord => "no sidecar was found for the patch",
            StaleReason::RecordOutdated => "the sidecar has a different schema version",
            StaleReason::PatchChanged => "the patch file was modified since last applied",
            StaleReason::SourceChanged => "a target file was modified since the patch was applied",
            StaleReason::PatchRemoved => "the patch file was removed since last applied",
        }
    }
}

/// Computed verdict for one target path. Derived fresh every run, never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    Apply {
        target: TargetPath,
        patch_path: PathBuf,
        record: Option<PatchRecord>,
        reason: StaleReason,
    },
    ResetAndDrop {
        target: TargetPath,
        record: PatchRecord,
    },
    UpToDate {
        target: TargetPath,
    },
}

impl Disposition {
    pub fn target(&self) -> &TargetPath {
        match self {
            Disposition::Apply { target, .. }
            | Disposition::ResetAndDrop { target, .. }
            | Disposition::UpToDate { target } => target,
        }
    }
}

/// Ordered execution plan for one scope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    pub items: Vec<Disposition>,
}

/// Scan a scope's patch directory and classify every patch file and every
/// record into a disposition.
///
/// Read-only: nothing is mutated here. Patch files whose names do not carry
/// the configured extension are ignored.
pub fn plan_scope(
    scope: &SubmoduleScope,
    codec: &PatchNameCodec,
    schema_version: u32,
    records: &BTreeMap<TargetPath, PatchRecord>,
) -> Result<Plan, ReconcileError> {
    let patch_files = scan_patch_files(scope, codec)?;

    let mut drops = Vec::new();
    let mut applies = Vec::new();
    let mut current = Vec::new();

    for (target, patch_path) in &patch_files {
        match records.get(target) {
            None => {
                applies.push(Disposition::Apply {
                    target: target.clone(),
                    patch_path: patch_path.clone(),
                    record: None,
                    reason: StaleReason::MissingRecord,
                });
            }
            Some(record) => match stale_reason(scope, schema_version, record, patch_path) {
                Some(reason) => {
                    tracing::info!("{target} is stale: {}", reason.describe());
                    applies.push(Disposition::Apply {
                        target: target.clone(),
                        patch_path: patch_path.clone(),
                        record: Some(record.clone()),
                        reason,
                    });
                }
                None => current.push(Disposition::UpToDate {
                    target: target.clone(),
                }),
            },
        }
    }

    for (target, record) in records {
        if !patch_files.contains_key(target) {
            tracing::info!("{target} is stale: {}", StaleReason::PatchRemoved.describe());
            drops.push(Disposition::ResetAndDrop {
                target: target.clone(),
                record: record.clone(),
            });
        }
    }

    // BTreeMap iteration already sorted each group by target path.
    let mut items = drops;
    items.extend(applies);
    items.extend(current);
    Ok(Plan { items })
}

fn scan_patch_files(
    scope: &SubmoduleScope,
    codec: &PatchNameCodec,
) -> Result<BTreeMap<TargetPath, PathBuf>, ReconcileError> {
    let mut patch_files = BTreeMap::new();
    if !scope.patch_dir.exists() {
        return Ok(patch_files);
    }

    let entries = std::fs::read_dir(&scope.patch_dir).map_err(|e| io_err(&scope.patch_dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(&scope.patch_dir, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(target) = codec.decode(name) else {
            continue;
        };
        patch_files.insert(TargetPath(target), entry.path());
    }
    Ok(patch_files)
}

/// `None` when the record still matches reality; otherwise the first stale
/// signal in precedence order. Unknown digests on either side count as stale.
fn stale_reason(
    scope: &SubmoduleScope,
    schema_version: u32,
    record: &PatchRecord,
    patch_path: &Path,
) -> Option<StaleReason> {
    if record.schema_version != schema_version {
        return Some(StaleReason::RecordOutdated);
    }

    let current_patch = checksum::digest_file(patch_path);
    match (&record.patch_checksum, &current_patch) {
        (Some(recorded), Some(current)) if recorded == current => {}
        _ => return Some(StaleReason::PatchChanged),
    }

    for entry in &record.affected_files {
        let live_path = TargetPath::from(entry.file_relative_path.as_str()).join_under(&scope.repo_dir);
        let current = checksum::digest_file(&live_path);
        match (&entry.file_checksum, &current) {
            (Some(recorded), Some(current)) if recorded == current => {}
            _ => return Some(StaleReason::SourceChanged),
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
