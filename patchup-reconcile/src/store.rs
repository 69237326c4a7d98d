//! Checksum sidecar store.
//!
//! One JSON sidecar per patch, next to the patch file in the scope's patch
//! directory: `base-win-file.cc.patch` pairs with
//! `base-win-file.cc.patchinfo`. Saves use the same atomic `.tmp` + rename
//! pattern as patch files, so a crash mid-write cannot leave a half-written
//! record.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use patchup_core::codec::PatchNameCodec;
use patchup_core::types::TargetPath;

use crate::error::{io_err, ReconcileError};

/// One file a patch touches, with the digest it had immediately after the
/// last successful apply. `None` means the digest was never computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedFile {
    pub file_relative_path: String,
    // The field must be present in the sidecar; null is allowed, absence is
    // not. The explicit deserializer turns off serde's missing-Option default.
    #[serde(deserialize_with = "nullable_checksum")]
    pub file_checksum: Option<String>,
}

/// One patch's persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRecord {
    pub schema_version: u32,
    #[serde(deserialize_with = "nullable_checksum")]
    pub patch_checksum: Option<String>,
    pub affected_files: Vec<AffectedFile>,
}

fn nullable_checksum<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

/// Sidecar path for a target, next to its patch file.
pub fn record_path(
    patch_dir: &Path,
    codec: &PatchNameCodec,
    target: &TargetPath,
) -> Result<PathBuf, ReconcileError> {
    Ok(patch_dir.join(codec.record_name(&target.0)?))
}

/// Load every sidecar in a scope's patch directory, keyed by decoded target
/// path.
///
/// A sidecar that fails to parse (bad JSON, wrong shape, missing required
/// field) fails the whole load with `CorruptMetadata`.
pub fn load_scope(
    patch_dir: &Path,
    codec: &PatchNameCodec,
) -> Result<BTreeMap<TargetPath, PatchRecord>, ReconcileError> {
    let mut records = BTreeMap::new();
    if !patch_dir.exists() {
        return Ok(records);
    }

    let entries = std::fs::read_dir(patch_dir).map_err(|e| io_err(patch_dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(patch_dir, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(target) = codec.decode_record(name) else {
            continue;
        };
        let record = parse_record(&entry.path())?;
        records.insert(TargetPath(target), record);
    }
    Ok(records)
}

fn parse_record(path: &Path) -> Result<PatchRecord, ReconcileError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ReconcileError::CorruptMetadata {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    serde_json::from_str(&contents).map_err(|e| ReconcileError::CorruptMetadata {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Atomically save a record: serialize → `.tmp` sibling → rename.
pub fn save(path: &Path, record: &PatchRecord) -> Result<(), ReconcileError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }

    let json = serde_json::to_string_pretty(record)?;
    let tmp = tmp_path(path);
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

/// Delete a record's sidecar.
///
/// Absence is surfaced as `RecordNotFound`, never swallowed; idempotent
/// delete is the caller's decision.
pub fn delete(path: &Path) -> Result<(), ReconcileError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ReconcileError::RecordNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(io_err(path, e)),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.tmp", path.display()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
