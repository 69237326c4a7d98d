//! # patchup-generator
//!
//! Derives one patch file per modified tracked file in a scope and prunes
//! patch files no longer backed by a live modification. Content is
//! authoritative: this crate never touches the metadata store — the next
//! reconciliation run notices the new or changed patch files and re-derives
//! sidecars from them.

pub mod error;

pub use error::GenerateError;

use std::path::{Path, PathBuf};

use patchup_core::codec::PatchNameCodec;
use patchup_core::config::ProgramConfig;
use patchup_core::types::SubmoduleScope;
use patchup_git::GitRepo;

use crate::error::io_err;

/// What one scope's generation pass wrote and pruned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub scope: String,
    /// Patch filenames written this pass, in modified-file order.
    pub written: Vec<String>,
    /// Stale patch filenames removed this pass.
    pub removed: Vec<String>,
}

/// Per-scope patch generation.
pub struct PatchGenerator<'a> {
    repo: GitRepo,
    scope: &'a SubmoduleScope,
    codec: &'a PatchNameCodec,
    keep_patch_files: &'a [String],
    ignore_prefixes: &'a [String],
}

impl<'a> PatchGenerator<'a> {
    pub fn new(
        repo: GitRepo,
        scope: &'a SubmoduleScope,
        codec: &'a PatchNameCodec,
        keep_patch_files: &'a [String],
        ignore_prefixes: &'a [String],
    ) -> Self {
        Self {
            repo,
            scope,
            codec,
            keep_patch_files,
            ignore_prefixes,
        }
    }

    /// Write a patch per modified tracked file, then prune stale patches.
    pub fn update_patches(&self) -> Result<GenerateSummary, GenerateError> {
        tracing::info!(
            "updating patches for {}, saving to {}",
            self.scope.repo_dir.display(),
            self.scope.patch_dir.display()
        );

        let mut modified = self.repo.modified_tracked_paths()?;
        modified.retain(|rel| !self.ignored(rel));

        std::fs::create_dir_all(&self.scope.patch_dir)
            .map_err(|e| io_err(&self.scope.patch_dir, e))?;

        let total = modified.len();
        let mut written = Vec::with_capacity(total);
        for (index, rel) in modified.iter().enumerate() {
            let contents = self.repo.diff_full_index(rel)?;
            let name = self.codec.encode(rel)?;
            write_atomic(&self.scope.patch_dir.join(&name), contents.as_bytes())?;
            tracing::info!("wrote {}/{}: {}", index + 1, total, name);
            written.push(name);
        }

        let removed = self.remove_stale(&written)?;
        Ok(GenerateSummary {
            scope: self.scope.rel.clone(),
            written,
            removed,
        })
    }

    fn ignored(&self, rel: &str) -> bool {
        self.ignore_prefixes
            .iter()
            .any(|prefix| rel == prefix || rel.starts_with(&format!("{prefix}/")))
    }

    /// Remove patch files whose decoded target is no longer modified,
    /// keeping anything on the configured keep list.
    fn remove_stale(&self, current: &[String]) -> Result<Vec<String>, GenerateError> {
        let mut removed = Vec::new();
        let entries = std::fs::read_dir(&self.scope.patch_dir)
            .map_err(|e| io_err(&self.scope.patch_dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&self.scope.patch_dir, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if self.codec.decode(name).is_none() {
                continue;
            }
            if current.iter().any(|n| n == name)
                || self.keep_patch_files.iter().any(|n| n == name)
            {
                continue;
            }
            std::fs::remove_file(entry.path()).map_err(|e| io_err(entry.path(), e))?;
            tracing::info!("removed stale patch: {name}");
            removed.push(name.to_string());
        }
        removed.sort();
        Ok(removed)
    }
}

/// Run generation over every configured scope.
pub fn generate_all(config: &ProgramConfig) -> Result<Vec<GenerateSummary>, GenerateError> {
    let codec = config.codec();
    let mut summaries = Vec::new();
    for scope in config.scopes() {
        let repo = GitRepo::open(&scope.repo_dir)?;
        let generator = PatchGenerator::new(
            repo,
            &scope,
            &codec,
            &config.generator.keep_patch_files,
            &config.generator.ignore_prefixes,
        );
        summaries.push(generator.update_patches()?);
    }
    Ok(summaries)
}

/// Serialize → `.tmp` sibling → rename, same pattern as sidecar saves.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), GenerateError> {
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, contents).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}
