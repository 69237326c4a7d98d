//! Error types for patchup-reconcile.
//!
//! Two severities share this enum: structural errors (`CorruptMetadata`,
//! `Codec`, `Io` during scans) abort the whole run before anything is
//! mutated, while `RestoreFailed` and `PatchApplyFailed` are captured into a
//! single target's outcome and leave the rest of the plan running.

use std::path::PathBuf;

use thiserror::Error;

use patchup_core::error::CodecError;
use patchup_git::GitError;

/// All errors that can arise from a reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A sidecar exists but cannot be parsed. Dropping it silently would
    /// classify the patch as new and apply it onto an already patched tree,
    /// so this aborts the entire run.
    #[error("corrupt metadata sidecar at {path}: {detail}")]
    CorruptMetadata { path: PathBuf, detail: String },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Sidecar JSON serialization error (save path).
    #[error("sidecar JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The filename codec rejected a path under the configured separator.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Baseline restore failed for one of a target's affected files.
    #[error("failed to restore {file} to baseline: {source}")]
    RestoreFailed {
        file: String,
        #[source]
        source: GitError,
    },

    /// The patch did not apply against freshly restored baselines.
    #[error("patch {patch} failed to apply: {source}")]
    PatchApplyFailed {
        patch: PathBuf,
        #[source]
        source: GitError,
    },

    /// Delete was asked for a sidecar that does not exist.
    #[error("metadata sidecar not found: {path}")]
    RecordNotFound { path: PathBuf },

    /// A git failure outside the restore/apply steps.
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Convenience constructor for [`ReconcileError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ReconcileError {
    ReconcileError::Io {
        path: path.into(),
        source,
    }
}
