//! Error types for patchup-generator.

use std::path::PathBuf;

use thiserror::Error;

use patchup_core::error::CodecError;
use patchup_git::GitError;

/// All errors that can arise from patch generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A git diff/listing call failed.
    #[error(transparent)]
    Git(#[from] GitError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The filename codec rejected a modified path under the configured
    /// separator.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Convenience constructor for [`GenerateError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> GenerateError {
    GenerateError::Io {
        path: path.into(),
        source,
    }
}
