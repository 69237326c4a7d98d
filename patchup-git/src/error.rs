//! Error types for patchup-git.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from driving the git executable.
#[derive(Debug, Error)]
pub enum GitError {
    /// The repository directory does not exist.
    #[error("git repository directory does not exist: {dir}")]
    RepoMissing { dir: PathBuf },

    /// The git process could not be spawned at all.
    #[error("failed to launch git (is it installed and on PATH?): {source}")]
    Launch {
        #[source]
        source: std::io::Error,
    },

    /// git ran and exited non-zero; stdout/stderr are captured for the report.
    #[error("git {args} failed in {dir}\n  stdout: {stdout}\n  stderr: {stderr}")]
    Command {
        dir: PathBuf,
        args: String,
        stdout: String,
        stderr: String,
    },
}
