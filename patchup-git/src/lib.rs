//! # patchup-git
//!
//! Thin collaborator over the system `git` executable. The engine consumes
//! exactly four operations: restore tracked files to baseline, list modified
//! tracked files, produce a full-index diff for one path, and apply a patch
//! to the working tree. Everything runs as a child process with captured
//! output; a non-zero exit becomes a [`GitError::Command`] carrying both
//! streams.

pub mod error;

pub use error::GitError;

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Handle on one scope's git repository directory.
#[derive(Debug, Clone)]
pub struct GitRepo {
    dir: PathBuf,
}

impl GitRepo {
    /// Open a repository directory.
    ///
    /// Only the directory's existence is checked here; whether it actually is
    /// a git work tree surfaces on the first command.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, GitError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(GitError::RepoMissing { dir });
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Restore tracked files to their baseline (HEAD) content.
    ///
    /// One call per path so a failure names the file that could not be
    /// restored. A path that is already at baseline is a no-op.
    pub fn restore_path(&self, rel_path: &str) -> Result<(), GitError> {
        self.run(["checkout", "--", rel_path])?;
        tracing::debug!("restored to baseline: {rel_path}");
        Ok(())
    }

    /// Modified tracked files, relative to the repository root.
    ///
    /// Nested repositories and untracked files are excluded; whitespace-only
    /// EOL churn does not count as a modification.
    pub fn modified_tracked_paths(&self) -> Result<Vec<String>, GitError> {
        let out = self.run([
            "diff",
            "--ignore-submodules",
            "--diff-filter=M",
            "--name-only",
            "--ignore-space-at-eol",
        ])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Full-index unified diff of one path against baseline.
    pub fn diff_full_index(&self, rel_path: &str) -> Result<String, GitError> {
        self.run([
            "diff",
            "--src-prefix=a/",
            "--dst-prefix=b/",
            "--full-index",
            "--",
            rel_path,
        ])
    }

    /// Apply a patch file to the working tree.
    ///
    /// The caller guarantees the affected files are at baseline; there is no
    /// three-way fallback.
    pub fn apply_patch(&self, patch_file: &Path) -> Result<(), GitError> {
        self.run([
            OsStr::new("apply"),
            OsStr::new("--whitespace=nowarn"),
            patch_file.as_os_str(),
        ])?;
        tracing::debug!("applied patch: {}", patch_file.display());
        Ok(())
    }

    /// Run `git <args>` in the repository, returning stdout on success.
    fn run<I, S>(&self, args: I) -> Result<String, GitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args
            .into_iter()
            .map(|a| a.as_ref().to_os_string())
            .collect();

        let output = Command::new("git")
            .args(&args)
            .current_dir(&self.dir)
            .output()
            .map_err(|source| GitError::Launch { source })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            return Err(GitError::Command {
                dir: self.dir.clone(),
                args: display_args(&args),
                stdout: stdout.trim_end().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr)
                    .trim_end()
                    .to_string(),
            });
        }
        Ok(stdout)
    }
}

fn display_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let err = GitRepo::open(tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, GitError::RepoMissing { .. }));
    }

    #[test]
    fn command_in_non_repo_surfaces_stderr() {
        let tmp = TempDir::new().unwrap();
        let repo = GitRepo::open(tmp.path()).unwrap();
        let err = repo.modified_tracked_paths().unwrap_err();
        match err {
            GitError::Command { args, stderr, .. } => {
                assert!(args.starts_with("diff"));
                assert!(!stderr.is_empty());
            }
            other => panic!("expected command error, got {other:?}"),
        }
    }
}
