//! Domain types shared across the patchup crates.
//!
//! Filesystem locations use `PathBuf`; repository-relative locations are
//! forward-slash strings wrapped in [`TargetPath`], whatever the host OS.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A repository-relative, forward-slash path to a file a patch targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetPath(pub String);

impl TargetPath {
    /// Resolve this forward-slash path under a native root directory.
    pub fn join_under(&self, root: &Path) -> PathBuf {
        let mut out = root.to_path_buf();
        for segment in self.0.split('/') {
            out.push(segment);
        }
        out
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TargetPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TargetPath {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// One reconciliation unit: a configured sub-directory of the source tree
/// paired with its patch storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmoduleScope {
    /// Forward-slash path of the scope relative to the tree root.
    pub rel: String,
    /// Absolute path of the scope's working files (a git repository).
    pub repo_dir: PathBuf,
    /// Absolute path of the scope's patch + sidecar directory.
    pub patch_dir: PathBuf,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_path_display() {
        assert_eq!(TargetPath::from("base/win/file.cc").to_string(), "base/win/file.cc");
    }

    #[test]
    fn target_path_equality() {
        let a = TargetPath::from("a/b.cc");
        let b = TargetPath::from(String::from("a/b.cc"));
        assert_eq!(a, b);
    }

    #[test]
    fn join_under_splits_on_forward_slash() {
        let joined = TargetPath::from("base/win/file.cc").join_under(Path::new("/repo"));
        assert_eq!(joined, Path::new("/repo").join("base").join("win").join("file.cc"));
    }
}
