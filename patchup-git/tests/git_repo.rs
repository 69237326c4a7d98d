//! Behavior of the git collaborator against a real throwaway repository.

use std::path::Path;

use patchup_git::{GitError, GitRepo};
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) {
    let out = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("run git");
    assert!(
        out.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
}

fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.email", "patchup@example.com"]);
    git(dir, &["config", "user.name", "patchup tests"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

fn commit_all(dir: &Path, message: &str) {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", message]);
}

fn repo_with_tracked_file() -> (TempDir, GitRepo) {
    let tmp = TempDir::new().expect("tempdir");
    init_repo(tmp.path());
    let nested = tmp.path().join("base").join("win");
    std::fs::create_dir_all(&nested).expect("mkdir");
    std::fs::write(nested.join("file.cc"), "int answer() { return 41; }\n").expect("write");
    commit_all(tmp.path(), "baseline");
    let repo = GitRepo::open(tmp.path()).expect("open");
    (tmp, repo)
}

#[test]
fn clean_tree_has_no_modified_paths() {
    let (_tmp, repo) = repo_with_tracked_file();
    assert!(repo.modified_tracked_paths().unwrap().is_empty());
}

#[test]
fn edits_show_up_as_modified_tracked_paths() {
    let (tmp, repo) = repo_with_tracked_file();
    std::fs::write(
        tmp.path().join("base/win/file.cc"),
        "int answer() { return 42; }\n",
    )
    .unwrap();
    // Untracked files must not be listed.
    std::fs::write(tmp.path().join("scratch.txt"), "untracked\n").unwrap();

    let modified = repo.modified_tracked_paths().unwrap();
    assert_eq!(modified, vec!["base/win/file.cc".to_string()]);
}

#[test]
fn full_index_diff_carries_blob_identity() {
    let (tmp, repo) = repo_with_tracked_file();
    std::fs::write(
        tmp.path().join("base/win/file.cc"),
        "int answer() { return 42; }\n",
    )
    .unwrap();

    let diff = repo.diff_full_index("base/win/file.cc").unwrap();
    assert!(diff.contains("diff --git a/base/win/file.cc b/base/win/file.cc"));
    assert!(diff.contains("--- a/base/win/file.cc"));
    assert!(diff.contains("+++ b/base/win/file.cc"));
    // --full-index writes the complete pre/post blob hashes.
    let index_line = diff
        .lines()
        .find(|line| line.starts_with("index "))
        .expect("index line");
    let hashes = index_line.trim_start_matches("index ");
    let pre = hashes.split("..").next().expect("pre hash");
    assert!(pre.len() >= 40, "expected full blob hash, got {index_line}");
}

#[test]
fn restore_path_resets_an_edit() {
    let (tmp, repo) = repo_with_tracked_file();
    let target = tmp.path().join("base/win/file.cc");
    std::fs::write(&target, "int answer() { return 0; }\n").unwrap();

    repo.restore_path("base/win/file.cc").unwrap();
    assert_eq!(
        std::fs::read_to_string(&target).unwrap(),
        "int answer() { return 41; }\n"
    );
}

#[test]
fn restore_unknown_path_fails() {
    let (_tmp, repo) = repo_with_tracked_file();
    let err = repo.restore_path("does/not/exist.cc").unwrap_err();
    assert!(matches!(err, GitError::Command { .. }));
}

#[test]
fn patch_round_trips_through_diff_and_apply() {
    let (tmp, repo) = repo_with_tracked_file();
    let target = tmp.path().join("base/win/file.cc");
    std::fs::write(&target, "int answer() { return 42; }\n").unwrap();

    let patch_text = repo.diff_full_index("base/win/file.cc").unwrap();
    let patch_file = tmp.path().join("change.patch");
    std::fs::write(&patch_file, &patch_text).unwrap();

    repo.restore_path("base/win/file.cc").unwrap();
    repo.apply_patch(&patch_file).unwrap();
    assert_eq!(
        std::fs::read_to_string(&target).unwrap(),
        "int answer() { return 42; }\n"
    );
}

#[test]
fn garbage_patch_fails_to_apply() {
    let (tmp, repo) = repo_with_tracked_file();
    let patch_file = tmp.path().join("broken.patch");
    std::fs::write(&patch_file, "this is not a unified diff\n").unwrap();

    let err = repo.apply_patch(&patch_file).unwrap_err();
    assert!(matches!(err, GitError::Command { .. }));
}
