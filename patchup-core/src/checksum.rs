//! SHA-256 content digests.
//!
//! Digests are the reconciliation oracle, not a cache key: two files compare
//! equal exactly when their digests do. A file that cannot be read yields an
//! "unknown" digest (`None`) rather than an error, so classification deep in
//! the planner never throws — callers treat unknown as stale.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

const READ_BUF_SIZE: usize = 8192;

/// Digest of an in-memory byte buffer.
pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Digest of a file's bytes, streamed in fixed-size chunks.
///
/// Returns `None` when the file is missing or unreadable.
pub fn digest_file(path: &Path) -> Option<String> {
    let mut file = File::open(path).ok()?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; READ_BUF_SIZE];
    loop {
        match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buf[..n]),
            Err(_) => return None,
        }
    }
    Some(hex::encode(hasher.finalize()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_input_has_known_digest() {
        assert_eq!(
            digest_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_is_deterministic_and_fixed_length() {
        let a = digest_bytes(b"patch contents");
        let b = digest_bytes(b"patch contents");
        assert_eq!(a, b);
        assert_eq!(a.len(), DIGEST_HEX_LEN);
    }

    #[test]
    fn one_byte_difference_changes_digest() {
        assert_ne!(digest_bytes(b"abc"), digest_bytes(b"abd"));
    }

    #[test]
    fn file_digest_matches_byte_digest() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.cc");
        std::fs::write(&path, b"int main() {}\n").unwrap();
        assert_eq!(digest_file(&path), Some(digest_bytes(b"int main() {}\n")));
    }

    #[test]
    fn missing_file_is_unknown() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(digest_file(&tmp.path().join("absent.cc")), None);
    }

    #[test]
    fn directory_is_unknown() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("subdir");
        std::fs::create_dir(&dir).unwrap();
        // Opening a directory either fails outright or fails on first read;
        // both must come back as unknown.
        assert_eq!(digest_file(&dir), None);
    }
}
