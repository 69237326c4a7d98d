//! Patch filename codec.
//!
//! A patch for `base/win/file.cc` is stored flat as
//! `base-win-file.cc.patch`, its sidecar as `base-win-file.cc.patchinfo`.
//! Separator and extensions come from the config. The mapping must stay
//! bijective: a path segment that already contains the separator cannot be
//! encoded unambiguously and is rejected up front rather than guessed at
//! decode time.

use crate::error::CodecError;

/// Bidirectional mapping between repository-relative paths and flattened
/// patch/sidecar filenames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchNameCodec {
    separator: char,
    patch_ext: String,
    record_ext: String,
}

impl PatchNameCodec {
    /// Extensions are given without the leading dot (`patch`, `patchinfo`).
    pub fn new(separator: char, patch_ext: &str, record_ext: &str) -> Self {
        Self {
            separator,
            patch_ext: patch_ext.to_owned(),
            record_ext: record_ext.to_owned(),
        }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Patch filename for a target path.
    pub fn encode(&self, rel_path: &str) -> Result<String, CodecError> {
        Ok(format!("{}.{}", self.encode_stem(rel_path)?, self.patch_ext))
    }

    /// Sidecar filename for a target path.
    pub fn record_name(&self, rel_path: &str) -> Result<String, CodecError> {
        Ok(format!("{}.{}", self.encode_stem(rel_path)?, self.record_ext))
    }

    /// Target path for a patch filename; `None` for foreign filenames.
    pub fn decode(&self, file_name: &str) -> Option<String> {
        self.decode_with_ext(file_name, &self.patch_ext)
    }

    /// Target path for a sidecar filename; `None` for foreign filenames.
    pub fn decode_record(&self, file_name: &str) -> Option<String> {
        self.decode_with_ext(file_name, &self.record_ext)
    }

    fn encode_stem(&self, rel_path: &str) -> Result<String, CodecError> {
        for segment in rel_path.split('/') {
            if segment.contains(self.separator) {
                return Err(CodecError::AmbiguousSeparator {
                    path: rel_path.to_owned(),
                    separator: self.separator,
                });
            }
        }
        Ok(rel_path.replace('/', &self.separator.to_string()))
    }

    fn decode_with_ext(&self, file_name: &str, ext: &str) -> Option<String> {
        let stem = file_name.strip_suffix(&format!(".{ext}"))?;
        if stem.is_empty() {
            return None;
        }
        Some(stem.replace(self.separator, "/"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> PatchNameCodec {
        PatchNameCodec::new('-', "patch", "patchinfo")
    }

    #[test]
    fn encodes_nested_path() {
        assert_eq!(
            codec().encode("base/win/file.cc").unwrap(),
            "base-win-file.cc.patch"
        );
    }

    #[test]
    fn record_name_uses_sidecar_extension() {
        assert_eq!(
            codec().record_name("base/win/file.cc").unwrap(),
            "base-win-file.cc.patchinfo"
        );
    }

    #[test]
    fn decodes_back_to_target() {
        assert_eq!(
            codec().decode("base-win-file.cc.patch").as_deref(),
            Some("base/win/file.cc")
        );
        assert_eq!(
            codec().decode_record("base-win-file.cc.patchinfo").as_deref(),
            Some("base/win/file.cc")
        );
    }

    #[test]
    fn foreign_filenames_decode_to_none() {
        assert_eq!(codec().decode("README.md"), None);
        assert_eq!(codec().decode(".patch"), None);
        assert_eq!(codec().decode_record("base-win-file.cc.patch"), None);
    }

    #[test]
    fn separator_inside_segment_is_rejected() {
        let err = codec().encode("base/some-dir/file.cc").unwrap_err();
        assert!(matches!(
            err,
            crate::error::CodecError::AmbiguousSeparator { separator: '-', .. }
        ));
    }

    #[test]
    fn alternative_separator_allows_dashes_in_segments() {
        let codec = PatchNameCodec::new('_', "patch", "patchinfo");
        let name = codec.encode("base/some-dir/file.cc").unwrap();
        assert_eq!(name, "base_some-dir_file.cc.patch");
        assert_eq!(codec.decode(&name).as_deref(), Some("base/some-dir/file.cc"));
    }
}
