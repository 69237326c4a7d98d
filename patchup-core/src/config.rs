//! Program configuration.
//!
//! Loaded from an explicit `--config` YAML file and validated before any
//! scan or mutation. Relative directory fields resolve against the config
//! file's parent directory. The loaded value is threaded into every
//! component constructor; there is no ambient/global configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::PatchNameCodec;
use crate::error::ConfigError;
use crate::types::{SubmoduleScope, TargetPath};

/// Sidecar format knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchinfoFileConfig {
    /// Schema version stamped into and expected from sidecars. Must be ≥ 1.
    #[serde(default = "default_schema_version")]
    pub version: u32,
    /// Only `utf-8` is supported.
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Sidecar extension, without the leading dot.
    #[serde(default = "default_patchinfo_ext")]
    pub ext: String,
}

impl Default for PatchinfoFileConfig {
    fn default() -> Self {
        Self {
            version: default_schema_version(),
            encoding: default_encoding(),
            ext: default_patchinfo_ext(),
        }
    }
}

/// Patch filename knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchFileConfig {
    /// Patch extension, without the leading dot.
    #[serde(default = "default_patch_ext")]
    pub ext: String,
    /// Character substituted for `/` in flattened patch filenames.
    #[serde(default = "default_separator")]
    pub replacement_separator: char,
}

impl Default for PatchFileConfig {
    fn default() -> Self {
        Self {
            ext: default_patch_ext(),
            replacement_separator: default_separator(),
        }
    }
}

/// Patch generation knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GeneratorConfig {
    /// Patch filenames the generator never prunes, live change or not.
    #[serde(default)]
    pub keep_patch_files: Vec<String>,
    /// Repo-relative path prefixes skipped when collecting modified files.
    #[serde(default)]
    pub ignore_prefixes: Vec<String>,
}

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// Root of the checked-out tree.
    pub chromium_src_dir: PathBuf,
    /// Root of patch storage; mirrors the tree at the scope level.
    pub patches_dir: PathBuf,
    /// Forward-slash relative scope roots, each its own git repository.
    pub submodule_dirs: Vec<String>,
    #[serde(default)]
    pub patchinfo_file: PatchinfoFileConfig,
    #[serde(default)]
    pub patch_file: PatchFileConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl ProgramConfig {
    /// Load and validate a config file.
    ///
    /// `chromium_src_dir` and `patches_dir` given as relative paths are
    /// resolved against the config file's parent directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yaml::from_str(&contents).map_err(|e| ConfigError::Yaml {
            path: path.to_path_buf(),
            source: e,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.chromium_src_dir = resolve(base, &config.chromium_src_dir);
        config.patches_dir = resolve(base, &config.patches_dir);

        config.validate()?;
        Ok(config)
    }

    /// Structural validation, run before any scan. Every violation here is
    /// fatal to the whole run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.patchinfo_file.version < 1 {
            return Err(invalid("patchinfo_file.version must be >= 1"));
        }
        if !self.patchinfo_file.encoding.eq_ignore_ascii_case("utf-8") {
            return Err(invalid(&format!(
                "patchinfo_file.encoding '{}' is not supported; use utf-8",
                self.patchinfo_file.encoding
            )));
        }

        validate_ext("patchinfo_file.ext", &self.patchinfo_file.ext)?;
        validate_ext("patch_file.ext", &self.patch_file.ext)?;
        if self.patch_file.ext == self.patchinfo_file.ext {
            return Err(invalid(
                "patch_file.ext and patchinfo_file.ext must differ; patch-dir scans could not tell them apart",
            ));
        }

        if self.patch_file.replacement_separator == '/' {
            return Err(invalid(
                "patch_file.replacement_separator must not be '/'",
            ));
        }

        for dir in &self.submodule_dirs {
            validate_submodule_dir(dir)?;
        }
        Ok(())
    }

    /// Filename codec built from this config's knobs.
    pub fn codec(&self) -> PatchNameCodec {
        PatchNameCodec::new(
            self.patch_file.replacement_separator,
            &self.patch_file.ext,
            &self.patchinfo_file.ext,
        )
    }

    /// Materialize every configured submodule scope.
    pub fn scopes(&self) -> Vec<SubmoduleScope> {
        self.submodule_dirs
            .iter()
            .map(|rel| {
                let rel_path = TargetPath::from(rel.as_str());
                SubmoduleScope {
                    rel: rel.clone(),
                    repo_dir: rel_path.join_under(&self.chromium_src_dir),
                    patch_dir: rel_path.join_under(&self.patches_dir),
                }
            })
            .collect()
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Validation {
        message: message.to_owned(),
    }
}

fn validate_ext(field: &str, ext: &str) -> Result<(), ConfigError> {
    if ext.is_empty() {
        return Err(invalid(&format!("{field} must not be empty")));
    }
    if ext.starts_with('.') || ext.contains('/') {
        return Err(invalid(&format!(
            "{field} '{ext}' must be a bare extension without dot or slash"
        )));
    }
    Ok(())
}

fn validate_submodule_dir(dir: &str) -> Result<(), ConfigError> {
    if dir.is_empty() {
        return Err(invalid("submodule_dirs entries must not be empty"));
    }
    if dir.starts_with('/') || dir.contains('\\') {
        return Err(invalid(&format!(
            "submodule_dirs entry '{dir}' must be a forward-slash relative path"
        )));
    }
    if dir.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return Err(invalid(&format!(
            "submodule_dirs entry '{dir}' must not contain empty, '.' or '..' segments"
        )));
    }
    Ok(())
}

fn default_schema_version() -> u32 {
    1
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_patchinfo_ext() -> String {
    "patchinfo".to_string()
}

fn default_patch_ext() -> String {
    "patch".to_string()
}

fn default_separator() -> char {
    '-'
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
