//! Error types for patchup-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading and validating the program config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config parsed but violates a structural constraint.
    #[error("invalid config: {message}")]
    Validation { message: String },
}

/// Errors from the patch filename codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A path segment contains the replacement separator, so the encoded
    /// filename could not be decoded back to the same path.
    #[error("path '{path}' contains separator '{separator}' in a segment; its patch filename would be ambiguous")]
    AmbiguousSeparator { path: String, separator: char },
}
