//! # patchup-core
//!
//! Shared foundation for the patchup crates: program configuration, domain
//! types, the patch filename codec, and the SHA-256 checksum service.

pub mod checksum;
pub mod codec;
pub mod config;
pub mod error;
pub mod types;

pub use codec::PatchNameCodec;
pub use config::ProgramConfig;
pub use error::{CodecError, ConfigError};
pub use types::{SubmoduleScope, TargetPath};
