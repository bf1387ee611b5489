//! Errors raised while merging overrides into the store

use std::path::PathBuf;
use thiserror::Error;

use super::value::ValueKind;

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The override names a path that does not exist in the default tree.
    #[error("{key} is not a valid config key")]
    UnknownKey { key: String },

    /// The override value cannot be stored in the existing leaf.
    #[error("Type mismatch ({expected} vs. {found}) for config key: {key}")]
    TypeMismatch { key: String, expected: ValueKind, found: String },

    #[error("Invalid config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed reading config file: {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed creating directory: {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Override list must alternate keys and values, got {0} entries")]
    OddOverrides(usize),
}

impl ConfigError {
    pub(crate) fn unknown_key(key: impl Into<String>) -> Self {
        Self::UnknownKey { key: key.into() }
    }

    pub(crate) fn mismatch(
        key: impl Into<String>,
        expected: ValueKind,
        found: impl ToString,
    ) -> Self {
        Self::TypeMismatch { key: key.into(), expected, found: found.to_string() }
    }

    /// Dotted key the error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::UnknownKey { key } | Self::TypeMismatch { key, .. } => Some(key),
            _ => None,
        }
    }
}
