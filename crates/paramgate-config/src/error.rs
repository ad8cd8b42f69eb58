//! Configuration loading errors.

use std::path::PathBuf;
use thiserror::Error;

/// A configuration source could not be loaded or holds an invalid value.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required file does not exist.
    #[error("no configuration file at {}", path.display())]
    MissingFile {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A file exists but cannot be read.
    #[error("cannot read {}", path.display())]
    Unreadable {
        /// Path of the file.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// TOML content does not match the schema.
    #[error("bad TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON content does not match the schema.
    #[error("bad JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A value parsed but is out of range.
    #[error("{field}: {reason}")]
    InvalidValue {
        /// Dotted field path, e.g. `validation.separator`.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An environment override cannot be parsed.
    #[error("environment override {var}: {reason}")]
    BadOverride {
        /// Variable name.
        var: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The format is neither TOML nor JSON.
    #[error("unsupported configuration format '{0}'")]
    UnsupportedFormat(String),
}

impl ConfigError {
    pub(crate) fn missing_file(path: impl Into<PathBuf>) -> Self {
        Self::MissingFile { path: path.into() }
    }

    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }

    /// Reports an out-of-range value.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn bad_override(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BadOverride {
            var: var.into(),
            reason: reason.into(),
        }
    }
}
