//! Error types for the lead import data model.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or loading model types.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A destination catalog must contain at least one field.
    #[error("destination field catalog is empty")]
    EmptyCatalog,

    /// Field keys must be non-empty.
    #[error("destination field at position {index} has an empty key")]
    EmptyFieldKey { index: usize },

    /// `skip` is the sentinel for unmapped columns and cannot name a field.
    #[error("destination field key '{key}' is reserved")]
    ReservedKey { key: String },

    /// Field keys must be unique within a catalog.
    #[error("duplicate destination field key: {key}")]
    DuplicateField { key: String },

    /// Failed to read a schema file.
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a TOML schema document.
    #[error("failed to parse field schema {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
}

impl ModelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
