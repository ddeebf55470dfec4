//! Error types for mapping operations.

use std::path::PathBuf;

use lead_model::ModelError;
use thiserror::Error;

/// Errors from mapping operations.
///
/// A low-confidence match is not an error: it is reported as a `skip`
/// assignment. These variants cover caller contract violations and bad
/// configuration only.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MappingError {
    /// Invalid destination catalog (empty, duplicate keys, ...).
    #[error(transparent)]
    Catalog(#[from] ModelError),

    /// Scoring weights or thresholds out of range.
    #[error("invalid scoring configuration: {0}")]
    InvalidConfig(String),

    /// A content pattern rule failed to compile.
    #[error("invalid content pattern '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// The same header variation was listed under two destination fields.
    #[error("alias '{alias}' maps to both '{first}' and '{second}'")]
    AliasConflict {
        alias: String,
        first: String,
        second: String,
    },

    /// Failed to parse a TOML configuration document.
    #[error("failed to parse {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    /// Failed to read a configuration file.
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Column not found in the mapping run.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Field not found in the destination catalog.
    #[error("Destination field not found: {0}")]
    FieldNotFound(String),

    /// Field already targeted by another column.
    #[error("Field '{field}' already mapped from column '{column}'")]
    FieldAlreadyMapped {
        /// The destination field.
        field: String,
        /// The column currently mapped to it.
        column: String,
    },
}

impl MappingError {
    /// Get the column name associated with this error, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::ColumnNotFound(c) => Some(c),
            Self::FieldAlreadyMapped { column, .. } => Some(column),
            _ => None,
        }
    }

    /// Get the destination field associated with this error, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::FieldNotFound(f) => Some(f),
            Self::FieldAlreadyMapped { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;
