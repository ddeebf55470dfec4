//! Error types for lead file ingestion.

use std::path::PathBuf;
use thiserror::Error;

use crate::combine::CombineIssue;

/// Errors that can occur during ingestion operations.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("file {path} is too large ({size} bytes, limit {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Content is malformed for the encoding its byte order mark declares.
    #[error("file {path} is not valid {encoding}")]
    Encoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === CSV Parsing Errors ===
    /// Failed to read CSV records.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV file is empty.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// The first record has no column names.
    #[error("could not detect header row in {path}")]
    NoHeaderDetected { path: PathBuf },

    /// A header cell is blank while later cells are not.
    #[error("column {index} has an empty name in {path}")]
    EmptyColumnName { path: PathBuf, index: usize },

    /// Two header cells carry the same name.
    #[error("duplicate column '{column}' in {path}")]
    DuplicateColumn { path: PathBuf, column: String },

    // === Table Errors ===
    /// Column not found in the table.
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// A column added to a table already exists.
    #[error("column '{column}' already exists")]
    ColumnExists { column: String },

    /// Added column values don't line up with the table rows.
    #[error("column '{column}' has {actual} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Invalid combined field definition.
    #[error("invalid combined field '{name}': {source}")]
    CombinedField {
        name: String,
        #[source]
        source: CombineIssue,
    },

    /// Two source columns are mapped onto the same destination field.
    #[error("field '{field}' is mapped from both '{first}' and '{second}'")]
    DuplicateTarget {
        field: String,
        first: String,
        second: String,
    },

    // === Output Errors ===
    /// Failed to write CSV output.
    #[error("failed to write CSV {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl IngestError {
    pub(crate) fn open(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
