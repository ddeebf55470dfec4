//! Lead file ingestion.
//!
//! Reads uploaded CSV files into a [`CsvTable`], extracts the sample values
//! the mapping engine scores against, derives combined columns, and projects
//! rows onto destination fields once a mapping is settled.

pub mod combine;
pub mod csv;
mod error;
mod projection;
mod samples;

pub use combine::{
    CleanupRule, CombineIssue, CombinePreset, CombinedField, NO_SEPARATOR, add_combined_columns,
    apply_cleanup, combine_values, suggest_combined_fields, validate_combined_field,
};
pub use self::csv::{CsvTable, MAX_CSV_FILE_SIZE, parse_csv_str, read_csv_table};
pub use error::{IngestError, Result};
pub use projection::{ProjectedTable, project_rows, write_projected_csv};
pub use samples::extract_source_columns;
