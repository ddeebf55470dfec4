//! Source column to destination field mapping for lead imports.
//!
//! The engine proposes, for every column of an uploaded file, the destination
//! field it most likely holds, together with a confidence band and a short
//! explanation. Proposals combine three signals:
//!
//! - **Name similarity** between the header and the field key or label
//! - **Content patterns** recognized in the column's sample values
//! - **Domain keywords** shared by the header and the field key
//!
//! Close calls are resolved in favour of required fields, and weak winners
//! are reported as `skip` rather than guessed.
//!
//! # Example
//!
//! ```
//! use lead_map::{MappingEngine, ScoringConfig};
//! use lead_model::{SourceColumn, property_catalog};
//!
//! let engine = MappingEngine::new(property_catalog()?, ScoringConfig::default())?;
//! let column = SourceColumn::new("Mailing Address", ["100 Elm St", "200 Birch Ave"]);
//! let assignment = engine.assign(&column);
//! assert_eq!(assignment.field.key(), Some("address"));
//! # Ok::<(), lead_map::MappingError>(())
//! ```

#![deny(unsafe_code)]

mod aliases;
mod config;
mod engine;
mod error;
pub mod patterns;
mod repository;
mod score;
pub mod similarity;
mod state;

pub use aliases::{AliasTable, COLUMN_ALIASES_TOML};
pub use config::{ConfidenceThresholds, PatternRule, ScoringConfig};
pub use engine::{
    KNOWN_ALIAS, MappingEngine, NO_CORRESPONDENCE_FOUND, map_columns, map_columns_with,
    select_best,
};
pub use error::{MappingError, Result};
pub use patterns::{ContentPattern, PatternDetector};
pub use repository::{TemplateMetadata, TemplateRepository};
pub use score::{MatchResult, MatchScorer, NO_CLEAR_CORRESPONDENCE, ScoreComponent};
pub use similarity::{name_similarity, normalize_name};
pub use state::{
    ASSIGNED_BY_OPERATOR, ColumnStatus, FROM_TEMPLATE, MappingState, MappingSummary,
    SKIPPED_BY_OPERATOR, TemplateApplication,
};
