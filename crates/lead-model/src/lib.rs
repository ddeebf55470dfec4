//! Data model for property lead imports.
//!
//! This crate holds the types shared by the ingest, mapping and CLI crates:
//!
//! - **Destination schema**: [`DestinationField`] and the validated [`FieldCatalog`]
//! - **Source data**: [`SourceColumn`] with its sample values
//! - **Decisions**: [`FieldAssignment`], [`Confidence`] and [`FieldTarget`]
//! - **Templates**: saved, reusable [`MappingTemplate`]s

#![deny(unsafe_code)]

mod assignment;
mod catalog;
mod column;
mod error;
mod field;
mod template;

pub use assignment::{ColumnAssignment, Confidence, FieldAssignment, FieldTarget, SKIP_KEY};
pub use catalog::{FieldCatalog, PROPERTY_FIELDS_TOML, property_catalog};
pub use column::{MAX_SAMPLE_VALUES, SourceColumn};
pub use error::{ModelError, Result};
pub use field::{DestinationField, FieldGroup};
pub use template::{MappingTemplate, TemplateEntry};
