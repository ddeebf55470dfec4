//! Reusable mapping templates.
//!
//! Operators who import files from the same list provider repeatedly save the
//! reviewed column mapping as a named template and apply it to later uploads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assignment::FieldTarget;

/// One source column to destination decision stored in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub source_column: String,
    pub field: FieldTarget,
}

/// A named, saved column mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub mappings: Vec<TemplateEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub usage_count: u32,
}

impl MappingTemplate {
    pub fn new(name: impl Into<String>, mappings: Vec<TemplateEntry>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            description: String::new(),
            mappings,
            created_at: now,
            updated_at: now,
            usage_count: 0,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Looks up the stored decision for a source column.
    pub fn field_for(&self, source_column: &str) -> Option<&FieldTarget> {
        self.mappings
            .iter()
            .find(|entry| entry.source_column == source_column)
            .map(|entry| &entry.field)
    }

    /// Number of entries that target a destination field.
    pub fn mapped_count(&self) -> usize {
        self.mappings.iter().filter(|e| !e.field.is_skip()).count()
    }

    /// Bumps the usage counter and the update timestamp.
    pub fn touch(&mut self) {
        self.usage_count = self.usage_count.saturating_add(1);
        self.updated_at = Utc::now();
    }
}
