//! Review state for one mapping run.
//!
//! The engine's suggestions are kept as produced; operator decisions are
//! layered on top as overrides, so a column can always be reset to what the
//! engine proposed.

use std::collections::{BTreeMap, BTreeSet};

use lead_model::{
    ColumnAssignment, Confidence, FieldAssignment, FieldCatalog, FieldTarget, MappingTemplate,
    SourceColumn, TemplateEntry,
};
use serde::Serialize;
use tracing::warn;

use crate::engine::MappingEngine;
use crate::error::{MappingError, Result};

/// Reason shown for a field chosen by the operator.
pub const ASSIGNED_BY_OPERATOR: &str = "assigned by operator";
/// Reason shown for a column the operator chose to leave out.
pub const SKIPPED_BY_OPERATOR: &str = "skipped by operator";
/// Reason shown for decisions restored from a saved template.
pub const FROM_TEMPLATE: &str = "from template";

static SKIP_TARGET: FieldTarget = FieldTarget::Skip;

#[derive(Debug, Clone, PartialEq)]
struct Override {
    target: FieldTarget,
    reason: &'static str,
}

/// Where a column's effective decision comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnStatus {
    /// The engine's suggestion targets a field.
    Suggested,
    /// The engine found no correspondence.
    Unmatched,
    /// The operator or a template chose the decision.
    Overridden,
}

/// Mapping run plus operator overrides.
#[derive(Debug, Clone)]
pub struct MappingState {
    catalog: FieldCatalog,
    suggestions: Vec<ColumnAssignment>,
    overrides: BTreeMap<String, Override>,
}

impl MappingState {
    /// Wraps engine output for review.
    pub fn new(catalog: FieldCatalog, suggestions: Vec<ColumnAssignment>) -> Self {
        Self {
            catalog,
            suggestions,
            overrides: BTreeMap::new(),
        }
    }

    /// Runs the engine over `columns` and wraps the result.
    pub fn from_engine(engine: &MappingEngine, columns: &[SourceColumn]) -> Self {
        Self::new(engine.catalog().clone(), engine.map_columns(columns))
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Source column names in input order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.suggestions.iter().map(|s| s.source_name.as_str())
    }

    /// The engine's decision for a column, ignoring overrides.
    pub fn suggestion(&self, column: &str) -> Option<&FieldAssignment> {
        self.suggestions
            .iter()
            .find(|s| s.source_name == column)
            .map(|s| &s.assignment)
    }

    /// The decision in force for a column.
    pub fn effective(&self, column: &str) -> Option<FieldAssignment> {
        let suggestion = self.suggestion(column)?;
        Some(match self.overrides.get(column) {
            Some(choice) => resolve(choice),
            None => suggestion.clone(),
        })
    }

    pub fn status(&self, column: &str) -> Option<ColumnStatus> {
        let suggestion = self.suggestion(column)?;
        Some(if self.overrides.contains_key(column) {
            ColumnStatus::Overridden
        } else if suggestion.is_skip() {
            ColumnStatus::Unmatched
        } else {
            ColumnStatus::Suggested
        })
    }

    /// The first column whose effective decision targets `field`.
    pub fn column_for(&self, field: &str) -> Option<&str> {
        self.columns()
            .find(|column| self.effective_target(column).key() == Some(field))
    }

    /// Points a column at a destination field.
    ///
    /// Fails when the column or field is unknown, or when another column
    /// already targets the field.
    pub fn assign(&mut self, column: &str, field: &str) -> Result<()> {
        self.ensure_column(column)?;
        if !self.catalog.contains(field) {
            return Err(MappingError::FieldNotFound(field.to_string()));
        }
        if let Some(other) = self
            .columns()
            .find(|c| *c != column && self.effective_target(c).key() == Some(field))
        {
            return Err(MappingError::FieldAlreadyMapped {
                field: field.to_string(),
                column: other.to_string(),
            });
        }
        self.overrides.insert(
            column.to_string(),
            Override {
                target: FieldTarget::field(field),
                reason: ASSIGNED_BY_OPERATOR,
            },
        );
        Ok(())
    }

    /// Leaves a column out of the import.
    pub fn skip(&mut self, column: &str) -> Result<()> {
        self.ensure_column(column)?;
        self.overrides.insert(
            column.to_string(),
            Override {
                target: FieldTarget::Skip,
                reason: SKIPPED_BY_OPERATOR,
            },
        );
        Ok(())
    }

    /// Drops the override for a column. Returns whether one existed.
    pub fn reset(&mut self, column: &str) -> Result<bool> {
        self.ensure_column(column)?;
        Ok(self.overrides.remove(column).is_some())
    }

    /// Drops every override.
    pub fn reset_all(&mut self) {
        self.overrides.clear();
    }

    /// Effective decisions for every column, in input order.
    pub fn entries(&self) -> Vec<ColumnAssignment> {
        self.suggestions
            .iter()
            .map(|s| ColumnAssignment {
                source_name: s.source_name.clone(),
                assignment: self
                    .overrides
                    .get(&s.source_name)
                    .map_or_else(|| s.assignment.clone(), resolve),
            })
            .collect()
    }

    pub fn summary(&self) -> MappingSummary {
        let mut targeted: BTreeMap<&str, usize> = BTreeMap::new();
        let mut mapped = 0;
        let mut needs_review = 0;
        for suggestion in &self.suggestions {
            let column = suggestion.source_name.as_str();
            let Some(key) = self.effective_target(column).key() else {
                continue;
            };
            mapped += 1;
            *targeted.entry(key).or_default() += 1;
            if !self.overrides.contains_key(column) && suggestion.assignment.confidence.needs_review()
            {
                needs_review += 1;
            }
        }

        let required: Vec<&str> = self.catalog.required().map(|f| f.key.as_str()).collect();
        let missing_required: Vec<String> = required
            .iter()
            .filter(|key| !targeted.contains_key(*key))
            .map(|key| key.to_string())
            .collect();

        MappingSummary {
            total_columns: self.suggestions.len(),
            mapped,
            skipped: self.suggestions.len() - mapped,
            overridden: self.overrides.len(),
            needs_review,
            required_total: required.len(),
            required_mapped: required.len() - missing_required.len(),
            missing_required,
            duplicate_targets: targeted
                .into_iter()
                .filter(|(_, count)| *count > 1)
                .map(|(key, _)| key.to_string())
                .collect(),
        }
    }

    /// Captures the effective decisions as a named template.
    pub fn to_template(&self, name: impl Into<String>) -> MappingTemplate {
        let mappings = self
            .suggestions
            .iter()
            .map(|s| TemplateEntry {
                source_column: s.source_name.clone(),
                field: self.effective_target(&s.source_name).clone(),
            })
            .collect();
        MappingTemplate::new(name, mappings)
    }

    /// Applies a template's decisions as overrides.
    ///
    /// Entries for columns absent from this run, and entries targeting fields
    /// absent from the catalog, are reported and otherwise ignored. Columns
    /// the template does not mention keep their current decision.
    pub fn apply_template(&mut self, template: &MappingTemplate) -> TemplateApplication {
        let columns: BTreeSet<String> = self.columns().map(str::to_string).collect();
        let mut outcome = TemplateApplication::default();
        for entry in &template.mappings {
            if !columns.contains(&entry.source_column) {
                outcome.unknown_columns.push(entry.source_column.clone());
                continue;
            }
            if let Some(key) = entry.field.key()
                && !self.catalog.contains(key)
            {
                outcome.unknown_fields.push(key.to_string());
                continue;
            }
            self.overrides.insert(
                entry.source_column.clone(),
                Override {
                    target: entry.field.clone(),
                    reason: FROM_TEMPLATE,
                },
            );
            outcome.applied += 1;
        }
        if !outcome.unknown_columns.is_empty() || !outcome.unknown_fields.is_empty() {
            warn!(
                template = %template.name,
                unknown_columns = outcome.unknown_columns.len(),
                unknown_fields = outcome.unknown_fields.len(),
                "template entries ignored"
            );
        }
        outcome
    }

    fn ensure_column(&self, column: &str) -> Result<()> {
        if self.suggestion(column).is_some() {
            Ok(())
        } else {
            Err(MappingError::ColumnNotFound(column.to_string()))
        }
    }

    fn effective_target(&self, column: &str) -> &FieldTarget {
        match self.overrides.get(column) {
            Some(choice) => &choice.target,
            None => self
                .suggestion(column)
                .map_or(&SKIP_TARGET, |s| &s.field),
        }
    }
}

fn resolve(choice: &Override) -> FieldAssignment {
    match &choice.target {
        FieldTarget::Skip => FieldAssignment::skip(choice.reason),
        target => FieldAssignment {
            field: target.clone(),
            confidence: Confidence::High,
            reason: choice.reason.to_string(),
            score: 1.0,
        },
    }
}

/// Summary of mapping counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingSummary {
    pub total_columns: usize,
    /// Columns whose effective decision targets a field.
    pub mapped: usize,
    pub skipped: usize,
    pub overridden: usize,
    /// Engine suggestions below high confidence that nobody has confirmed.
    pub needs_review: usize,
    pub required_total: usize,
    pub required_mapped: usize,
    /// Required field keys no column targets, in catalog order.
    pub missing_required: Vec<String>,
    /// Field keys targeted by more than one column.
    pub duplicate_targets: Vec<String>,
}

impl MappingSummary {
    /// Every required field is targeted.
    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty()
    }
}

/// Outcome of [`MappingState::apply_template`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateApplication {
    pub applied: usize,
    pub unknown_columns: Vec<String>,
    pub unknown_fields: Vec<String>,
}
