//! Mapping engine implementation.
//!
//! [`MappingEngine`] owns a validated destination catalog and a
//! [`MatchScorer`], and decides one [`FieldAssignment`] per source column:
//!
//! 1. If alias matching is enabled and the column name is a known variation
//!    of a catalog field, that field is assigned outright.
//! 2. Otherwise every field is scored and [`select_best`] picks the winner,
//!    preferring required fields on close calls.
//! 3. Winners scoring below the reject threshold become `skip`.
//!
//! The engine holds no mutable state; one instance can serve many threads.

use std::cmp::Ordering;

use lead_model::{
    ColumnAssignment, Confidence, DestinationField, FieldAssignment, FieldCatalog, FieldTarget,
    SourceColumn,
};
use tracing::{debug, info};

use crate::aliases::AliasTable;
use crate::config::ScoringConfig;
use crate::error::Result;
use crate::score::{MatchResult, MatchScorer};

/// Reason attached to rejected columns.
pub const NO_CORRESPONDENCE_FOUND: &str = "no correspondence found";
/// Reason attached to columns assigned through the alias table.
pub const KNOWN_ALIAS: &str = "known column alias";

/// Picks the best candidate for a column.
///
/// The leader is the highest score, first in catalog order on equal scores.
/// When the leader is optional, a required candidate scoring less than
/// `tie_band` below it wins instead; among several such candidates the
/// highest scoring one is taken.
///
/// The gap is the plain `f64` difference with no epsilon, so a gap that is
/// nominally equal to `tie_band` can land on either side of it (0.5 - 0.4 is
/// just below 0.1).
pub fn select_best(candidates: &[MatchResult], tie_band: f64) -> Option<&MatchResult> {
    let leader = highest(candidates.iter())?;
    if leader.required {
        return Some(leader);
    }
    let challenger = highest(
        candidates
            .iter()
            .filter(|c| c.required && leader.score - c.score < tie_band),
    );
    Some(challenger.unwrap_or(leader))
}

fn highest<'a>(candidates: impl Iterator<Item = &'a MatchResult>) -> Option<&'a MatchResult> {
    candidates.fold(None, |best, candidate| match best {
        Some(best) if best.score >= candidate.score => Some(best),
        _ => Some(candidate),
    })
}

/// Column-to-field mapping engine.
#[derive(Debug, Clone)]
pub struct MappingEngine {
    catalog: FieldCatalog,
    scorer: MatchScorer,
    aliases: Option<AliasTable>,
}

impl MappingEngine {
    /// Creates an engine, validating the scoring configuration.
    pub fn new(catalog: FieldCatalog, config: ScoringConfig) -> Result<Self> {
        Ok(Self {
            catalog,
            scorer: MatchScorer::new(config)?,
            aliases: None,
        })
    }

    /// Enables direct assignment of known header variations.
    ///
    /// Aliases pointing at keys missing from the catalog are ignored.
    #[must_use]
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = Some(aliases);
        self
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    pub fn config(&self) -> &ScoringConfig {
        self.scorer.config()
    }

    pub fn aliases(&self) -> Option<&AliasTable> {
        self.aliases.as_ref()
    }

    /// Scores the column against every field, highest first.
    ///
    /// Equal scores keep catalog order.
    pub fn rank(&self, column: &SourceColumn) -> Vec<MatchResult> {
        let mut results = self.scorer.score_all(column, &self.catalog);
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results
    }

    /// Decides the destination for one column.
    pub fn assign(&self, column: &SourceColumn) -> FieldAssignment {
        if let Some(key) = self.alias_for(&column.name) {
            return FieldAssignment {
                field: FieldTarget::field(key),
                confidence: Confidence::High,
                reason: KNOWN_ALIAS.to_string(),
                score: 1.0,
            };
        }

        let config = self.scorer.config();
        let candidates = self.scorer.score_all(column, &self.catalog);
        match select_best(&candidates, config.tie_band) {
            Some(best) if config.thresholds.accepts(best.score) => FieldAssignment {
                field: FieldTarget::field(best.field_key.clone()),
                confidence: config.thresholds.categorize(best.score),
                reason: best.reason.clone(),
                score: best.score,
            },
            _ => FieldAssignment::skip(NO_CORRESPONDENCE_FOUND),
        }
    }

    /// Decides every column independently, preserving input order.
    pub fn map_columns(&self, columns: &[SourceColumn]) -> Vec<ColumnAssignment> {
        let assignments: Vec<ColumnAssignment> = columns
            .iter()
            .map(|column| {
                let assignment = self.assign(column);
                debug!(
                    column = %column.name,
                    samples = column.sample_values.len(),
                    field = %assignment.field,
                    confidence = %assignment.confidence,
                    score = assignment.score,
                    "column decided"
                );
                ColumnAssignment {
                    source_name: column.name.clone(),
                    assignment,
                }
            })
            .collect();

        let skipped = assignments.iter().filter(|a| a.assignment.is_skip()).count();
        info!(
            columns = assignments.len(),
            mapped = assignments.len() - skipped,
            skipped,
            fields = self.catalog.len(),
            "mapping run complete"
        );
        assignments
    }

    fn alias_for(&self, column_name: &str) -> Option<&str> {
        let key = self.aliases.as_ref()?.lookup(column_name)?;
        self.catalog.contains(key).then_some(key)
    }
}

/// Maps columns against a list of destination fields with the default
/// configuration.
///
/// Fails with [`crate::MappingError::Catalog`] when `fields` is empty or has
/// duplicate keys.
pub fn map_columns(
    columns: &[SourceColumn],
    fields: &[DestinationField],
) -> Result<Vec<ColumnAssignment>> {
    map_columns_with(columns, fields, ScoringConfig::default())
}

/// Same as [`map_columns`] with an explicit configuration.
pub fn map_columns_with(
    columns: &[SourceColumn],
    fields: &[DestinationField],
    config: ScoringConfig,
) -> Result<Vec<ColumnAssignment>> {
    let catalog = FieldCatalog::new(fields.to_vec())?;
    let engine = MappingEngine::new(catalog, config)?;
    Ok(engine.map_columns(columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(key: &str, required: bool, score: f64) -> MatchResult {
        MatchResult {
            field_key: key.to_string(),
            required,
            score,
            reason: String::new(),
            components: Vec::new(),
        }
    }

    #[test]
    fn test_required_wins_close_call() {
        let candidates = [candidate("city", false, 0.62), candidate("address", true, 0.58)];
        let best = select_best(&candidates, 0.1).unwrap();
        assert_eq!(best.field_key, "address");
    }

    #[test]
    fn test_optional_keeps_clear_lead() {
        let candidates = [candidate("city", false, 0.72), candidate("address", true, 0.58)];
        assert_eq!(select_best(&candidates, 0.1).unwrap().field_key, "city");
    }

    #[test]
    fn test_tie_band_is_exclusive() {
        let candidates = [candidate("city", false, 0.75), candidate("address", true, 0.5)];
        assert_eq!(select_best(&candidates, 0.25).unwrap().field_key, "city");
        assert_eq!(select_best(&candidates, 0.26).unwrap().field_key, "address");
    }

    #[test]
    fn test_tie_band_uses_raw_float_gap() {
        let candidates = [candidate("city", false, 0.5), candidate("address", true, 0.4)];
        assert_eq!(select_best(&candidates, 0.1).unwrap().field_key, "address");

        let candidates = [candidate("city", false, 0.75), candidate("address", true, 0.5)];
        assert_eq!(select_best(&candidates, 0.25).unwrap().field_key, "city");
    }

    #[test]
    fn test_best_required_challenger() {
        let candidates = [
            candidate("estimated_value", true, 0.55),
            candidate("lead_score", false, 0.6),
            candidate("address", true, 0.57),
        ];
        assert_eq!(select_best(&candidates, 0.1).unwrap().field_key, "address");
    }

    #[test]
    fn test_equal_scores_keep_catalog_order() {
        let candidates = [candidate("city", false, 0.4), candidate("county", false, 0.4)];
        assert_eq!(select_best(&candidates, 0.1).unwrap().field_key, "city");
        assert!(select_best(&[], 0.1).is_none());
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MappingEngine>();
    }

    #[test]
    fn test_empty_field_list_fails_fast() {
        let err = map_columns(&[SourceColumn::header_only("Address")], &[]).unwrap_err();
        assert!(matches!(
            err,
            crate::MappingError::Catalog(lead_model::ModelError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_alias_requires_catalog_field() {
        let catalog = FieldCatalog::new(vec![DestinationField::new("address", "Address", true)])
            .unwrap();
        let mut aliases = AliasTable::new();
        aliases.insert("address", "Situs Address").unwrap();
        aliases.insert("owner_city", "Mail City").unwrap();
        let engine = MappingEngine::new(catalog, ScoringConfig::default())
            .unwrap()
            .with_aliases(aliases);

        let assignment = engine.assign(&SourceColumn::header_only("SITUS ADDRESS"));
        assert_eq!(assignment.field.key(), Some("address"));
        assert_eq!(assignment.reason, KNOWN_ALIAS);
        assert_eq!(assignment.score, 1.0);

        let assignment = engine.assign(&SourceColumn::header_only("Mail City"));
        assert_ne!(assignment.reason, KNOWN_ALIAS);
    }
}
