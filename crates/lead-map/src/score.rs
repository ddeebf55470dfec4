//! Scoring of source column and destination field pairs.
//!
//! A pair's score is the sum of three non-negative signals:
//!
//! 1. Name similarity against the field key or label, weighted by
//!    `name_weight`.
//! 2. A flat `content_weight` when the column's detected content pattern is
//!    bound to exactly this field.
//! 3. `keyword_bonus` per domain keyword found in both names.
//!
//! The total is capped at 1.0.

use lead_model::{DestinationField, SourceColumn};
use serde::Serialize;

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::patterns::{ContentPattern, PatternDetector};
use crate::similarity::{normalize_name, normalized_similarity};

/// Reason given when no signal contributed to a score.
pub const NO_CLEAR_CORRESPONDENCE: &str = "no clear correspondence";

/// A signal contributing to a match score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    /// Component name (e.g., "Name similarity").
    pub name: &'static str,
    /// Amount added to the score.
    pub value: f64,
    /// Operator-facing clause used in the reason string.
    pub description: String,
}

/// Score of one column against one destination field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub field_key: String,
    /// Copied from the destination field for tie-breaking.
    pub required: bool,
    /// Total in `[0, 1]`.
    pub score: f64,
    /// Contributing signals joined with `" + "`.
    pub reason: String,
    pub components: Vec<ScoreComponent>,
}

impl MatchResult {
    /// Breakdown of the score, e.g. `"Name similarity: 20%; Content pattern: 60%"`.
    pub fn explain(&self) -> String {
        self.components
            .iter()
            .map(|c| format!("{}: {:.0}%", c.name, c.value * 100.0))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Scores columns against destination fields with a fixed configuration.
#[derive(Debug, Clone)]
pub struct MatchScorer {
    config: ScoringConfig,
    detector: PatternDetector,
}

impl MatchScorer {
    /// Validates the configuration and compiles its extra patterns.
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        let mut detector = PatternDetector::standard().with_majority(config.pattern_majority);
        for rule in &config.extra_patterns {
            detector = detector.with_pattern(ContentPattern::new(&rule.name, &rule.regex)?);
        }
        Ok(Self { config, detector })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn detector(&self) -> &PatternDetector {
        &self.detector
    }

    /// Name of the content pattern the column's samples exhibit, if any.
    pub fn detect(&self, column: &SourceColumn) -> Option<&str> {
        self.detector.detect_name(&column.sample_values)
    }

    /// Scores one column against one field.
    pub fn score(&self, column: &SourceColumn, field: &DestinationField) -> MatchResult {
        let pattern = self.detect(column);
        self.score_with_pattern(&column.name, pattern, field)
    }

    /// Scores one column against every field, in the given order.
    ///
    /// Content detection runs once for the column.
    pub fn score_all<'a, I>(&self, column: &SourceColumn, fields: I) -> Vec<MatchResult>
    where
        I: IntoIterator<Item = &'a DestinationField>,
    {
        let pattern = self.detect(column);
        fields
            .into_iter()
            .map(|field| self.score_with_pattern(&column.name, pattern, field))
            .collect()
    }

    /// Scores a column name against a field given an already detected pattern.
    pub fn score_with_pattern(
        &self,
        column_name: &str,
        pattern: Option<&str>,
        field: &DestinationField,
    ) -> MatchResult {
        let config = &self.config;
        let column = normalize_name(column_name);
        let key = normalize_name(&field.key);
        let mut components = Vec::new();

        let similarity = normalized_similarity(&column, &key)
            .max(normalized_similarity(&column, &normalize_name(&field.label)));
        let name_value = similarity * config.name_weight;
        if name_value > 0.0 {
            components.push(ScoreComponent {
                name: "Name similarity",
                value: name_value,
                description: describe_similarity(similarity),
            });
        }

        if let Some(pattern) = pattern
            && config.field_for_pattern(pattern) == Some(field.key.as_str())
            && config.content_weight > 0.0
        {
            components.push(ScoreComponent {
                name: "Content pattern",
                value: config.content_weight,
                description: format!("{pattern} data format detected"),
            });
        }

        if config.keyword_bonus > 0.0 {
            for keyword in &config.keywords {
                let keyword = normalize_name(keyword);
                if !keyword.is_empty() && column.contains(&keyword) && key.contains(&keyword) {
                    components.push(ScoreComponent {
                        name: "Keyword",
                        value: config.keyword_bonus,
                        description: format!("contains \"{keyword}\""),
                    });
                }
            }
        }

        let total: f64 = components.iter().map(|c| c.value).sum();
        let reason = if components.is_empty() {
            NO_CLEAR_CORRESPONDENCE.to_string()
        } else {
            components
                .iter()
                .map(|c| c.description.as_str())
                .collect::<Vec<_>>()
                .join(" + ")
        };

        MatchResult {
            field_key: field.key.clone(),
            required: field.required,
            score: total.clamp(0.0, 1.0),
            reason,
            components,
        }
    }
}

fn describe_similarity(similarity: f64) -> String {
    let percent = similarity * 100.0;
    if similarity > 0.8 {
        format!("very similar name ({percent:.0}%)")
    } else if similarity > 0.5 {
        format!("similar name ({percent:.0}%)")
    } else {
        format!("partial name overlap ({percent:.0}%)")
    }
}
