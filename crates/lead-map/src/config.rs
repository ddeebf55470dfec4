//! Scoring weights and decision thresholds.
//!
//! Every tunable number the scorer and selector use lives in
//! [`ScoringConfig`], so thresholds can be adjusted and tested without
//! touching the algorithm. The configuration can be read from TOML; missing
//! keys fall back to the defaults:
//!
//! ```toml
//! name_weight = 0.4
//! content_weight = 0.6
//! keyword_bonus = 0.1
//! keywords = ["owner", "address", "value"]
//! pattern_majority = 0.5
//! tie_band = 0.1
//!
//! [thresholds]
//! high = 0.8
//! medium = 0.5
//! reject = 0.3
//!
//! [pattern_fields]
//! email = "owner_email"
//! year = ""
//! ```
//!
//! Entries under `[pattern_fields]` are merged over the built-in bindings; an
//! empty key unbinds a pattern.

use std::collections::BTreeMap;
use std::path::Path;

use lead_model::Confidence;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{MappingError, Result};
use crate::patterns::{ADDRESS, CURRENCY, PHONE, POSTAL_CODE, STATE_CODE, YEAR};

/// Configurable score boundaries for confidence bands and rejection.
///
/// - Below `reject`: the column is skipped
/// - Below `medium`: [`Confidence::Low`]
/// - `medium` to `high`: [`Confidence::Medium`]
/// - At or above `high`: [`Confidence::High`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    /// Minimum score for high confidence (default: 0.8).
    pub high: f64,
    /// Minimum score for medium confidence (default: 0.5).
    pub medium: f64,
    /// Scores below this are suppressed as `skip` (default: 0.3).
    pub reject: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.8,
            medium: 0.5,
            reject: 0.3,
        }
    }
}

impl ConfidenceThresholds {
    /// Creates thresholds with strict boundaries for unattended imports.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            high: 0.9,
            medium: 0.65,
            reject: 0.45,
        }
    }

    /// Creates thresholds with relaxed boundaries for exploratory mapping.
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            high: 0.7,
            medium: 0.4,
            reject: 0.2,
        }
    }

    /// Buckets a score into a confidence band.
    #[must_use]
    pub fn categorize(&self, score: f64) -> Confidence {
        if score >= self.high {
            Confidence::High
        } else if score >= self.medium {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// Returns false when a score is too low to surface as a suggestion.
    #[must_use]
    pub fn accepts(&self, score: f64) -> bool {
        score >= self.reject
    }
}

/// An additional content pattern declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub name: String,
    /// Regular expression tested against each trimmed sample value.
    pub regex: String,
}

/// Weights, thresholds and bindings used by the match scorer and selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Maximum contribution of name/label similarity.
    pub name_weight: f64,
    /// Flat contribution when the column's content pattern is bound to the field.
    pub content_weight: f64,
    /// Bonus per keyword shared by the column name and the field key.
    pub keyword_bonus: f64,
    pub keywords: Vec<String>,
    /// Share of samples a pattern must exceed to be detected.
    pub pattern_majority: f64,
    /// Score gap within which a required field beats an optional one.
    pub tie_band: f64,
    pub thresholds: ConfidenceThresholds,
    /// Content pattern name to destination field key.
    #[serde(deserialize_with = "merge_pattern_fields")]
    pub pattern_fields: BTreeMap<String, String>,
    /// Patterns evaluated after the built-in ones, in order.
    pub extra_patterns: Vec<PatternRule>,
}

fn default_pattern_fields() -> BTreeMap<String, String> {
    [
        (ADDRESS, "address"),
        (PHONE, "owner_phone"),
        (CURRENCY, "estimated_value"),
        (POSTAL_CODE, "zip_code"),
        (YEAR, "year_built"),
        (STATE_CODE, "state"),
    ]
    .into_iter()
    .map(|(pattern, field)| (pattern.to_string(), field.to_string()))
    .collect()
}

fn merge_pattern_fields<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<String, String>::deserialize(deserializer)?;
    let mut fields = default_pattern_fields();
    for (pattern, field) in overrides {
        let field = field.trim();
        if field.is_empty() {
            fields.remove(&pattern);
        } else {
            fields.insert(pattern, field.to_string());
        }
    }
    Ok(fields)
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            name_weight: 0.4,
            content_weight: 0.6,
            keyword_bonus: 0.1,
            keywords: ["owner", "address", "value"]
                .into_iter()
                .map(String::from)
                .collect(),
            pattern_majority: 0.5,
            tie_band: 0.1,
            thresholds: ConfidenceThresholds::default(),
            pattern_fields: default_pattern_fields(),
            extra_patterns: Vec::new(),
        }
    }
}

impl ScoringConfig {
    /// Defaults with [`ConfidenceThresholds::strict`].
    #[must_use]
    pub fn strict() -> Self {
        Self {
            thresholds: ConfidenceThresholds::strict(),
            ..Self::default()
        }
    }

    /// Defaults with [`ConfidenceThresholds::relaxed`].
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            thresholds: ConfidenceThresholds::relaxed(),
            ..Self::default()
        }
    }

    /// Parses a configuration from TOML, filling gaps with defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Self::parse(contents, "scoring configuration")
    }

    /// Loads a configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, &path.display().to_string())
    }

    fn parse(contents: &str, origin: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|source| MappingError::Toml {
            origin: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// The destination key a detected pattern corroborates, if any.
    pub fn field_for_pattern(&self, pattern: &str) -> Option<&str> {
        self.pattern_fields.get(pattern).map(String::as_str)
    }

    /// Checks that weights are in `[0, 1]` and thresholds are ordered.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("name_weight", self.name_weight),
            ("content_weight", self.content_weight),
            ("keyword_bonus", self.keyword_bonus),
            ("tie_band", self.tie_band),
            ("thresholds.high", self.thresholds.high),
            ("thresholds.medium", self.thresholds.medium),
            ("thresholds.reject", self.thresholds.reject),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MappingError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if !(0.0..1.0).contains(&self.pattern_majority) {
            return Err(MappingError::InvalidConfig(format!(
                "pattern_majority must be within [0, 1), got {}",
                self.pattern_majority
            )));
        }
        let t = &self.thresholds;
        if !(t.reject <= t.medium && t.medium <= t.high) {
            return Err(MappingError::InvalidConfig(format!(
                "thresholds must satisfy reject <= medium <= high, got {} / {} / {}",
                t.reject, t.medium, t.high
            )));
        }
        if let Some((pattern, _)) = self
            .pattern_fields
            .iter()
            .find(|(_, field)| field.trim().is_empty())
        {
            return Err(MappingError::InvalidConfig(format!(
                "pattern '{pattern}' is bound to an empty field key"
            )));
        }
        Ok(())
    }
}
