//! Mapping decisions for source columns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel written in place of a field key when a column is left unmapped.
pub const SKIP_KEY: &str = "skip";

/// Coarse bucketing of a continuous match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Returns a human-readable description of the confidence level.
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - likely correct",
            Self::Medium => "medium confidence - should review",
            Self::Low => "low confidence - needs verification",
        }
    }

    /// Whether an operator should look at this decision before importing.
    pub fn needs_review(&self) -> bool {
        !matches!(self, Self::High)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a source column's values end up.
///
/// Serializes as the destination key, or as `"skip"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldTarget {
    Field(String),
    Skip,
}

impl FieldTarget {
    pub fn field(key: impl Into<String>) -> Self {
        Self::Field(key.into())
    }

    /// The destination key, or `None` for skipped columns.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Field(key) => Some(key),
            Self::Skip => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }

    pub fn as_str(&self) -> &str {
        self.key().unwrap_or(SKIP_KEY)
    }
}

impl From<String> for FieldTarget {
    fn from(value: String) -> Self {
        if value.is_empty() || value.eq_ignore_ascii_case(SKIP_KEY) {
            Self::Skip
        } else {
            Self::Field(value)
        }
    }
}

impl From<FieldTarget> for String {
    fn from(value: FieldTarget) -> Self {
        match value {
            FieldTarget::Field(key) => key,
            FieldTarget::Skip => SKIP_KEY.to_string(),
        }
    }
}

impl fmt::Display for FieldTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final decision for one source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAssignment {
    pub field: FieldTarget,
    pub confidence: Confidence,
    /// Explanation of the winning score, shown to the operator.
    pub reason: String,
    /// Winning score in `[0, 1]`; zero for skipped columns.
    pub score: f64,
}

impl FieldAssignment {
    pub fn skip(reason: impl Into<String>) -> Self {
        Self {
            field: FieldTarget::Skip,
            confidence: Confidence::Low,
            reason: reason.into(),
            score: 0.0,
        }
    }

    pub fn is_skip(&self) -> bool {
        self.field.is_skip()
    }
}

/// A source column paired with the decision taken for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAssignment {
    pub source_name: String,
    pub assignment: FieldAssignment,
}
