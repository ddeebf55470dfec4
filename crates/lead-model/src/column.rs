//! Source columns observed in imported data.

use serde::{Deserialize, Serialize};

/// Maximum number of sample values kept per source column.
pub const MAX_SAMPLE_VALUES: usize = 20;

/// One column of an uploaded file together with the values used for content inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceColumn {
    /// Raw header string as it appears in the source.
    pub name: String,
    /// Non-empty, trimmed values in the order they were observed.
    pub sample_values: Vec<String>,
}

impl SourceColumn {
    /// Creates a column, trimming samples, dropping blanks and keeping at most
    /// [`MAX_SAMPLE_VALUES`] of them.
    pub fn new<I, S>(name: impl Into<String>, samples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_limit(name, samples, MAX_SAMPLE_VALUES)
    }

    /// Same as [`SourceColumn::new`] with an explicit sample limit.
    pub fn with_limit<I, S>(name: impl Into<String>, samples: I, limit: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sample_values = samples
            .into_iter()
            .filter_map(|value| {
                let trimmed = value.as_ref().trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .take(limit)
            .collect();
        Self {
            name: name.into(),
            sample_values,
        }
    }

    /// A column known only by its header.
    pub fn header_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sample_values: Vec::new(),
        }
    }

    pub fn has_samples(&self) -> bool {
        !self.sample_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_and_drops_blanks() {
        let column = SourceColumn::new("Phone", ["  555-123-4567 ", "", "   ", "555.987.6543"]);
        assert_eq!(column.sample_values, vec!["555-123-4567", "555.987.6543"]);
    }

    #[test]
    fn test_new_caps_samples() {
        let values: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let column = SourceColumn::new("Id", &values);
        assert_eq!(column.sample_values.len(), MAX_SAMPLE_VALUES);
        assert_eq!(column.sample_values[0], "0");
        assert_eq!(column.sample_values[19], "19");
    }

    #[test]
    fn test_header_only() {
        let column = SourceColumn::header_only("Notes");
        assert!(!column.has_samples());
    }
}
