//! Content pattern detection over sample values.
//!
//! Each [`ContentPattern`] is a named regular expression tested against a
//! trimmed sample value. [`PatternDetector`] evaluates its patterns in
//! priority order and reports the first one matched by more than the
//! configured share of samples.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{MappingError, Result};

/// Street address: house number, one or more words, street-type suffix.
pub const ADDRESS: &str = "address";
/// `(XXX) XXX-XXXX` or `XXX-XXX-XXXX` style phone numbers.
pub const PHONE: &str = "phone";
/// Money amounts such as `$1,250.00` or `350,000`.
pub const CURRENCY: &str = "currency";
/// Five digit ZIP codes with optional `+4` suffix.
pub const POSTAL_CODE: &str = "postal_code";
/// `local@domain.tld` email addresses. Detected but bound to no field by default.
pub const EMAIL: &str = "email";
/// Four digit years from 1900 to 2099.
pub const YEAR: &str = "year";
/// Two uppercase letters.
pub const STATE_CODE: &str = "state_code";

static STANDARD_PATTERNS: LazyLock<Vec<ContentPattern>> = LazyLock::new(|| {
    [
        (
            ADDRESS,
            r"(?i)\d+(?:\s+\w+)+?\s+(?:st|street|ave|avenue|rd|road|dr|drive|blvd|boulevard|ln|lane|ct|court|way|pl|place)\b",
        ),
        (PHONE, r"(\(\d{3}\)\s*\d{3}[-.]?\d{4})|(\d{3}[-.]?\d{3}[-.]?\d{4})"),
        (CURRENCY, r"^\$?\d{1,3}(,\d{3})*(\.\d{2})?$"),
        (POSTAL_CODE, r"^\d{5}(-\d{4})?$"),
        (EMAIL, r"^[^\s@]+@[^\s@]+\.[^\s@]+$"),
        (YEAR, r"^(19|20)\d{2}$"),
        (STATE_CODE, r"^[A-Z]{2}$"),
    ]
    .into_iter()
    .map(|(name, pattern)| ContentPattern {
        name: name.to_string(),
        regex: Regex::new(pattern).expect("Invalid built-in content pattern"),
    })
    .collect()
});

/// A named recognizer for the shape of column values.
#[derive(Debug, Clone)]
pub struct ContentPattern {
    name: String,
    regex: Regex,
}

impl ContentPattern {
    /// Compiles a pattern, failing with [`MappingError::InvalidPattern`].
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let regex = Regex::new(pattern).map_err(|source| MappingError::InvalidPattern {
            name: name.clone(),
            source,
        })?;
        Ok(Self { name, regex })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tests one sample; surrounding whitespace is ignored.
    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value.trim())
    }
}

/// Ordered list of content patterns with a majority threshold.
#[derive(Debug, Clone)]
pub struct PatternDetector {
    patterns: Vec<ContentPattern>,
    majority: f64,
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::standard()
    }
}

impl PatternDetector {
    /// The built-in patterns in priority order: address, phone, currency,
    /// postal code, email, year, state code.
    pub fn standard() -> Self {
        Self {
            patterns: STANDARD_PATTERNS.clone(),
            majority: 0.5,
        }
    }

    /// A detector with no patterns.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            majority: 0.5,
        }
    }

    /// Sets the share of samples a pattern must exceed.
    #[must_use]
    pub fn with_majority(mut self, majority: f64) -> Self {
        self.majority = majority;
        self
    }

    /// Appends a pattern with the lowest priority.
    #[must_use]
    pub fn with_pattern(mut self, pattern: ContentPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn patterns(&self) -> &[ContentPattern] {
        &self.patterns
    }

    pub fn majority(&self) -> f64 {
        self.majority
    }

    /// Returns the first pattern matched by more than `majority` of the
    /// samples, or `None` when there are no samples or no pattern qualifies.
    pub fn detect<S: AsRef<str>>(&self, samples: &[S]) -> Option<&ContentPattern> {
        if samples.is_empty() {
            return None;
        }
        let required = samples.len() as f64 * self.majority;
        self.patterns.iter().find(|pattern| {
            let hits = samples
                .iter()
                .filter(|value| pattern.matches(value.as_ref()))
                .count();
            hits as f64 > required
        })
    }

    /// Name of the detected pattern, if any.
    pub fn detect_name<S: AsRef<str>>(&self, samples: &[S]) -> Option<&str> {
        self.detect(samples).map(ContentPattern::name)
    }
}
