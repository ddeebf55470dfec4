//! Combined fields: new columns built by joining existing ones.
//!
//! Lead lists often split one destination value over several columns
//! (first and last name, street and city). A [`CombinedField`] joins them
//! into a single column that is then mapped like any other.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::csv::CsvTable;
use crate::error::{IngestError, Result};

/// Separator value meaning "join without anything in between".
pub const NO_SEPARATOR: &str = "__NONE__";

/// Cleanup applied to each source value before joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupRule {
    Trim,
    Uppercase,
    Lowercase,
    /// Keeps ASCII letters, digits and whitespace.
    RemoveSpecialChars,
    /// Collapses whitespace runs into one space.
    RemoveDuplicateSpaces,
    /// Drops blank source values before joining instead of joining them.
    RemoveEmptyValues,
}

impl CleanupRule {
    /// Applies this rule to a single value. [`CleanupRule::RemoveEmptyValues`]
    /// works on the value list and leaves single values unchanged.
    pub fn apply(&self, value: &str) -> String {
        match self {
            Self::Trim => value.trim().to_string(),
            Self::Uppercase => value.to_uppercase(),
            Self::Lowercase => value.to_lowercase(),
            Self::RemoveSpecialChars => value
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
                .collect(),
            Self::RemoveDuplicateSpaces => collapse_whitespace(value),
            Self::RemoveEmptyValues => value.to_string(),
        }
    }
}

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace pattern"));

fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RUN.replace_all(value, " ").into_owned()
}

fn default_separator() -> String {
    " ".to_string()
}

/// A column derived by joining source columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedField {
    /// Name of the new column.
    pub name: String,
    /// Columns joined, in order.
    pub source_columns: Vec<String>,
    /// Placed between values; [`NO_SEPARATOR`] joins them directly.
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default)]
    pub cleanup_rules: Vec<CleanupRule>,
}

impl CombinedField {
    pub fn new<I, S>(name: impl Into<String>, source_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            source_columns: source_columns.into_iter().map(Into::into).collect(),
            separator: default_separator(),
            cleanup_rules: Vec::new(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = CleanupRule>) -> Self {
        self.cleanup_rules = rules.into_iter().collect();
        self
    }

    fn joiner(&self) -> &str {
        if self.separator == NO_SEPARATOR {
            ""
        } else {
            &self.separator
        }
    }

    fn has_rule(&self, rule: CleanupRule) -> bool {
        self.cleanup_rules.contains(&rule)
    }
}

/// Applies every rule, in order, to one value.
pub fn apply_cleanup(value: &str, rules: &[CleanupRule]) -> String {
    rules
        .iter()
        .fold(value.to_string(), |current, rule| rule.apply(&current))
}

/// Joins the given source values according to `field`.
///
/// Values are passed in `field.source_columns` order; a missing value is
/// treated as empty.
pub fn combine_values<'a, I>(field: &CombinedField, values: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let drop_empty = field.has_rule(CleanupRule::RemoveEmptyValues);
    values
        .into_iter()
        .map(Option::unwrap_or_default)
        .filter(|value| !drop_empty || !value.trim().is_empty())
        .map(|value| apply_cleanup(value, &field.cleanup_rules))
        .collect::<Vec<_>>()
        .join(field.joiner())
}

/// Problems found in a combined field definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombineIssue {
    #[error("field name is required")]
    EmptyName,

    #[error("at least one source column is required")]
    NoSourceColumns,

    #[error("columns not found: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("a column named '{0}' already exists")]
    NameCollision(String),
}

/// Checks a definition against the columns available in a table.
///
/// Returns every issue found; an empty list means the field is usable.
pub fn validate_combined_field(field: &CombinedField, available: &[String]) -> Vec<CombineIssue> {
    let mut issues = Vec::new();
    let name = field.name.trim();

    if name.is_empty() {
        issues.push(CombineIssue::EmptyName);
    } else if available.iter().any(|column| column == name) {
        issues.push(CombineIssue::NameCollision(name.to_string()));
    }

    if field.source_columns.is_empty() {
        issues.push(CombineIssue::NoSourceColumns);
    }

    let missing: Vec<String> = field
        .source_columns
        .iter()
        .filter(|column| !available.contains(column))
        .cloned()
        .collect();
    if !missing.is_empty() {
        issues.push(CombineIssue::MissingColumns(missing));
    }

    issues
}

/// Appends one column per combined field to `table`.
///
/// Fields are validated against the columns present when they are added, so
/// a later field may use an earlier one as a source.
pub fn add_combined_columns(table: &mut CsvTable, fields: &[CombinedField]) -> Result<()> {
    for field in fields {
        if let Some(issue) = validate_combined_field(field, table.headers())
            .into_iter()
            .next()
        {
            return Err(IngestError::CombinedField {
                name: field.name.clone(),
                source: issue,
            });
        }

        let indices: Vec<Option<usize>> = field
            .source_columns
            .iter()
            .map(|column| table.column_index(column))
            .collect();
        let values = table
            .rows()
            .iter()
            .map(|row| {
                combine_values(
                    field,
                    indices.iter().map(|index| index.map(|i| row[i].as_str())),
                )
            })
            .collect();
        table.push_column(field.name.trim(), values)?;
    }
    Ok(())
}

/// Combinations recognised in common lead-list exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinePreset {
    FullAddress,
    PropertyAddressOnly,
    FullName,
    OwnerFullName,
}

const MAILING_ADDRESS: &str = "Owner Fix - Mailing Address";
const MAILING_CITY: &str = "Owner Fix - Mailing City";
const MAILING_STATE: &str = "Owner Fix - Mailing State";
const INPUT_FIRST_NAME: &str = "Input First Name";
const INPUT_LAST_NAME: &str = "Input Last Name";
const OWNER_FIRST_NAME: &str = "Owner Fix - First Name";
const OWNER_LAST_NAME: &str = "Owner Fix - Last Name";

impl CombinePreset {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FullAddress => "Full Address",
            Self::PropertyAddressOnly => "Property Address Only",
            Self::FullName => "Full Name",
            Self::OwnerFullName => "Owner Full Name",
        }
    }

    fn source_columns(&self) -> &'static [&'static str] {
        match self {
            Self::FullAddress => &[MAILING_ADDRESS, MAILING_CITY, MAILING_STATE],
            Self::PropertyAddressOnly => &[MAILING_ADDRESS],
            Self::FullName => &[INPUT_FIRST_NAME, INPUT_LAST_NAME],
            Self::OwnerFullName => &[OWNER_FIRST_NAME, OWNER_LAST_NAME],
        }
    }

    /// Builds the preset restricted to the columns that exist, or `None` when
    /// none of its source columns are present.
    pub fn build(&self, available: &[String]) -> Option<CombinedField> {
        let present: Vec<&str> = self
            .source_columns()
            .iter()
            .copied()
            .filter(|column| available.iter().any(|a| a == column))
            .collect();
        if present.is_empty() {
            return None;
        }

        let field = CombinedField::new(self.name(), present);
        Some(match self {
            Self::PropertyAddressOnly => field
                .with_separator(NO_SEPARATOR)
                .with_rules([CleanupRule::Trim]),
            _ => field.with_rules([CleanupRule::Trim, CleanupRule::RemoveEmptyValues]),
        })
    }
}

/// Proposes combined fields for the columns of a table.
///
/// Mailing address with city becomes a full address, a lone mailing address
/// becomes the property address, and first/last name pairs become full names.
pub fn suggest_combined_fields(available: &[String]) -> Vec<CombinedField> {
    let has = |column: &str| available.iter().any(|a| a == column);
    let mut presets = Vec::new();

    if has(MAILING_ADDRESS) {
        if has(MAILING_CITY) {
            presets.push(CombinePreset::FullAddress);
        } else {
            presets.push(CombinePreset::PropertyAddressOnly);
        }
    }
    if has(INPUT_FIRST_NAME) && has(INPUT_LAST_NAME) {
        presets.push(CombinePreset::FullName);
    }
    if has(OWNER_FIRST_NAME) && has(OWNER_LAST_NAME) {
        presets.push(CombinePreset::OwnerFullName);
    }

    presets
        .into_iter()
        .filter_map(|preset| preset.build(available))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse_csv_str;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_cleanup_rules() {
        assert_eq!(CleanupRule::Trim.apply("  Elm  "), "Elm");
        assert_eq!(CleanupRule::Uppercase.apply("elm st"), "ELM ST");
        assert_eq!(CleanupRule::RemoveSpecialChars.apply("12-B Elm St.#4"), "12B Elm St4");
        assert_eq!(
            CleanupRule::RemoveDuplicateSpaces.apply("100   Elm \t St"),
            "100 Elm St"
        );
        assert_eq!(
            CleanupRule::RemoveDuplicateSpaces.apply("\n Jane\r\n\n Doe "),
            " Jane Doe "
        );
        assert_eq!(
            apply_cleanup("  100  elm st ", &[CleanupRule::Trim, CleanupRule::Uppercase]),
            "100  ELM ST"
        );
    }

    #[test]
    fn test_combine_values() {
        let field = CombinedField::new("Full Name", ["First", "Last"]);
        assert_eq!(combine_values(&field, [Some("Jane"), Some("Doe")]), "Jane Doe");
        assert_eq!(combine_values(&field, [Some(""), Some("Doe")]), " Doe");

        let field = field.with_rules([CleanupRule::Trim, CleanupRule::RemoveEmptyValues]);
        assert_eq!(combine_values(&field, [Some("  "), Some("Doe ")]), "Doe");
        assert_eq!(combine_values(&field, [None, Some("Doe")]), "Doe");

        let field = CombinedField::new("Code", ["A", "B"]).with_separator(NO_SEPARATOR);
        assert_eq!(combine_values(&field, [Some("FL"), Some("33101")]), "FL33101");
    }

    #[test]
    fn test_validate() {
        let available = columns(&["First", "Last"]);
        assert!(validate_combined_field(&CombinedField::new("Name", ["First", "Last"]), &available).is_empty());

        let issues = validate_combined_field(&CombinedField::new(" ", Vec::<String>::new()), &available);
        assert_eq!(issues, [CombineIssue::EmptyName, CombineIssue::NoSourceColumns]);

        let issues = validate_combined_field(&CombinedField::new("First", ["Middle"]), &available);
        assert_eq!(
            issues,
            [
                CombineIssue::NameCollision("First".to_string()),
                CombineIssue::MissingColumns(vec!["Middle".to_string()]),
            ]
        );
    }

    #[test]
    fn test_add_combined_columns() {
        let mut table = parse_csv_str("First,Last\nJane,Doe\n,Smith\n").unwrap();
        let field = CombinedField::new("Full Name", ["First", "Last"])
            .with_rules([CleanupRule::RemoveEmptyValues]);
        add_combined_columns(&mut table, &[field]).unwrap();
        assert_eq!(table.value(0, "Full Name"), Some("Jane Doe"));
        assert_eq!(table.value(1, "Full Name"), Some("Smith"));

        let bad = CombinedField::new("Other", ["Missing"]);
        assert!(matches!(
            add_combined_columns(&mut table, &[bad]),
            Err(IngestError::CombinedField { source: CombineIssue::MissingColumns(_), .. })
        ));
    }

    #[test]
    fn test_suggestions() {
        let available = columns(&[
            "Owner Fix - Mailing Address",
            "Owner Fix - Mailing City",
            "Input First Name",
            "Input Last Name",
            "Owner Fix - First Name",
        ]);
        let suggested = suggest_combined_fields(&available);
        let names: Vec<&str> = suggested.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Full Address", "Full Name"]);
        assert_eq!(
            suggested[0].source_columns,
            ["Owner Fix - Mailing Address", "Owner Fix - Mailing City"]
        );

        let available = columns(&["Owner Fix - Mailing Address"]);
        let suggested = suggest_combined_fields(&available);
        assert_eq!(suggested[0].name, "Property Address Only");
        assert_eq!(suggested[0].separator, NO_SEPARATOR);
    }

    #[test]
    fn test_deserialize_defaults() {
        let field: CombinedField =
            serde_json::from_str(r#"{"name":"Full Name","source_columns":["A","B"],"cleanup_rules":["remove_empty_values"]}"#)
                .unwrap();
        assert_eq!(field.separator, " ");
        assert_eq!(field.cleanup_rules, [CleanupRule::RemoveEmptyValues]);
    }
}
