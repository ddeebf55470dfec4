//! Destination schema fields.

use serde::{Deserialize, Serialize};

/// Section of the property record a destination field belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    /// Location of the property itself.
    #[default]
    Basic,
    /// Owner contact details.
    Owner,
    /// Physical characteristics of the property.
    Property,
    /// Valuation and offer amounts.
    Financial,
    /// Bookkeeping fields used by the lead pipeline.
    System,
}

impl FieldGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Owner => "owner",
            Self::Property => "property",
            Self::Financial => "financial",
            Self::System => "system",
        }
    }
}

/// One field of the fixed target schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationField {
    /// Stable identifier (e.g. `owner_phone`).
    pub key: String,
    /// Human-readable name (e.g. "Owner Phone").
    pub label: String,
    /// Whether the import workflow demands this field be mapped.
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub group: FieldGroup,
}

impl DestinationField {
    pub fn new(key: impl Into<String>, label: impl Into<String>, required: bool) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            required,
            group: FieldGroup::default(),
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: FieldGroup) -> Self {
        self.group = group;
        self
    }
}
