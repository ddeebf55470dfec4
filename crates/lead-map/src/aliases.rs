//! Known header variations for destination fields.
//!
//! Lead list providers export the same data under a handful of recurring
//! header names (`Situs Address`, `Just Value`, `Parcel ID`, ...). An
//! [`AliasTable`] records those variations so the engine can assign them
//! without scoring. Variations are stored normalized with
//! [`normalize_name`], so `"Situs-Address"` and `"situs address"` are the
//! same alias.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{MappingError, Result};
use crate::similarity::normalize_name;

/// Built-in variations for the property lead schema.
pub const COLUMN_ALIASES_TOML: &str = include_str!("../data/column_aliases.toml");

#[derive(Debug, Deserialize)]
struct AliasDocument {
    #[serde(default)]
    aliases: BTreeMap<String, Vec<String>>,
}

/// Normalized header variation to destination key lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    by_alias: BTreeMap<String, String>,
    by_field: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table for the property lead schema.
    pub fn standard() -> Result<Self> {
        Self::parse(COLUMN_ALIASES_TOML, "built-in column aliases")
    }

    /// Parses an `[aliases]` table of `field_key = ["variation", ...]`.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Self::parse(contents, "column aliases")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, &path.display().to_string())
    }

    fn parse(contents: &str, origin: &str) -> Result<Self> {
        let document: AliasDocument =
            toml::from_str(contents).map_err(|source| MappingError::Toml {
                origin: origin.to_string(),
                source,
            })?;
        let mut table = Self::new();
        for (field, variations) in document.aliases {
            for variation in variations {
                table.insert(&field, &variation)?;
            }
        }
        Ok(table)
    }

    /// Registers a variation for a field.
    ///
    /// Variations that normalize to nothing are ignored. Registering the same
    /// variation twice for one field is a no-op; registering it for a second
    /// field fails with [`MappingError::AliasConflict`].
    pub fn insert(&mut self, field: &str, variation: &str) -> Result<()> {
        let alias = normalize_name(variation);
        if alias.is_empty() {
            return Ok(());
        }
        if let Some(existing) = self.by_alias.get(&alias) {
            if existing == field {
                return Ok(());
            }
            return Err(MappingError::AliasConflict {
                alias,
                first: existing.clone(),
                second: field.to_string(),
            });
        }
        self.by_field
            .entry(field.to_string())
            .or_default()
            .push(alias.clone());
        self.by_alias.insert(alias, field.to_string());
        Ok(())
    }

    /// Destination key for a raw column name, if it is a known variation.
    pub fn lookup(&self, column_name: &str) -> Option<&str> {
        self.by_alias
            .get(&normalize_name(column_name))
            .map(String::as_str)
    }

    /// Normalized variations registered for a field, in insertion order.
    pub fn variations(&self, field: &str) -> &[String] {
        self.by_field.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fields that have at least one variation.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.by_field.keys().map(String::as_str)
    }

    /// Number of variations.
    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = AliasTable::standard().unwrap();
        assert!(!table.is_empty());
        assert_eq!(table.lookup("Situs Address"), Some("address"));
        assert_eq!(table.lookup("SITUS_ADDRESS"), Some("address"));
        assert_eq!(table.lookup("Notes"), None);
        assert!(table.variations("address").contains(&"propertyaddress".to_string()));
    }

    #[test]
    fn test_insert_is_idempotent_per_field() {
        let mut table = AliasTable::new();
        table.insert("owner_name", "Owner Name").unwrap();
        table.insert("owner_name", "owner-name").unwrap();
        table.insert("owner_name", "---").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.variations("owner_name"), ["ownername".to_string()]);
        assert!(table.variations("city").is_empty());
    }

    #[test]
    fn test_conflicting_alias() {
        let err = AliasTable::from_toml_str(
            r#"
[aliases]
address = ["Site Address"]
owner_address = ["site_address"]
"#,
        )
        .unwrap_err();
        match err {
            MappingError::AliasConflict {
                alias,
                first,
                second,
            } => {
                assert_eq!(alias, "siteaddress");
                assert_eq!(first, "address");
                assert_eq!(second, "owner_address");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_table_is_empty() {
        let table = AliasTable::from_toml_str("").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.fields().count(), 0);
    }
}
