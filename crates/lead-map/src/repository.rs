//! Template repository for persisting and reusing column mappings.
//!
//! # Storage Format
//!
//! Each template is a pretty-printed JSON file named after the sanitized
//! template name: `County Export (2024)` is stored as
//! `county_export__2024_.json`. Names that sanitize to the same file are
//! rejected instead of overwriting each other.
//!
//! The repository supports:
//! - Saving, loading and deleting templates by name
//! - Listing stored templates with summary metadata
//! - Recording template use (usage counter and timestamp)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use lead_model::MappingTemplate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Directory-backed store of [`MappingTemplate`]s.
#[derive(Debug, Clone)]
pub struct TemplateRepository {
    base_dir: PathBuf,
}

/// Metadata about a stored template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub name: String,
    pub description: String,
    /// File path where the template is stored.
    pub file_path: PathBuf,
    /// Number of entries that target a field.
    pub mapped_count: usize,
    pub usage_count: u32,
    pub updated_at: DateTime<Utc>,
}

impl TemplateRepository {
    /// Create a repository at the given directory.
    ///
    /// The directory will be created if it doesn't exist.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).with_context(|| {
            format!(
                "Failed to create template repository: {}",
                base_dir.display()
            )
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Save a template, replacing any template stored under the same name.
    ///
    /// Fails when the file already holds a template with a different name.
    pub fn save(&self, template: &MappingTemplate) -> Result<PathBuf> {
        let path = self.template_path(&template.name)?;
        if let Ok(existing) = read_template(&path) {
            ensure_same_name(&existing, &template.name, &path)?;
        }
        let json = serde_json::to_string_pretty(template)
            .with_context(|| format!("Failed to serialize template '{}'", template.name))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write template to {}", path.display()))?;
        debug!(template = %template.name, path = %path.display(), "template saved");
        Ok(path)
    }

    /// Load a template by name. Returns `None` if it doesn't exist.
    pub fn load(&self, name: &str) -> Result<Option<MappingTemplate>> {
        let path = self.template_path(name)?;
        if !path.exists() {
            return Ok(None);
        }
        let template = read_template(&path)?;
        ensure_same_name(&template, name, &path)?;
        Ok(Some(template))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.template_path(name).is_ok_and(|path| path.exists())
    }

    /// Delete a template. Returns whether a file was removed.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.template_path(name)?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete template: {}", path.display()))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Bump the usage counter of a stored template and persist it.
    pub fn record_use(&self, name: &str) -> Result<MappingTemplate> {
        let Some(mut template) = self.load(name)? else {
            bail!("Template not found: {name}");
        };
        template.touch();
        self.save(&template)?;
        Ok(template)
    }

    /// List stored templates, sorted by name.
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn list(&self) -> Result<Vec<TemplateMetadata>> {
        let mut metadata = Vec::new();

        for entry in fs::read_dir(&self.base_dir).with_context(|| {
            format!(
                "Failed to read template repository: {}",
                self.base_dir.display()
            )
        })? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_template(&path) {
                Ok(template) => metadata.push(TemplateMetadata {
                    mapped_count: template.mapped_count(),
                    name: template.name,
                    description: template.description,
                    file_path: path,
                    usage_count: template.usage_count,
                    updated_at: template.updated_at,
                }),
                Err(error) => warn!(path = %path.display(), "skipping unreadable template: {error:#}"),
            }
        }

        metadata.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(metadata)
    }

    fn template_path(&self, name: &str) -> Result<PathBuf> {
        let stem = template_file_stem(name);
        if stem.is_empty() {
            bail!("Template name must not be empty");
        }
        Ok(self.base_dir.join(format!("{stem}.json")))
    }
}

fn read_template(path: &Path) -> Result<MappingTemplate> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse template from {}", path.display()))
}

fn ensure_same_name(stored: &MappingTemplate, name: &str, path: &Path) -> Result<()> {
    if stored.name.trim() != name.trim() {
        bail!(
            "Template '{name}' conflicts with template '{}' stored in {}",
            stored.name,
            path.display()
        );
    }
    Ok(())
}

/// Normalize a template name for use in filenames.
fn template_file_stem(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
