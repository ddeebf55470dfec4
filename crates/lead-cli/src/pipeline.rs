//! Mapping pipeline shared by the `map` and `apply` commands.
//!
//! Stages: load the destination catalog and scoring configuration, read the
//! CSV file, optionally derive combined columns, sample every column, run the
//! engine, then optionally layer a stored template over the suggestions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, info_span};

use lead_ingest::{
    CombinedField, CsvTable, ProjectedTable, add_combined_columns, extract_source_columns,
    project_rows, read_csv_table, suggest_combined_fields, write_projected_csv,
};
use lead_map::{
    AliasTable, ColumnStatus, MappingEngine, MappingState, MappingSummary, ScoringConfig,
    TemplateApplication, TemplateRepository,
};
use lead_model::{Confidence, FieldCatalog, MAX_SAMPLE_VALUES, property_catalog};

use crate::logging::redact_value;

/// Built-in scoring configurations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoringPreset {
    #[default]
    Default,
    Strict,
    Relaxed,
}

impl ScoringPreset {
    pub fn config(&self) -> ScoringConfig {
        match self {
            Self::Default => ScoringConfig::default(),
            Self::Strict => ScoringConfig::strict(),
            Self::Relaxed => ScoringConfig::relaxed(),
        }
    }
}

/// Inputs shared by every mapping run.
#[derive(Debug, Clone)]
pub struct MappingOptions {
    /// Destination schema TOML; the built-in property schema when `None`.
    pub fields: Option<PathBuf>,
    /// Scoring TOML; takes precedence over `preset`.
    pub config: Option<PathBuf>,
    pub preset: ScoringPreset,
    /// Resolve known header variations before scoring.
    pub aliases: bool,
    /// Samples kept per column.
    pub sample_limit: usize,
    /// Add the suggested combined columns before mapping.
    pub combine: bool,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            fields: None,
            config: None,
            preset: ScoringPreset::Default,
            aliases: true,
            sample_limit: MAX_SAMPLE_VALUES,
            combine: false,
        }
    }
}

pub fn load_catalog(path: Option<&Path>) -> Result<FieldCatalog> {
    match path {
        Some(path) => FieldCatalog::from_path(path)
            .with_context(|| format!("load destination fields from {}", path.display())),
        None => property_catalog().context("load built-in property fields"),
    }
}

pub fn load_scoring(path: Option<&Path>, preset: ScoringPreset) -> Result<ScoringConfig> {
    match path {
        Some(path) => ScoringConfig::from_path(path)
            .with_context(|| format!("load scoring configuration from {}", path.display())),
        None => Ok(preset.config()),
    }
}

pub fn build_engine(options: &MappingOptions) -> Result<MappingEngine> {
    let catalog = load_catalog(options.fields.as_deref())?;
    let config = load_scoring(options.config.as_deref(), options.preset)?;
    let engine = MappingEngine::new(catalog, config).context("build mapping engine")?;
    if !options.aliases {
        return Ok(engine);
    }
    let aliases = AliasTable::standard().context("load column aliases")?;
    Ok(engine.with_aliases(aliases))
}

/// One file read and mapped, ready for review or output.
#[derive(Debug, Clone)]
pub struct MappingRun {
    pub source: PathBuf,
    pub table: CsvTable,
    /// Combined columns appended to `table`.
    pub combined: Vec<CombinedField>,
    pub state: MappingState,
}

pub fn run_mapping(
    path: &Path,
    engine: &MappingEngine,
    options: &MappingOptions,
) -> Result<MappingRun> {
    let span = info_span!("mapping", path = %path.display());
    let _guard = span.enter();

    let mut table = read_csv_table(path).with_context(|| format!("read {}", path.display()))?;

    let mut combined = if options.combine {
        suggest_combined_fields(table.headers())
    } else {
        Vec::new()
    };
    combined.retain(|field| table.column_index(&field.name).is_none());
    add_combined_columns(&mut table, &combined).context("add combined columns")?;
    for field in &combined {
        info!(
            column = %field.name,
            sources = field.source_columns.len(),
            "Combined column added"
        );
    }

    let columns = extract_source_columns(&table, options.sample_limit);
    for column in &columns {
        debug!(
            column = %column.name,
            samples = column.sample_values.len(),
            first = column.sample_values.first().map_or("-", |v| redact_value(v)),
            "Column sampled"
        );
    }

    let state = MappingState::from_engine(engine, &columns);
    Ok(MappingRun {
        source: path.to_path_buf(),
        table,
        combined,
        state,
    })
}

/// Loads a stored template, layers it over `state` and bumps its usage count.
pub fn apply_stored_template(
    state: &mut MappingState,
    repository: &TemplateRepository,
    name: &str,
) -> Result<TemplateApplication> {
    let template = repository
        .load(name)?
        .with_context(|| format!("template '{name}' not found"))?;
    let outcome = state.apply_template(&template);
    repository.record_use(name)?;
    Ok(outcome)
}

/// Column decisions given by the operator for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnOverrides {
    /// Columns to leave out of the output.
    pub skip: Vec<String>,
    /// `(column, field)` pairs assigned regardless of the suggestion.
    pub assign: Vec<(String, String)>,
}

/// Layers operator overrides over `state`.
///
/// Skips are applied before assignments, so a field can be moved from one
/// column to another in a single run.
pub fn apply_overrides(state: &mut MappingState, overrides: &ColumnOverrides) -> Result<()> {
    for column in &overrides.skip {
        state
            .skip(column)
            .with_context(|| format!("skip column '{column}'"))?;
        info!(column = %column, "Column skipped by operator");
    }
    for (column, field) in &overrides.assign {
        state
            .assign(column, field)
            .with_context(|| format!("assign column '{column}' to '{field}'"))?;
        info!(column = %column, field = %field, "Column assigned by operator");
    }
    Ok(())
}

/// Saves the effective decisions of `state` under `name`.
///
/// Replacing an existing template keeps its description, creation time and
/// usage count.
pub fn save_template(
    state: &MappingState,
    repository: &TemplateRepository,
    name: &str,
) -> Result<PathBuf> {
    let mut template = state.to_template(name);
    if let Some(existing) = repository.load(name)? {
        template.description = existing.description;
        template.created_at = existing.created_at;
        template.usage_count = existing.usage_count;
    }
    repository.save(&template)
}

/// Projects the run's rows onto the effective mapping and writes them.
pub fn write_output(run: &MappingRun, output: &Path) -> Result<ProjectedTable> {
    let projected = project_rows(&run.table, &run.state.entries())
        .context("project rows onto destination fields")?;
    write_projected_csv(&projected, output)?;
    Ok(projected)
}

/// Process exit status for a finished `map` or `apply` run.
///
/// Non-zero on error, and when `require_complete` is set while a required
/// field is left unmapped.
pub fn mapping_exit_code(result: &Result<MappingSummary>, require_complete: bool) -> i32 {
    match result {
        Ok(summary) if require_complete && !summary.is_complete() => 1,
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// One column of a [`MappingReport`].
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub column: String,
    pub field: String,
    pub confidence: Confidence,
    pub score: f64,
    pub status: ColumnStatus,
    pub reason: String,
}

/// Serializable view of a mapping run.
#[derive(Debug, Clone, Serialize)]
pub struct MappingReport {
    /// File name of the mapped CSV.
    pub source: String,
    pub columns: Vec<ReportRow>,
    pub summary: MappingSummary,
}

impl MappingRun {
    pub fn report(&self) -> MappingReport {
        let columns = self
            .state
            .entries()
            .into_iter()
            .map(|entry| ReportRow {
                status: self
                    .state
                    .status(&entry.source_name)
                    .unwrap_or(ColumnStatus::Unmatched),
                column: entry.source_name,
                field: entry.assignment.field.to_string(),
                confidence: entry.assignment.confidence,
                score: entry.assignment.score,
                reason: entry.assignment.reason,
            })
            .collect();
        let source = self
            .source
            .file_name()
            .map_or_else(|| self.source.display().to_string(), |name| {
                name.to_string_lossy().into_owned()
            });
        MappingReport {
            source,
            columns,
            summary: self.state.summary(),
        }
    }
}
