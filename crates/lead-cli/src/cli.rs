//! CLI argument definitions for `lead-import`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use lead_cli::pipeline::{ColumnOverrides, MappingOptions, ScoringPreset};
use lead_model::MAX_SAMPLE_VALUES;

#[derive(Parser)]
#[command(
    name = "lead-import",
    version,
    about = "Map lead-list CSV columns onto the property schema",
    long_about = "Suggest, for every column of a lead-list CSV export, the destination \
                  property field it holds.\n\n\
                  Suggestions combine header similarity, recognised value formats and \
                  known header variations. Reviewed mappings can be stored as templates \
                  and reused for the next export from the same source."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow sample values (names, phones, addresses) in debug logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Suggest a destination field for every column of a CSV file.
    Map(MapArgs),

    /// Map a CSV file and write its rows keyed by destination field.
    Apply(ApplyArgs),

    /// List the destination fields.
    Fields(FieldsArgs),

    /// List stored mapping templates.
    Templates(TemplatesArgs),
}

#[derive(Args)]
pub struct MappingArgs {
    /// Destination schema TOML (default: built-in property schema).
    #[arg(long = "fields", value_name = "TOML")]
    pub fields: Option<PathBuf>,

    /// Scoring configuration TOML (overrides --preset).
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Built-in scoring preset.
    #[arg(long = "preset", value_enum, default_value = "default")]
    pub preset: PresetArg,

    /// Ignore known header variations and rely on scoring alone.
    #[arg(long = "no-aliases")]
    pub no_aliases: bool,

    /// Sample values inspected per column.
    #[arg(long = "samples", value_name = "N", default_value_t = MAX_SAMPLE_VALUES)]
    pub samples: usize,

    /// Add suggested combined columns (full name, full address) before mapping.
    #[arg(long = "combine")]
    pub combine: bool,

    /// Apply a stored template on top of the suggestions.
    #[arg(long = "template", value_name = "NAME")]
    pub template: Option<String>,

    /// Directory holding mapping templates.
    #[arg(long = "templates-dir", value_name = "DIR", default_value = ".lead-templates")]
    pub templates_dir: PathBuf,

    /// Leave a column out of the mapping (repeatable).
    #[arg(long = "skip", value_name = "COLUMN")]
    pub skip: Vec<String>,

    /// Map a column onto a field regardless of the suggestion (repeatable).
    #[arg(long = "assign", value_name = "COLUMN=FIELD", value_parser = parse_assignment)]
    pub assign: Vec<(String, String)>,

    /// Exit with status 1 when a required field is left unmapped.
    #[arg(long = "require-complete")]
    pub require_complete: bool,
}

impl MappingArgs {
    pub fn options(&self) -> MappingOptions {
        MappingOptions {
            fields: self.fields.clone(),
            config: self.config.clone(),
            preset: self.preset.into(),
            aliases: !self.no_aliases,
            sample_limit: self.samples,
            combine: self.combine,
        }
    }

    pub fn overrides(&self) -> ColumnOverrides {
        ColumnOverrides {
            skip: self.skip.clone(),
            assign: self.assign.clone(),
        }
    }
}

/// Parses `COLUMN=FIELD`, splitting on the last `=`.
fn parse_assignment(value: &str) -> Result<(String, String), String> {
    let (column, field) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected COLUMN=FIELD, got '{value}'"))?;
    let (column, field) = (column.trim(), field.trim());
    if column.is_empty() || field.is_empty() {
        return Err(format!("expected COLUMN=FIELD, got '{value}'"));
    }
    Ok((column.to_string(), field.to_string()))
}

#[derive(Args)]
pub struct MapArgs {
    /// Lead-list CSV file.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Print the mapping as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,

    /// Store the resulting mapping as a template under this name.
    #[arg(long = "save-template", value_name = "NAME")]
    pub save_template: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Lead-list CSV file.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Destination CSV with one column per mapped field.
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: PathBuf,

    #[command(flatten)]
    pub mapping: MappingArgs,
}

#[derive(Args)]
pub struct FieldsArgs {
    /// Destination schema TOML (default: built-in property schema).
    #[arg(long = "fields", value_name = "TOML")]
    pub fields: Option<PathBuf>,
}

#[derive(Args)]
pub struct TemplatesArgs {
    /// Directory holding mapping templates.
    #[arg(long = "templates-dir", value_name = "DIR", default_value = ".lead-templates")]
    pub templates_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PresetArg {
    Default,
    Strict,
    Relaxed,
}

impl From<PresetArg> for ScoringPreset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Default => ScoringPreset::Default,
            PresetArg::Strict => ScoringPreset::Strict,
            PresetArg::Relaxed => ScoringPreset::Relaxed,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("Phone 2 = owner_phone").unwrap(),
            ("Phone 2".to_string(), "owner_phone".to_string())
        );
        assert_eq!(
            parse_assignment("a=b=tags").unwrap(),
            ("a=b".to_string(), "tags".to_string())
        );
        assert!(parse_assignment("Phone 2").is_err());
        assert!(parse_assignment("=tags").is_err());
    }

    #[test]
    fn test_overrides_from_args() {
        let cli = Cli::parse_from([
            "lead-import",
            "apply",
            "leads.csv",
            "-o",
            "out.csv",
            "--skip",
            "Phone 2",
            "--assign",
            "Notes=tags",
        ]);
        let Command::Apply(args) = cli.command else {
            panic!("expected apply");
        };
        let overrides = args.mapping.overrides();
        assert_eq!(overrides.skip, ["Phone 2"]);
        assert_eq!(
            overrides.assign,
            [("Notes".to_string(), "tags".to_string())]
        );
    }
}
