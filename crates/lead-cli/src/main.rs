//! `lead-import` command-line tool.

use clap::{ColorChoice, Parser};
use lead_cli::logging::{LogConfig, LogFormat, init_logging};
use lead_cli::pipeline::mapping_exit_code;
use lead_map::MappingSummary;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_apply, run_fields, run_map, run_templates};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Map(args) => report_mapping(run_map(args), args.mapping.require_complete),
        Command::Apply(args) => report_mapping(run_apply(args), args.mapping.require_complete),
        Command::Fields(args) => exit_code(run_fields(args)),
        Command::Templates(args) => exit_code(run_templates(args)),
    };
    std::process::exit(exit_code);
}

fn report_mapping(result: anyhow::Result<MappingSummary>, require_complete: bool) -> i32 {
    match &result {
        Ok(summary) if require_complete && !summary.is_complete() => eprintln!(
            "error: required fields not mapped: {}",
            summary.missing_required.join(", ")
        ),
        Ok(_) => {}
        Err(error) => eprintln!("error: {error:#}"),
    }
    mapping_exit_code(&result, require_complete)
}

fn exit_code(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !(cli.verbosity.is_present() || cli.log_level.is_some()),
        log_file: cli.log_file.clone(),
        log_data: cli.log_data,
        ..LogConfig::default()
    };
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
