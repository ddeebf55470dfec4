use anyhow::{Context, Result, bail};
use tracing::info;

use lead_cli::pipeline::{
    MappingRun, apply_overrides, apply_stored_template, build_engine, load_catalog, run_mapping,
    save_template, write_output,
};
use lead_map::{MappingSummary, TemplateRepository};

use crate::cli::{ApplyArgs, FieldsArgs, MapArgs, MappingArgs, TemplatesArgs};
use crate::summary::{print_fields, print_mapping, print_template_outcome, print_templates};

pub fn run_map(args: &MapArgs) -> Result<MappingSummary> {
    let run = map_file(&args.csv, &args.mapping, !args.json)?;
    let report = run.report();

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("serialize mapping")?;
        println!("{json}");
    } else {
        print_mapping(&report);
    }

    if let Some(name) = &args.save_template {
        let repository = TemplateRepository::new(&args.mapping.templates_dir)?;
        let path = save_template(&run.state, &repository, name)?;
        info!(template = %name, path = %path.display(), "Template saved");
        if !args.json {
            println!("Template '{name}' saved to {}", path.display());
        }
    }
    Ok(report.summary)
}

pub fn run_apply(args: &ApplyArgs) -> Result<MappingSummary> {
    let run = map_file(&args.csv, &args.mapping, true)?;
    let report = run.report();
    print_mapping(&report);

    let duplicates = &report.summary.duplicate_targets;
    if !duplicates.is_empty() {
        bail!(
            "fields targeted by more than one column: {}; resolve with --skip COLUMN or --assign COLUMN=FIELD",
            duplicates.join(", ")
        );
    }
    let projected = write_output(&run, &args.output)?;
    println!(
        "Wrote {} records with {} fields to {}",
        projected.record_count(),
        projected.fields.len(),
        args.output.display()
    );
    Ok(report.summary)
}

pub fn run_fields(args: &FieldsArgs) -> Result<()> {
    let catalog = load_catalog(args.fields.as_deref())?;
    print_fields(&catalog);
    Ok(())
}

pub fn run_templates(args: &TemplatesArgs) -> Result<()> {
    let repository = TemplateRepository::new(&args.templates_dir)?;
    print_templates(&repository.list()?);
    Ok(())
}

fn map_file(
    csv: &std::path::Path,
    args: &MappingArgs,
    announce_template: bool,
) -> Result<MappingRun> {
    let options = args.options();
    let engine = build_engine(&options)?;
    let mut run = run_mapping(csv, &engine, &options)?;

    if let Some(name) = &args.template {
        let repository = TemplateRepository::new(&args.templates_dir)?;
        let outcome = apply_stored_template(&mut run.state, &repository, name)?;
        if announce_template {
            print_template_outcome(name, &outcome);
        }
    }
    apply_overrides(&mut run.state, &args.overrides())?;
    Ok(run)
}
