use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use lead_cli::pipeline::{MappingReport, ReportRow};
use lead_map::{ColumnStatus, MappingSummary, TemplateApplication, TemplateMetadata};
use lead_model::{Confidence, FieldCatalog, SKIP_KEY};

pub fn print_mapping(report: &MappingReport) {
    println!("File: {}", report.source);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Confidence"),
        header_cell("Score"),
        header_cell("Source"),
        header_cell("Reason"),
    ]);
    apply_mapping_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for row in &report.columns {
        table.add_row(vec![
            Cell::new(&row.column),
            field_cell(row),
            confidence_cell(row),
            score_cell(row),
            status_cell(row.status),
            dim_cell(&row.reason),
        ]);
    }
    println!("{table}");
    print_totals(&report.summary);
}

fn print_totals(summary: &MappingSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Columns"),
        header_cell("Mapped"),
        header_cell("Skipped"),
        header_cell("Review"),
        header_cell("Required"),
    ]);
    apply_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.total_columns).add_attribute(Attribute::Bold),
        Cell::new(summary.mapped),
        count_cell(summary.skipped, Color::DarkGrey),
        count_cell(summary.needs_review, Color::Yellow),
        required_cell(summary),
    ]);
    println!("{table}");

    if !summary.missing_required.is_empty() {
        eprintln!("Missing required fields:");
        for key in &summary.missing_required {
            eprintln!("- {key}");
        }
    }
    if !summary.duplicate_targets.is_empty() {
        eprintln!("Fields targeted by more than one column:");
        for key in &summary.duplicate_targets {
            eprintln!("- {key}");
        }
    }
}

pub fn print_template_outcome(name: &str, outcome: &TemplateApplication) {
    println!("Template '{name}': {} decisions applied", outcome.applied);
    for column in &outcome.unknown_columns {
        eprintln!("- column '{column}' is not in this file");
    }
    for field in &outcome.unknown_fields {
        eprintln!("- field '{field}' is not in the destination schema");
    }
}

pub fn print_fields(catalog: &FieldCatalog) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Label"),
        header_cell("Group"),
        header_cell("Required"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for field in catalog {
        let required = if field.required {
            Cell::new("yes").fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            Cell::new(&field.key).fg(Color::Cyan),
            Cell::new(&field.label),
            dim_cell(field.group.as_str()),
            required,
        ]);
    }
    println!("{table}");
}

pub fn print_templates(templates: &[TemplateMetadata]) {
    if templates.is_empty() {
        println!("No stored templates.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Description"),
        header_cell("Mapped"),
        header_cell("Used"),
        header_cell("Updated"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for template in templates {
        table.add_row(vec![
            Cell::new(&template.name).fg(Color::Cyan),
            Cell::new(&template.description),
            Cell::new(template.mapped_count),
            Cell::new(template.usage_count),
            dim_cell(template.updated_at.format("%Y-%m-%d %H:%M")),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_mapping_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    table.set_constraints(vec![
        ColumnConstraint::UpperBoundary(Width::Percentage(25)),
        ColumnConstraint::UpperBoundary(Width::Percentage(20)),
        ColumnConstraint::LowerBoundary(Width::Fixed(10)),
        ColumnConstraint::LowerBoundary(Width::Fixed(7)),
        ColumnConstraint::LowerBoundary(Width::Fixed(10)),
    ]);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn field_cell(row: &ReportRow) -> Cell {
    if row.field == SKIP_KEY {
        dim_cell(SKIP_KEY)
    } else {
        Cell::new(&row.field).add_attribute(Attribute::Bold)
    }
}

fn confidence_cell(row: &ReportRow) -> Cell {
    let color = match row.confidence {
        Confidence::High => Color::Green,
        Confidence::Medium => Color::Yellow,
        Confidence::Low => Color::Red,
    };
    Cell::new(row.confidence).fg(color)
}

fn score_cell(row: &ReportRow) -> Cell {
    if row.field == SKIP_KEY {
        dim_cell("-")
    } else {
        Cell::new(format!("{:.0}%", row.score * 100.0))
    }
}

fn status_cell(status: ColumnStatus) -> Cell {
    match status {
        ColumnStatus::Suggested => Cell::new("engine"),
        ColumnStatus::Unmatched => dim_cell("engine"),
        ColumnStatus::Overridden => Cell::new("override").fg(Color::Magenta),
    }
}

fn required_cell(summary: &MappingSummary) -> Cell {
    let text = format!("{}/{}", summary.required_mapped, summary.required_total);
    if summary.is_complete() {
        Cell::new(text).fg(Color::Green)
    } else {
        Cell::new(text).fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
