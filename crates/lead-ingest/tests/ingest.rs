use std::io::Write;

use lead_ingest::{
    CleanupRule, CombinedField, IngestError, add_combined_columns, extract_source_columns,
    project_rows, read_csv_table, suggest_combined_fields, write_projected_csv,
};
use lead_model::{ColumnAssignment, Confidence, FieldAssignment, FieldTarget, MAX_SAMPLE_VALUES};
use tempfile::{NamedTempFile, TempDir};

const EXPORT: &str = "\
Input First Name,Input Last Name,Owner Fix - Mailing Address,Owner Fix - Mailing City,Phone 1,Notes
Jane,Doe,100 Elm St,Miami,(305) 555-0101,
John,,200 Birch Ave,Tampa,(813) 555-0199,call after 5

Ana,Silva,300 Oak Rd,,,
";

fn export_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(EXPORT.as_bytes()).unwrap();
    file
}

fn assigned(source: &str, field: &str) -> ColumnAssignment {
    ColumnAssignment {
        source_name: source.to_string(),
        assignment: FieldAssignment {
            field: FieldTarget::field(field),
            confidence: Confidence::Medium,
            reason: "operator choice".to_string(),
            score: 0.6,
        },
    }
}

#[test]
fn read_extract_and_combine() {
    let file = export_file();
    let mut table = read_csv_table(file.path()).unwrap();
    assert_eq!(table.row_count(), 3);

    let columns = extract_source_columns(&table, MAX_SAMPLE_VALUES);
    assert_eq!(columns.len(), 6);
    assert_eq!(columns[4].sample_values, ["(305) 555-0101", "(813) 555-0199"]);
    assert_eq!(columns[5].sample_values, ["call after 5"]);

    let suggested = suggest_combined_fields(table.headers());
    let names: Vec<&str> = suggested.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["Full Address", "Full Name"]);

    add_combined_columns(&mut table, &suggested).unwrap();
    assert_eq!(table.value(0, "Full Address"), Some("100 Elm St Miami"));
    assert_eq!(table.value(2, "Full Address"), Some("300 Oak Rd"));
    assert_eq!(table.value(1, "Full Name"), Some("John"));
}

#[test]
fn combined_fields_can_chain() {
    let file = export_file();
    let mut table = read_csv_table(file.path()).unwrap();
    let fields = [
        CombinedField::new("Name", ["Input First Name", "Input Last Name"])
            .with_rules([CleanupRule::RemoveEmptyValues]),
        CombinedField::new("Label", ["Name", "Owner Fix - Mailing City"])
            .with_separator(" / ")
            .with_rules([CleanupRule::RemoveEmptyValues, CleanupRule::Uppercase]),
    ];
    add_combined_columns(&mut table, &fields).unwrap();
    assert_eq!(table.value(0, "Label"), Some("JANE DOE / MIAMI"));
    assert_eq!(table.value(2, "Label"), Some("ANA SILVA"));
}

#[test]
fn project_and_write() {
    let file = export_file();
    let table = read_csv_table(file.path()).unwrap();
    let mapping = [
        assigned("Owner Fix - Mailing Address", "owner_address"),
        assigned("Phone 1", "owner_phone"),
        ColumnAssignment {
            source_name: "Notes".to_string(),
            assignment: FieldAssignment::skip("no correspondence found"),
        },
    ];
    let projected = project_rows(&table, &mapping).unwrap();
    assert_eq!(projected.fields, ["owner_address", "owner_phone"]);

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("leads.csv");
    write_projected_csv(&projected, &out).unwrap();
    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        written,
        "owner_address,owner_phone\n\
         100 Elm St,(305) 555-0101\n\
         200 Birch Ave,(813) 555-0199\n\
         300 Oak Rd,\n"
    );
}

#[test]
fn write_into_missing_directory_fails() {
    let projected = lead_ingest::ProjectedTable::default();
    let result = write_projected_csv(&projected, std::path::Path::new("/nonexistent/dir/out.csv"));
    assert!(matches!(result, Err(IngestError::CsvWrite { .. })));
}
