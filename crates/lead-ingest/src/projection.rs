//! Projection of source rows onto destination fields.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use lead_model::ColumnAssignment;
use tracing::info;

use crate::csv::CsvTable;
use crate::error::{IngestError, Result};

/// Rows keyed by destination field instead of source column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectedTable {
    /// Destination keys in the order their columns appear in the mapping.
    pub fields: Vec<String>,
    /// One value per field for every source row.
    pub records: Vec<Vec<String>>,
}

impl ProjectedTable {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Value of `field` in record `row`.
    pub fn value(&self, row: usize, field: &str) -> Option<&str> {
        let index = self.fields.iter().position(|f| f == field)?;
        self.records.get(row).map(|r| r[index].as_str())
    }

    /// Writes the header row and records as CSV.
    pub fn to_writer<W: Write>(&self, writer: W) -> std::result::Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.fields)?;
        for record in &self.records {
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Copies the values of every mapped column into destination-keyed records.
///
/// Skipped columns are left out. Fails when a mapped column is missing from
/// the table or two columns target the same field.
pub fn project_rows(table: &CsvTable, mapping: &[ColumnAssignment]) -> Result<ProjectedTable> {
    let mut targets: BTreeMap<&str, &str> = BTreeMap::new();
    let mut fields = Vec::new();
    let mut indices = Vec::new();

    for column in mapping {
        let Some(field) = column.assignment.field.key() else {
            continue;
        };
        if let Some(first) = targets.insert(field, &column.source_name) {
            return Err(IngestError::DuplicateTarget {
                field: field.to_string(),
                first: first.to_string(),
                second: column.source_name.clone(),
            });
        }
        let index =
            table
                .column_index(&column.source_name)
                .ok_or_else(|| IngestError::ColumnNotFound {
                    column: column.source_name.clone(),
                })?;
        fields.push(field.to_string());
        indices.push(index);
    }

    let records = table
        .rows()
        .iter()
        .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
        .collect();

    Ok(ProjectedTable { fields, records })
}

/// Writes a projected table to a CSV file.
pub fn write_projected_csv(projected: &ProjectedTable, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| IngestError::CsvWrite {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    projected
        .to_writer(std::io::BufWriter::new(file))
        .map_err(|source| IngestError::CsvWrite {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        path = %path.display(),
        fields = projected.fields.len(),
        records = projected.record_count(),
        "Projected CSV written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse_csv_str;
    use lead_model::{Confidence, FieldAssignment, FieldTarget};

    fn mapped(source: &str, field: &str) -> ColumnAssignment {
        ColumnAssignment {
            source_name: source.to_string(),
            assignment: FieldAssignment {
                field: FieldTarget::field(field),
                confidence: Confidence::High,
                reason: "test".to_string(),
                score: 1.0,
            },
        }
    }

    fn skipped(source: &str) -> ColumnAssignment {
        ColumnAssignment {
            source_name: source.to_string(),
            assignment: FieldAssignment::skip("no correspondence found"),
        }
    }

    #[test]
    fn test_project_rows() {
        let table = parse_csv_str("Site,Notes,Value\n100 Elm St,call,250000\n").unwrap();
        let projected = project_rows(
            &table,
            &[
                mapped("Site", "address"),
                skipped("Notes"),
                mapped("Value", "estimated_value"),
            ],
        )
        .unwrap();
        assert_eq!(projected.fields, ["address", "estimated_value"]);
        assert_eq!(projected.value(0, "estimated_value"), Some("250000"));
    }

    #[test]
    fn test_project_errors() {
        let table = parse_csv_str("A,B\n1,2\n").unwrap();
        assert!(matches!(
            project_rows(&table, &[mapped("A", "city"), mapped("B", "city")]),
            Err(IngestError::DuplicateTarget { .. })
        ));
        assert!(matches!(
            project_rows(&table, &[mapped("C", "city")]),
            Err(IngestError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_to_writer_quotes_values() {
        let projected = ProjectedTable {
            fields: vec!["owner_name".to_string()],
            records: vec![vec!["Doe, Jane".to_string()]],
        };
        let mut out = Vec::new();
        projected.to_writer(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "owner_name\n\"Doe, Jane\"\n");
    }
}
