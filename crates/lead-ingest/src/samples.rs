//! Source column extraction for the mapping engine.

use lead_model::SourceColumn;

use crate::csv::CsvTable;

/// Builds one [`SourceColumn`] per header, in header order, keeping the
/// first `limit` non-empty values of each column as samples.
pub fn extract_source_columns(table: &CsvTable, limit: usize) -> Vec<SourceColumn> {
    table
        .headers()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            SourceColumn::with_limit(
                name.clone(),
                table.rows().iter().map(|row| row[index].as_str()),
                limit,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse_csv_str;

    #[test]
    fn test_samples_skip_blanks_and_respect_limit() {
        let table = parse_csv_str("Phone,Notes\n,a\n555-123-4567,\n555-987-6543,b\n555-222-1111,c\n")
            .unwrap();
        let columns = extract_source_columns(&table, 2);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "Phone");
        assert_eq!(columns[0].sample_values, ["555-123-4567", "555-987-6543"]);
        assert_eq!(columns[1].sample_values, ["a", "b"]);
    }

    #[test]
    fn test_header_only_table() {
        let table = parse_csv_str("Address,City\n").unwrap();
        let columns = extract_source_columns(&table, lead_model::MAX_SAMPLE_VALUES);
        assert!(columns.iter().all(|c| !c.has_samples()));
    }
}
