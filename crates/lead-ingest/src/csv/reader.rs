//! CSV file reading with encoding detection.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::Path;

use encoding_rs::{Encoding, WINDOWS_1252};
use tracing::{info, warn};

use crate::error::{IngestError, Result};

use super::table::CsvTable;

/// Maximum file size for CSV loading (100 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Origin reported in errors for CSV text that did not come from a file.
const INLINE_SOURCE: &str = "<input>";

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::open(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Decodes raw file content to text.
///
/// A byte order mark selects UTF-8, UTF-16 LE or UTF-16 BE and is removed.
/// Without one, content is read as UTF-8 and falls back to Windows-1252,
/// which is what spreadsheet software commonly writes.
pub fn decode_bytes<'a>(bytes: &'a [u8], path: &Path) -> Result<Cow<'a, str>> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        if had_errors {
            return Err(IngestError::Encoding {
                path: path.to_path_buf(),
                encoding: encoding.name(),
            });
        }
        return Ok(text);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(Cow::Borrowed(text)),
        Err(_) => {
            warn!(
                path = %path.display(),
                "File is not valid UTF-8 - decoding as windows-1252"
            );
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            Ok(text)
        }
    }
}

/// Reads a CSV file into a [`CsvTable`].
///
/// The first record is the header row. Fields are trimmed, blank lines and
/// rows without any value are dropped, and short rows are padded.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    check_file_size(path)?;
    let bytes = std::fs::read(path).map_err(|e| IngestError::open(path, e))?;
    let text = decode_bytes(&bytes, path)?;
    let table = parse_csv(&text, path)?;

    info!(
        path = %path.display(),
        columns = table.column_count(),
        rows = table.row_count(),
        "CSV loaded"
    );
    Ok(table)
}

/// Parses CSV text held in memory. See [`read_csv_table`].
pub fn parse_csv_str(text: &str) -> Result<CsvTable> {
    parse_csv(text, Path::new(INLINE_SOURCE))
}

fn parse_csv(text: &str, path: &Path) -> Result<CsvTable> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?,
        None => {
            return Err(IngestError::EmptyCsv {
                path: path.to_path_buf(),
            });
        }
    };
    let headers = validate_headers(header.iter().map(str::to_string).collect(), path)?;
    let width = headers.len();

    let mut rows = Vec::new();
    let mut overlong = 0usize;
    for record in records {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.iter().skip(width).any(|field| !field.is_empty()) {
            overlong += 1;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    if overlong > 0 {
        warn!(
            path = %path.display(),
            rows = overlong,
            "Rows have more values than the header - extra values dropped"
        );
    }
    if width > 500 {
        warn!(
            path = %path.display(),
            columns = width,
            "File has more than 500 columns - may impact performance"
        );
    }

    Ok(CsvTable::new(headers, rows))
}

/// Drops trailing blank header cells and rejects blank or repeated names.
fn validate_headers(mut headers: Vec<String>, path: &Path) -> Result<Vec<String>> {
    while headers.last().is_some_and(String::is_empty) {
        headers.pop();
    }
    if headers.is_empty() {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }

    let mut seen = BTreeSet::new();
    for (index, name) in headers.iter().enumerate() {
        if name.is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
                index,
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(IngestError::DuplicateColumn {
                path: path.to_path_buf(),
                column: name.clone(),
            });
        }
    }
    Ok(headers)
}
