//! CSV reading utilities.

mod reader;
mod table;

pub use reader::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, decode_bytes, parse_csv_str,
    read_csv_table,
};
pub use table::CsvTable;
