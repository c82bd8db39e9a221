//! CSV reading utilities.

mod header;
mod reader;

pub use header::{CsvHeaders, detect_separator, parse_csv_line};
pub use reader::{
    IrregularRows, read_csv_headers, read_csv_table, scan_irregular_rows, validate_encoding,
};
