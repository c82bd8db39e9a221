//! Raw patient CSV loading.
//!
//! Reads a delimited file of raw cardiovascular screening records into
//! [`RawPatientRecord`](cardio_model::RawPatientRecord) values. The header is
//! checked against [`RAW_COLUMNS`](cardio_model::RAW_COLUMNS) before any row
//! is parsed; a file missing a required column is rejected as a whole.
//!
//! ```ignore
//! use std::path::Path;
//! use cardio_ingest::read_raw_dataset;
//! use cardio_model::IngestConfig;
//!
//! let dataset = read_raw_dataset(Path::new("cardio_train.csv"), &IngestConfig::default())?;
//! println!("{} rows", dataset.records.len());
//! ```

mod csv;
mod error;
mod polars_utils;
mod records;

pub use csv::{
    CsvHeaders, IrregularRows, detect_separator, parse_csv_line, read_csv_headers, read_csv_table,
    scan_irregular_rows, validate_encoding,
};
pub use error::{IngestError, Result};
pub use polars_utils::{any_to_f64, any_to_i64, any_to_string, parse_f64, parse_i64};
pub use records::{RawDataset, read_raw_dataset, records_from_frame};
