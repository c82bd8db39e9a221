//! Error types for raw data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the raw dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {path}, expected UTF-8")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file is empty.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// First line holds no column names.
    #[error("could not detect header row in {path}")]
    NoHeaderDetected { path: PathBuf },

    /// Separator is not a single-byte character.
    #[error("separator '{separator}' is not a single ASCII character")]
    InvalidSeparator { separator: char },

    // === Schema Errors ===
    /// Required raw columns are absent from the header.
    #[error("{path} is missing required columns: {}", .columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/file.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /path/to/file.csv");
    }

    #[test]
    fn test_missing_columns_lists_names() {
        let err = IngestError::MissingColumns {
            path: PathBuf::from("cardio.csv"),
            columns: vec!["ap_hi".to_string(), "gluc".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "cardio.csv is missing required columns: ap_hi, gluc"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
