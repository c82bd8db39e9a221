//! Error types for CSV output.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to create a directory or file.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialise a CSV record.
    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
