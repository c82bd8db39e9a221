//! Shared CSV table writer.

use std::fs;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;

use crate::error::{OutputError, Result};

/// Serialise `rows` under an explicit header.
///
/// The header is written even when there are no rows.
pub(crate) fn write_rows<W: Write, T: Serialize>(
    writer: W,
    header: &[&str],
    rows: &[T],
    path: &Path,
) -> Result<()> {
    let csv_error = |source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(header).map_err(csv_error)?;
    for row in rows {
        csv.serialize(row).map_err(csv_error)?;
    }
    csv.flush().map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a table to `path`, creating parent directories.
pub(crate) fn write_table_file<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: &[T],
) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = fs::File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_rows(std::io::BufWriter::new(file), header, rows, path)
}
