//! Featured dataset CSV.

use std::io::Write;
use std::path::Path;

use cardio_model::{FEATURED_COLUMNS, FeaturedRecord};

use crate::error::Result;
use crate::table::{write_rows, write_table_file};

/// File name of the featured dataset inside the output directory.
pub const FEATURED_FILE: &str = "featured.csv";

/// Write featured records with the fixed column order.
///
/// Undefined values are written as empty fields.
pub fn write_featured_csv(path: &Path, rows: &[FeaturedRecord]) -> Result<()> {
    write_table_file(path, &FEATURED_COLUMNS, rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "featured dataset written");
    Ok(())
}

/// Write featured records to any writer. `name` labels errors.
pub fn write_featured<W: Write>(writer: W, rows: &[FeaturedRecord], name: &Path) -> Result<()> {
    write_rows(writer, &FEATURED_COLUMNS, rows, name)
}
