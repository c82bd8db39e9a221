//! Conversion of the raw frame into typed patient records.

use std::path::{Path, PathBuf};

use cardio_model::{IngestConfig, MEASURE_DATE_COLUMN, RAW_COLUMNS, RawPatientRecord};
use polars::prelude::*;

use crate::csv::{read_csv_headers, read_csv_table};
use crate::error::{IngestError, Result};
use crate::polars_utils::{any_to_f64, any_to_i64, any_to_text};

/// Raw records loaded from one source file.
#[derive(Debug, Clone)]
pub struct RawDataset {
    pub path: PathBuf,
    /// Header names as declared in the file.
    pub columns: Vec<String>,
    pub separator: u8,
    /// Whether the file supplied a `measure_date` column.
    pub has_measure_date: bool,
    /// One record per data row, in file order.
    pub records: Vec<RawPatientRecord>,
}

/// Loads the raw dataset.
///
/// The header is checked for every column in [`RAW_COLUMNS`] before the body
/// is read. Cells that are blank or unparseable become `None`; no row is
/// dropped.
pub fn read_raw_dataset(path: &Path, config: &IngestConfig) -> Result<RawDataset> {
    let separator = match config.separator {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => return Err(IngestError::InvalidSeparator { separator: c }),
        None => None,
    };

    let headers = read_csv_headers(path, separator)?;
    let missing = headers.missing(&RAW_COLUMNS);
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing.into_iter().map(String::from).collect(),
        });
    }
    tracing::debug!(
        path = %path.display(),
        separator = %char::from(headers.separator),
        columns = headers.len(),
        "header accepted"
    );

    let df = read_csv_table(path, &headers)?;
    let records = records_from_frame(&df, path)?;
    let has_measure_date = headers.position(MEASURE_DATE_COLUMN).is_some();

    tracing::info!(
        path = %path.display(),
        rows = records.len(),
        has_measure_date,
        "raw dataset loaded"
    );

    Ok(RawDataset {
        path: path.to_path_buf(),
        columns: headers.columns,
        separator: headers.separator,
        has_measure_date,
        records,
    })
}

/// Converts a frame holding the raw columns into records.
///
/// Column names match ignoring ASCII case and surrounding whitespace, the
/// same way the header check reads them. `origin` names the source in errors.
pub fn records_from_frame(df: &DataFrame, origin: &Path) -> Result<Vec<RawPatientRecord>> {
    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let missing: Vec<String> = RAW_COLUMNS
        .iter()
        .filter(|column| resolve_name(&names, column).is_none())
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            path: origin.to_path_buf(),
            columns: missing,
        });
    }

    let column = |wanted: &str| lookup_column(df, &names, wanted);

    let id = column("id")?;
    let age = column("age")?;
    let gender = column("gender")?;
    let height = column("height")?;
    let weight = column("weight")?;
    let ap_hi = column("ap_hi")?;
    let ap_lo = column("ap_lo")?;
    let cholesterol = column("cholesterol")?;
    let gluc = column("gluc")?;
    let smoke = column("smoke")?;
    let alco = column("alco")?;
    let active = column("active")?;
    let cardio = column("cardio")?;
    let measure_date = column(MEASURE_DATE_COLUMN)?;

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        records.push(RawPatientRecord {
            id: any_to_text(cell(id, idx)),
            age_days: any_to_i64(cell(age, idx)),
            gender: any_to_i64(cell(gender, idx)),
            height_cm: any_to_f64(cell(height, idx)),
            weight_kg: any_to_f64(cell(weight, idx)),
            ap_hi: any_to_i64(cell(ap_hi, idx)),
            ap_lo: any_to_i64(cell(ap_lo, idx)),
            cholesterol: any_to_i64(cell(cholesterol, idx)),
            glucose: any_to_i64(cell(gluc, idx)),
            smoke: any_to_i64(cell(smoke, idx)),
            alcohol: any_to_i64(cell(alco, idx)),
            active: any_to_i64(cell(active, idx)),
            cardio: any_to_i64(cell(cardio, idx)),
            measure_date: any_to_text(cell(measure_date, idx)),
        });
    }
    Ok(records)
}

fn resolve_name<'a>(names: &'a [String], wanted: &str) -> Option<&'a str> {
    names
        .iter()
        .find(|name| {
            name.trim_start_matches('\u{feff}')
                .trim()
                .eq_ignore_ascii_case(wanted)
        })
        .map(String::as_str)
}

fn lookup_column<'a>(
    df: &'a DataFrame,
    names: &[String],
    wanted: &str,
) -> Result<Option<&'a Column>> {
    match resolve_name(names, wanted) {
        Some(name) => Ok(Some(df.column(name)?)),
        None => Ok(None),
    }
}

fn cell(column: Option<&Column>, idx: usize) -> AnyValue<'_> {
    column
        .and_then(|c| c.get(idx).ok())
        .unwrap_or(AnyValue::Null)
}
