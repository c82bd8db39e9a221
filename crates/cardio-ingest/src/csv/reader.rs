//! CSV file reading.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

use super::header::{CsvHeaders, detect_separator, parse_csv_line};

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Rejects files carrying a UTF-16 byte order mark.
///
/// A UTF-8 BOM is accepted and stripped when the header is read.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = open(path)?;
    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 2 {
        let encoding = match buffer {
            [0xFF, 0xFE] => Some("UTF-16 LE"),
            [0xFE, 0xFF] => Some("UTF-16 BE"),
            _ => None,
        };
        if let Some(encoding) = encoding {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding,
            });
        }
    }
    Ok(())
}

/// Reads the first line of a file with any UTF-8 BOM removed.
fn read_first_line(path: &Path) -> Result<Option<String>> {
    let reader = BufReader::new(open(path)?);
    match reader.lines().next() {
        None => Ok(None),
        Some(line) => {
            let line = line.map_err(|e| IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(Some(
                line.strip_prefix('\u{feff}').unwrap_or(&line).to_string(),
            ))
        }
    }
}

/// Reads the header line and resolves the separator.
///
/// `separator` overrides detection when set.
pub fn read_csv_headers(path: &Path, separator: Option<u8>) -> Result<CsvHeaders> {
    validate_encoding(path)?;
    let Some(line) = read_first_line(path)? else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }

    let separator = separator.unwrap_or_else(|| detect_separator(line));
    let columns = parse_csv_line(line, separator);
    if columns.iter().all(String::is_empty) {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }
    Ok(CsvHeaders::new(columns, separator))
}

/// Data rows that do not fit the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IrregularRows {
    /// Rows with more fields than the header; the extra fields are dropped.
    pub ragged: usize,
    /// Rows holding bytes that are not valid UTF-8; those cells become
    /// unreadable and load as missing.
    pub invalid_utf8: usize,
}

impl IrregularRows {
    pub fn total(&self) -> usize {
        self.ragged + self.invalid_utf8
    }
}

/// Reads a CSV file into a DataFrame with every column typed as a string.
///
/// Numeric conversion happens per cell afterwards so that one malformed
/// value makes a single cell missing instead of failing the column. Rows
/// with surplus fields are truncated and invalid UTF-8 is decoded lossily,
/// so a bad line never fails the file.
pub fn read_csv_table(path: &Path, headers: &CsvHeaders) -> Result<DataFrame> {
    let irregular = scan_irregular_rows(path, headers)?;
    if irregular.total() > 0 {
        tracing::warn!(
            path = %path.display(),
            ragged_rows = irregular.ragged,
            invalid_utf8_rows = irregular.invalid_utf8,
            "irregular rows loaded with unreadable cells"
        );
    }

    let parse_options = CsvParseOptions::default()
        .with_separator(headers.separator)
        .with_truncate_ragged_lines(true)
        .with_encoding(CsvEncoding::LossyUtf8);
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Counts data rows that are longer than the header or not valid UTF-8.
pub fn scan_irregular_rows(path: &Path, headers: &CsvHeaders) -> Result<IrregularRows> {
    let reader = BufReader::new(open(path)?);
    let mut irregular = IrregularRows::default();
    for line in reader.split(b'\n').skip(1) {
        let line = line.map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        match std::str::from_utf8(&line) {
            Ok(text) => {
                if parse_csv_line(text.trim_end_matches('\r'), headers.separator).len()
                    > headers.len()
                {
                    irregular.ragged += 1;
                }
            }
            Err(_) => irregular.invalid_utf8 += 1,
        }
    }
    Ok(irregular)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_headers_detects_semicolon() {
        let file = create_temp_csv("id;age;gender\n0;18393;2\n");
        let headers = read_csv_headers(file.path(), None).unwrap();

        assert_eq!(headers.columns, vec!["id", "age", "gender"]);
        assert_eq!(headers.separator, b';');
    }

    #[test]
    fn test_read_headers_honours_override() {
        let file = create_temp_csv("id;age\n0;18393\n");
        let headers = read_csv_headers(file.path(), Some(b',')).unwrap();

        assert_eq!(headers.columns, vec!["id;age"]);
    }

    #[test]
    fn test_read_headers_empty_file() {
        let file = create_temp_csv("");
        let result = read_csv_headers(file.path(), None);

        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_headers_blank_first_line() {
        let file = create_temp_csv("\n1,2\n");
        let result = read_csv_headers(file.path(), None);

        assert!(matches!(result, Err(IngestError::NoHeaderDetected { .. })));
    }

    #[test]
    fn test_read_headers_with_bom() {
        let file = create_temp_csv("\u{feff}id,age\n1,2\n");
        let headers = read_csv_headers(file.path(), None).unwrap();

        assert_eq!(headers.columns, vec!["id", "age"]);
    }

    #[test]
    fn test_read_headers_missing_file() {
        let result = read_csv_headers(Path::new("/nonexistent/cardio.csv"), None);

        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_utf16_bom_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xFE, b'i', 0, b'd', 0]).unwrap();
        let result = read_csv_headers(file.path(), None);

        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
    }

    #[test]
    fn test_scan_counts_irregular_rows() {
        let mut file = create_temp_csv("id;age\n0;1\n1;2;extra\n2;3\n");
        file.write_all(b"3;\xff\n").unwrap();
        let headers = read_csv_headers(file.path(), None).unwrap();
        let irregular = scan_irregular_rows(file.path(), &headers).unwrap();

        assert_eq!(
            irregular,
            IrregularRows {
                ragged: 1,
                invalid_utf8: 1,
            }
        );
    }

    #[test]
    fn test_read_table_keeps_strings() {
        let file = create_temp_csv("id;height\n0;168\n1;156.5\n");
        let headers = read_csv_headers(file.path(), None).unwrap();
        let df = read_csv_table(file.path(), &headers).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
        assert_eq!(df.column("height").unwrap().dtype(), &DataType::String);
    }
}
