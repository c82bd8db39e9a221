//! CSV header parsing and separator detection.

/// Separators tried when none is configured, in tie-break order.
const CANDIDATE_SEPARATORS: [u8; 3] = [b';', b',', b'\t'];

/// Result of CSV header analysis.
#[derive(Debug, Clone)]
pub struct CsvHeaders {
    /// Column names as declared (trimmed).
    pub columns: Vec<String>,
    /// Field separator used by the file.
    pub separator: u8,
}

impl CsvHeaders {
    pub fn new(columns: Vec<String>, separator: u8) -> Self {
        Self { columns, separator }
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column, ignoring ASCII case.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|name| name.eq_ignore_ascii_case(column))
    }

    /// Names from `required` that the header does not declare.
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|column| self.position(column).is_none())
            .collect()
    }
}

/// Picks the separator that occurs most often outside quotes in a header line.
///
/// Falls back to `,` when no candidate appears.
pub fn detect_separator(line: &str) -> u8 {
    let mut counts = [0usize; CANDIDATE_SEPARATORS.len()];
    let mut in_quotes = false;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(idx) = CANDIDATE_SEPARATORS.iter().position(|sep| *sep == byte) {
            counts[idx] += 1;
        }
    }
    let mut best = b',';
    let mut best_count = 0;
    for (sep, count) in CANDIDATE_SEPARATORS.iter().zip(counts) {
        if count > best_count {
            best = *sep;
            best_count = count;
        }
    }
    best
}

/// Parses a CSV line into trimmed fields, handling quoted values.
pub fn parse_csv_line(line: &str, separator: u8) -> Vec<String> {
    let separator = char::from(separator);
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => {
                in_quotes = true;
            }
            '"' if in_quotes => {
                // Check for escaped quote ("")
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            c if c == separator && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => {
                current.push(c);
            }
        }
    }

    fields.push(current.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_semicolon() {
        assert_eq!(detect_separator("id;age;gender;height"), b';');
    }

    #[test]
    fn test_detect_comma() {
        assert_eq!(detect_separator("id,age,gender,height"), b',');
    }

    #[test]
    fn test_detect_ignores_quoted_separators() {
        assert_eq!(detect_separator("\"a;b;c\",d,e"), b',');
    }

    #[test]
    fn test_detect_defaults_to_comma() {
        assert_eq!(detect_separator("single"), b',');
    }

    #[test]
    fn test_parse_csv_line_semicolon() {
        let result = parse_csv_line("id;age;gender", b';');
        assert_eq!(result, vec!["id", "age", "gender"]);
    }

    #[test]
    fn test_parse_csv_line_quoted() {
        let result = parse_csv_line("\"hello, world\",b,c", b',');
        assert_eq!(result, vec!["hello, world", "b", "c"]);
    }

    #[test]
    fn test_parse_csv_line_escaped_quotes() {
        let result = parse_csv_line("\"he said \"\"hello\"\"\",b", b',');
        assert_eq!(result, vec!["he said \"hello\"", "b"]);
    }

    #[test]
    fn test_headers_missing_is_case_insensitive() {
        let headers = CsvHeaders::new(vec!["ID".to_string(), "Age".to_string()], b',');
        assert_eq!(headers.missing(&["id", "age", "gluc"]), vec!["gluc"]);
        assert_eq!(headers.position("AGE"), Some(1));
    }
}
