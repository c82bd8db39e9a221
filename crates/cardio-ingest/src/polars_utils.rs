//! Polars `AnyValue` conversions for raw cells.
//!
//! The raw file is read with every column as a string, so most cells arrive
//! as `AnyValue::String`. Numeric variants are still handled for frames built
//! in memory.

use polars::prelude::*;

/// Converts a cell to its string form. `Null` becomes an empty string.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "1" } else { "0" }.to_string(),
        other => {
            let s = other.to_string();
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    }
}

/// Cell as a trimmed, non-empty string.
pub(crate) fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    let s = any_to_string(value);
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Converts a cell to a finite `f64`.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    let number = match value {
        AnyValue::Null => None,
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Converts a cell to `i64`.
///
/// Floats are accepted only when integral (`120.0`); `120.5` is treated as
/// unreadable rather than truncated.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::Float32(v) => integral(f64::from(v)),
        AnyValue::Float64(v) => integral(v),
        AnyValue::String(s) => parse_i64(s),
        AnyValue::StringOwned(s) => parse_i64(&s),
        _ => None,
    }
}

/// Parses a string as a finite `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a string as `i64`, also accepting integral decimals such as `"2.0"`.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| parse_f64(trimmed).and_then(integral))
}

fn integral(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
        Some(v as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_string() {
        assert_eq!(any_to_string(AnyValue::Null), "");
        assert_eq!(any_to_string(AnyValue::Int64(-100)), "-100");
        assert_eq!(any_to_string(AnyValue::Float64(168.0)), "168");
        assert_eq!(any_to_string(AnyValue::Float64(62.50)), "62.5");
        assert_eq!(any_to_string(AnyValue::String("abc")), "abc");
    }

    #[test]
    fn test_any_to_text_drops_blank() {
        assert_eq!(any_to_text(AnyValue::String("  ")), None);
        assert_eq!(any_to_text(AnyValue::String(" 7 ")), Some("7".to_string()));
    }

    #[test]
    fn test_any_to_f64() {
        assert_eq!(any_to_f64(AnyValue::Null), None);
        assert_eq!(any_to_f64(AnyValue::Int32(42)), Some(42.0));
        assert_eq!(any_to_f64(AnyValue::String("62.5")), Some(62.5));
        assert_eq!(any_to_f64(AnyValue::String("NaN")), None);
        assert_eq!(any_to_f64(AnyValue::Float64(f64::INFINITY)), None);
    }

    #[test]
    fn test_any_to_i64() {
        assert_eq!(any_to_i64(AnyValue::Null), None);
        assert_eq!(any_to_i64(AnyValue::String("18393")), Some(18393));
        assert_eq!(any_to_i64(AnyValue::String("120.0")), Some(120));
        assert_eq!(any_to_i64(AnyValue::String("120.5")), None);
        assert_eq!(any_to_i64(AnyValue::Float64(3.9)), None);
        assert_eq!(any_to_i64(AnyValue::String("abc")), None);
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64(""), None);
        assert_eq!(parse_i64("  -100  "), Some(-100));
        assert_eq!(parse_i64("2.0"), Some(2));
    }
}
