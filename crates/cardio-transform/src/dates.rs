//! Measurement dates.
//!
//! A supplied ISO date is parsed and clipped into the configured window.
//! Rows without one get a synthetic date that depends only on the seed and
//! the row position, so re-running on the same input gives the same dates.

use chrono::{Datelike, Days, NaiveDate};
use sha2::{Digest, Sha256};

use cardio_model::MeasureDateConfig;

/// Where a row's measurement date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Supplied,
    /// Supplied but outside the clip window.
    Clipped,
    /// Absent from the source.
    Synthetic,
    /// Present but not a valid ISO date.
    Unparseable,
}

/// Resolves the measurement date for the row at `position`.
pub fn resolve_measure_date(
    raw: Option<&str>,
    position: usize,
    config: &MeasureDateConfig,
) -> (NaiveDate, DateSource) {
    let Some(text) = raw else {
        return (synthetic_date(position, config), DateSource::Synthetic);
    };
    match parse_iso_date(text) {
        Some(date) => {
            let clipped = date.clamp(config.clip_start, config.clip_end);
            let source = if clipped == date {
                DateSource::Supplied
            } else {
                DateSource::Clipped
            };
            (clipped, source)
        }
        None => (synthetic_date(position, config), DateSource::Unparseable),
    }
}

/// Deterministic date inside the synthesis window.
pub fn synthetic_date(position: usize, config: &MeasureDateConfig) -> NaiveDate {
    let span = config
        .synthetic_end
        .signed_duration_since(config.synthetic_start)
        .num_days()
        .max(0) as u64
        + 1;

    let mut hasher = Sha256::new();
    hasher.update(config.seed.to_le_bytes());
    hasher.update((position as u64).to_le_bytes());
    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let offset = u64::from_le_bytes(head) % span;

    config
        .synthetic_start
        .checked_add_days(Days::new(offset))
        .unwrap_or(config.synthetic_start)
}

/// First day of the date's month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let date_part = match text.char_indices().nth(10) {
        Some((idx, 'T' | ' ')) => &text[..idx],
        _ => text,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
