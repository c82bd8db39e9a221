//! Required-field population.
//!
//! Units are cells: every row contributes one unit per required field.

use cardio_model::{
    CheckDetails, CheckKind, CheckResult, FeaturedField, FeaturedRecord, FieldMissing,
};

use super::{finish, offending_row};

pub fn check(rows: &[FeaturedRecord], required: &[FeaturedField]) -> CheckResult {
    let mut missing_by_field = vec![0u64; required.len()];
    let mut offending = Vec::new();

    for (idx, record) in rows.iter().enumerate() {
        let mut row_missing = false;
        for (slot, field) in required.iter().enumerate() {
            if field.is_missing(record) {
                missing_by_field[slot] += 1;
                row_missing = true;
            }
        }
        if row_missing {
            offending.push(offending_row(rows, idx));
        }
    }

    let fields = required
        .iter()
        .zip(&missing_by_field)
        .map(|(field, missing)| FieldMissing {
            field: field.as_str().to_string(),
            missing: *missing,
            percent: percent(*missing, rows.len()),
        })
        .collect();

    let evaluated = (rows.len() * required.len()) as u64;
    let failed = missing_by_field.iter().sum();
    finish(
        CheckKind::Missingness,
        evaluated,
        failed,
        offending,
        CheckDetails::Missingness { fields },
    )
}

fn percent(count: u64, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        cardio_model::round1(100.0 * count as f64 / total as f64)
    }
}
