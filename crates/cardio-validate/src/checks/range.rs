//! Plausibility ranges. Missing values fail and are tallied separately.

use cardio_model::{
    Bounds, CheckDetails, CheckKind, CheckResult, FeaturedRecord, OffendingRow, RangeTally,
};

use super::{finish, offending_row};

/// Outcome of testing one value against its bounds.
#[derive(Clone, Copy)]
enum Outcome {
    Inside,
    Missing,
    Below,
    Above,
}

fn classify(value: Option<f64>, bounds: Bounds) -> Outcome {
    match value.filter(|v| v.is_finite()) {
        None => Outcome::Missing,
        Some(v) if bounds.contains(v) => Outcome::Inside,
        Some(v) if v < bounds.min => Outcome::Below,
        Some(_) => Outcome::Above,
    }
}

/// Count a failing outcome against the tally; true when the value passed.
fn record(tally: &mut RangeTally, outcome: Outcome) -> bool {
    match outcome {
        Outcome::Inside => return true,
        Outcome::Missing => tally.missing += 1,
        Outcome::Below => tally.below += 1,
        Outcome::Above => tally.above += 1,
    }
    false
}

fn single_field(
    kind: CheckKind,
    rows: &[FeaturedRecord],
    field: &str,
    bounds: Bounds,
    value: impl Fn(&FeaturedRecord) -> Option<f64>,
) -> CheckResult {
    let mut tally = RangeTally::new(field, bounds);
    let mut offending: Vec<OffendingRow> = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        if !record(&mut tally, classify(value(row), bounds)) {
            offending.push(offending_row(rows, idx));
        }
    }

    let failed = tally.total();
    finish(
        kind,
        rows.len() as u64,
        failed,
        offending,
        CheckDetails::Range {
            fields: vec![tally],
        },
    )
}

pub fn check_age(rows: &[FeaturedRecord], bounds: Bounds) -> CheckResult {
    single_field(CheckKind::AgeRange, rows, "age_years", bounds, |r| {
        r.age_years.map(|v| v as f64)
    })
}

pub fn check_height(rows: &[FeaturedRecord], bounds: Bounds) -> CheckResult {
    single_field(CheckKind::HeightRange, rows, "height", bounds, |r| r.height)
}

pub fn check_weight(rows: &[FeaturedRecord], bounds: Bounds) -> CheckResult {
    single_field(CheckKind::WeightRange, rows, "weight", bounds, |r| r.weight)
}

pub fn check_bmi(rows: &[FeaturedRecord], bounds: Bounds) -> CheckResult {
    single_field(CheckKind::BmiRange, rows, "bmi", bounds, |r| r.bmi)
}

/// A row fails when either reading is missing or out of bounds.
pub fn check_blood_pressure(
    rows: &[FeaturedRecord],
    ap_hi_bounds: Bounds,
    ap_lo_bounds: Bounds,
) -> CheckResult {
    let mut ap_hi = RangeTally::new("ap_hi", ap_hi_bounds);
    let mut ap_lo = RangeTally::new("ap_lo", ap_lo_bounds);
    let mut offending = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let hi_ok = record(&mut ap_hi, classify(row.ap_hi.map(|v| v as f64), ap_hi_bounds));
        let lo_ok = record(&mut ap_lo, classify(row.ap_lo.map(|v| v as f64), ap_lo_bounds));
        if !(hi_ok && lo_ok) {
            offending.push(offending_row(rows, idx));
        }
    }

    let failed = offending.len() as u64;
    finish(
        CheckKind::BloodPressureRange,
        rows.len() as u64,
        failed,
        offending,
        CheckDetails::Range {
            fields: vec![ap_hi, ap_lo],
        },
    )
}
