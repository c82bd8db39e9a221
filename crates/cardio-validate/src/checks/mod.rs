//! Validation check modules.
//!
//! Each module evaluates one rule family and returns finished
//! [`CheckResult`]s.

mod category;
mod consistency;
mod missingness;
mod range;
mod uniqueness;

use cardio_model::{
    CheckDetails, CheckKind, CheckResult, FeaturedRecord, OffendingRow, QualityConfig,
};

/// Run every check in report order.
pub fn run_all(rows: &[FeaturedRecord], config: &QualityConfig) -> Vec<CheckResult> {
    let mut results = Vec::with_capacity(CheckKind::ALL.len());

    // 1. Required fields populated
    results.push(missingness::check(rows, &config.required_fields));

    // 2-5. Single-field plausibility ranges
    results.push(range::check_age(rows, config.age_years));
    results.push(range::check_height(rows, config.height));
    results.push(range::check_weight(rows, config.weight));
    results.push(range::check_bmi(rows, config.bmi));

    // 6. Both blood-pressure readings in range
    results.push(range::check_blood_pressure(rows, config.ap_hi, config.ap_lo));

    // 7. ap_hi >= ap_lo
    results.push(consistency::check(rows));

    // 8. patient_id unique across the set
    results.push(uniqueness::check(rows));

    // 9. Lab categories mapped, bands known
    results.push(category::check(rows));

    results
}

/// Fraction of passing units; 1.0 when nothing was evaluated.
pub(crate) fn pass_rate(passed: u64, evaluated: u64) -> f64 {
    if evaluated == 0 {
        1.0
    } else {
        passed as f64 / evaluated as f64
    }
}

pub(crate) fn offending_row(rows: &[FeaturedRecord], row: usize) -> OffendingRow {
    OffendingRow {
        row,
        patient_id: rows[row].patient_id.clone(),
    }
}

/// Assemble a result from evaluated/failed unit counts.
pub(crate) fn finish(
    kind: CheckKind,
    evaluated: u64,
    failed: u64,
    offending: Vec<OffendingRow>,
    details: CheckDetails,
) -> CheckResult {
    let passed = evaluated.saturating_sub(failed);
    let result = CheckResult {
        check: kind,
        description: kind.description().to_string(),
        evaluated,
        passed,
        failed,
        pass_rate: pass_rate(passed, evaluated),
        offending,
        details,
    };
    tracing::debug!(
        check = %kind,
        evaluated,
        failed,
        offending_rows = result.offending.len(),
        "check evaluated"
    );
    result
}
