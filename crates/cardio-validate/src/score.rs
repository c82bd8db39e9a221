//! Overall quality score.

use std::collections::HashSet;

use cardio_model::{CheckResult, QualityScore, SCORE_FORMULA, round1};

/// Scores a finished set of check results.
///
/// `overall = round1(100 * mean(pass_rate))`. Pass rates are summed in check
/// order so the value is reproducible bit for bit.
pub fn compute_score(
    checks: &[CheckResult],
    rows: usize,
    threshold: Option<f64>,
) -> QualityScore {
    let overall = if checks.is_empty() {
        100.0
    } else {
        let total: f64 = checks.iter().map(|check| check.pass_rate).sum();
        round1(100.0 * total / checks.len() as f64)
    };

    let dirty: HashSet<usize> = checks
        .iter()
        .flat_map(|check| check.offending.iter().map(|row| row.row))
        .collect();
    let clean_rows = rows.saturating_sub(dirty.len()) as u64;
    let clean_row_rate = if rows == 0 {
        1.0
    } else {
        clean_rows as f64 / rows as f64
    };

    QualityScore {
        overall,
        formula: SCORE_FORMULA.to_string(),
        checks_passed: checks.iter().filter(|check| check.is_pass()).count() as u64,
        checks_total: checks.len() as u64,
        clean_rows,
        clean_row_rate,
        threshold,
        meets_threshold: threshold.map(|min| overall >= min),
    }
}
