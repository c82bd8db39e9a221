//! Pure clinical derivations.
//!
//! Each function returns `None` instead of failing when its inputs cannot
//! produce a value.

use cardio_model::{HypertensionThresholds, LabCategory};

/// Whole years from an age in days. Missing or non-positive ages yield `None`.
pub fn age_years(age_days: Option<i64>, days_per_year: f64) -> Option<i64> {
    let days = age_days.filter(|days| *days > 0)?;
    let years = (days as f64 / days_per_year).floor();
    years.is_finite().then_some(years as i64)
}

/// Body-mass index from height in centimetres and weight in kilograms.
///
/// `None` when either value is missing or non-finite, or height is not positive.
pub fn bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    let height = height_cm.filter(|h| h.is_finite() && *h > 0.0)?;
    let weight = weight_kg.filter(|w| w.is_finite())?;
    let meters = height / 100.0;
    Some(weight / (meters * meters))
}

/// `ap_hi - ap_lo`. Negative values are kept.
pub fn pulse_pressure(ap_hi: Option<i64>, ap_lo: Option<i64>) -> Option<i64> {
    ap_hi?.checked_sub(ap_lo?)
}

/// True when either present reading reaches its threshold.
///
/// A single missing reading does not hide a high value in the other one;
/// the flag is `None` only when both readings are missing.
pub fn hypertension_flag(
    ap_hi: Option<i64>,
    ap_lo: Option<i64>,
    thresholds: &HypertensionThresholds,
) -> Option<bool> {
    if ap_hi.is_none() && ap_lo.is_none() {
        return None;
    }
    let systolic = ap_hi.is_some_and(|v| v >= thresholds.systolic);
    let diastolic = ap_lo.is_some_and(|v| v >= thresholds.diastolic);
    Some(systolic || diastolic)
}

/// Lab ordinal code to category. Unknown codes map to `Unmapped`.
pub fn lab_category(code: Option<i64>) -> Option<LabCategory> {
    code.map(LabCategory::from_code)
}
