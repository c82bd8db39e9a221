//! Quality report produced once per validator run.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Bounds;

/// Name of the scoring formula recorded in every report.
pub const SCORE_FORMULA: &str = "mean_check_pass_rate";

/// The fixed battery of checks, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Missingness,
    AgeRange,
    HeightRange,
    WeightRange,
    BmiRange,
    BloodPressureRange,
    BpConsistency,
    IdentifierUniqueness,
    CategoryValidity,
}

impl CheckKind {
    pub const ALL: [CheckKind; 9] = [
        CheckKind::Missingness,
        CheckKind::AgeRange,
        CheckKind::HeightRange,
        CheckKind::WeightRange,
        CheckKind::BmiRange,
        CheckKind::BloodPressureRange,
        CheckKind::BpConsistency,
        CheckKind::IdentifierUniqueness,
        CheckKind::CategoryValidity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missingness => "missingness",
            Self::AgeRange => "age_range",
            Self::HeightRange => "height_range",
            Self::WeightRange => "weight_range",
            Self::BmiRange => "bmi_range",
            Self::BloodPressureRange => "blood_pressure_range",
            Self::BpConsistency => "bp_consistency",
            Self::IdentifierUniqueness => "identifier_uniqueness",
            Self::CategoryValidity => "category_validity",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Missingness => "Missingness",
            Self::AgeRange => "Age range",
            Self::HeightRange => "Height range",
            Self::WeightRange => "Weight range",
            Self::BmiRange => "BMI range",
            Self::BloodPressureRange => "Blood-pressure range",
            Self::BpConsistency => "BP consistency",
            Self::IdentifierUniqueness => "Identifier uniqueness",
            Self::CategoryValidity => "Category validity",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Missingness => "Required fields are populated",
            Self::AgeRange => "age_years within plausible clinical bounds",
            Self::HeightRange => "height (cm) within plausible bounds",
            Self::WeightRange => "weight (kg) within plausible bounds",
            Self::BmiRange => "Derived BMI within plausible bounds",
            Self::BloodPressureRange => "ap_hi and ap_lo within plausible bounds",
            Self::BpConsistency => "Systolic reading is not below diastolic (ap_hi >= ap_lo)",
            Self::IdentifierUniqueness => "patient_id has no duplicates",
            Self::CategoryValidity => "Lab codes are mapped and age/BMI bands are known",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row that failed a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffendingRow {
    /// Zero-based position in the featured dataset.
    pub row: usize,
    pub patient_id: String,
}

/// Missing-value profile for one required field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMissing {
    pub field: String,
    pub missing: u64,
    pub percent: f64,
}

/// Breakdown of range failures for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeTally {
    pub field: String,
    pub bounds: Bounds,
    pub missing: u64,
    pub below: u64,
    pub above: u64,
}

impl RangeTally {
    pub fn new(field: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            field: field.into(),
            bounds,
            missing: 0,
            below: 0,
            above: 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.missing + self.below + self.above
    }
}

/// Rows sharing one `patient_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub patient_id: String,
    pub rows: Vec<usize>,
}

/// Invalid-value count for one categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCount {
    pub field: String,
    pub count: u64,
}

/// Check-specific metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckDetails {
    Missingness {
        fields: Vec<FieldMissing>,
    },
    Range {
        fields: Vec<RangeTally>,
    },
    Consistency {
        /// Rows with a missing reading, not evaluated.
        skipped: u64,
        min_pulse_pressure: Option<i64>,
    },
    Uniqueness {
        unique_patient_ids: u64,
        duplicate_patient_ids: u64,
        groups: Vec<DuplicateGroup>,
    },
    CategoryValidity {
        fields: Vec<FieldCount>,
    },
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check: CheckKind,
    pub description: String,
    /// Units evaluated (cells for missingness, rows otherwise).
    pub evaluated: u64,
    pub passed: u64,
    pub failed: u64,
    /// `passed / evaluated`, 1.0 when nothing was evaluated.
    pub pass_rate: f64,
    pub offending: Vec<OffendingRow>,
    pub details: CheckDetails,
}

impl CheckResult {
    pub fn is_pass(&self) -> bool {
        self.failed == 0
    }

    pub fn offending_ids(&self) -> impl Iterator<Item = &str> {
        self.offending.iter().map(|row| row.patient_id.as_str())
    }
}

/// Dataset shape as seen by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub rows: u64,
    pub columns: u64,
}

/// Aggregate score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    /// `round1(100 * mean(pass_rate))` over all checks.
    pub overall: f64,
    pub formula: String,
    pub checks_passed: u64,
    pub checks_total: u64,
    /// Rows appearing in no offending list.
    pub clean_rows: u64,
    pub clean_row_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meets_threshold: Option<bool>,
}

/// Structured result of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub generated_at: DateTime<Utc>,
    pub dataset: DatasetSummary,
    pub checks: Vec<CheckResult>,
    pub score: QualityScore,
}

impl QualityReport {
    pub fn check(&self, kind: CheckKind) -> Option<&CheckResult> {
        self.checks.iter().find(|result| result.check == kind)
    }

    pub fn failed_checks(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|result| !result.is_pass())
    }

    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(CheckResult::is_pass)
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
