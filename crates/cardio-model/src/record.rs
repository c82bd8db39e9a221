//! Raw and featured patient records.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::lab::LabCategory;

/// Raw header names the source file must declare.
pub const RAW_COLUMNS: [&str; 13] = [
    "id",
    "age",
    "gender",
    "height",
    "weight",
    "ap_hi",
    "ap_lo",
    "cholesterol",
    "gluc",
    "smoke",
    "alco",
    "active",
    "cardio",
];

/// Optional raw column with an ISO measurement date.
pub const MEASURE_DATE_COLUMN: &str = "measure_date";

/// Featured column names in output order.
pub const FEATURED_COLUMNS: [&str; 24] = [
    "patient_id",
    "age_days",
    "age_years",
    "age_band",
    "gender",
    "height",
    "weight",
    "bmi",
    "bmi_band",
    "ap_hi",
    "ap_lo",
    "pulse_pressure",
    "bp_band",
    "hypertension_flag",
    "cholesterol_level",
    "cholesterol_category",
    "glucose_level",
    "glucose_category",
    "smoke",
    "alcohol",
    "active",
    "measure_date",
    "measure_month",
    "cardiovascular_event",
];

/// One source row as read from disk. Every value may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPatientRecord {
    /// Direct identifier from the source system. Dropped by de-identification.
    pub id: Option<String>,
    pub age_days: Option<i64>,
    pub gender: Option<i64>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub ap_hi: Option<i64>,
    pub ap_lo: Option<i64>,
    pub cholesterol: Option<i64>,
    pub glucose: Option<i64>,
    pub smoke: Option<i64>,
    pub alcohol: Option<i64>,
    pub active: Option<i64>,
    pub cardio: Option<i64>,
    pub measure_date: Option<String>,
}

/// De-identified, feature-augmented row.
///
/// Field order is the featured CSV column order ([`FEATURED_COLUMNS`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedRecord {
    pub patient_id: String,
    pub age_days: Option<i64>,
    pub age_years: Option<i64>,
    pub age_band: String,
    pub gender: Option<i64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub bmi: Option<f64>,
    pub bmi_band: String,
    pub ap_hi: Option<i64>,
    pub ap_lo: Option<i64>,
    pub pulse_pressure: Option<i64>,
    pub bp_band: String,
    pub hypertension_flag: Option<bool>,
    pub cholesterol_level: Option<i64>,
    pub cholesterol_category: Option<LabCategory>,
    pub glucose_level: Option<i64>,
    pub glucose_category: Option<LabCategory>,
    pub smoke: Option<i64>,
    pub alcohol: Option<i64>,
    pub active: Option<i64>,
    pub measure_date: NaiveDate,
    pub measure_month: NaiveDate,
    pub cardiovascular_event: Option<i64>,
}

/// Nullable featured fields that can be listed as required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturedField {
    AgeDays,
    AgeYears,
    Gender,
    Height,
    Weight,
    Bmi,
    ApHi,
    ApLo,
    PulsePressure,
    HypertensionFlag,
    CholesterolLevel,
    CholesterolCategory,
    GlucoseLevel,
    GlucoseCategory,
    Smoke,
    Alcohol,
    Active,
    CardiovascularEvent,
}

impl FeaturedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AgeDays => "age_days",
            Self::AgeYears => "age_years",
            Self::Gender => "gender",
            Self::Height => "height",
            Self::Weight => "weight",
            Self::Bmi => "bmi",
            Self::ApHi => "ap_hi",
            Self::ApLo => "ap_lo",
            Self::PulsePressure => "pulse_pressure",
            Self::HypertensionFlag => "hypertension_flag",
            Self::CholesterolLevel => "cholesterol_level",
            Self::CholesterolCategory => "cholesterol_category",
            Self::GlucoseLevel => "glucose_level",
            Self::GlucoseCategory => "glucose_category",
            Self::Smoke => "smoke",
            Self::Alcohol => "alcohol",
            Self::Active => "active",
            Self::CardiovascularEvent => "cardiovascular_event",
        }
    }

    /// True when the record holds no value for this field.
    ///
    /// Non-finite floats count as missing.
    pub fn is_missing(&self, record: &FeaturedRecord) -> bool {
        match self {
            Self::AgeDays => record.age_days.is_none(),
            Self::AgeYears => record.age_years.is_none(),
            Self::Gender => record.gender.is_none(),
            Self::Height => !is_present(record.height),
            Self::Weight => !is_present(record.weight),
            Self::Bmi => !is_present(record.bmi),
            Self::ApHi => record.ap_hi.is_none(),
            Self::ApLo => record.ap_lo.is_none(),
            Self::PulsePressure => record.pulse_pressure.is_none(),
            Self::HypertensionFlag => record.hypertension_flag.is_none(),
            Self::CholesterolLevel => record.cholesterol_level.is_none(),
            Self::CholesterolCategory => record.cholesterol_category.is_none(),
            Self::GlucoseLevel => record.glucose_level.is_none(),
            Self::GlucoseCategory => record.glucose_category.is_none(),
            Self::Smoke => record.smoke.is_none(),
            Self::Alcohol => record.alcohol.is_none(),
            Self::Active => record.active.is_none(),
            Self::CardiovascularEvent => record.cardiovascular_event.is_none(),
        }
    }
}

impl fmt::Display for FeaturedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_present(value: Option<f64>) -> bool {
    value.is_some_and(f64::is_finite)
}
