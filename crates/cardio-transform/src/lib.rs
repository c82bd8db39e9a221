//! Feature derivation for raw patient records.
//!
//! - **identity**: surrogate `patient_id` generation
//! - **features**: age, BMI, pulse pressure, hypertension and lab mappings
//! - **dates**: measurement date parsing, clipping and synthesis
//! - **deriver**: the row-by-row pass producing featured records

pub mod dates;
pub mod deriver;
pub mod features;
pub mod identity;

pub use dates::{DateSource, month_start, resolve_measure_date, synthetic_date};
pub use deriver::{derive_features, derive_record};
pub use features::{age_years, bmi, hypertension_flag, lab_category, pulse_pressure};
pub use identity::PatientIdGenerator;
