//! Category validity: lab codes outside the known ordinals and rows whose
//! age or BMI fell into the `unknown` band.

use cardio_model::{
    CheckDetails, CheckKind, CheckResult, FeaturedRecord, FieldCount, LabCategory, UNKNOWN_BAND,
};

use super::{finish, offending_row};

const FIELDS: [&str; 4] = [
    "cholesterol_category",
    "glucose_category",
    "age_band",
    "bmi_band",
];

fn unknown_band(label: &str) -> bool {
    label.is_empty() || label == UNKNOWN_BAND
}

pub fn check(rows: &[FeaturedRecord]) -> CheckResult {
    let mut counts = [0u64; FIELDS.len()];
    let mut offending = Vec::new();

    for (idx, record) in rows.iter().enumerate() {
        let flags = [
            record.cholesterol_category == Some(LabCategory::Unmapped),
            record.glucose_category == Some(LabCategory::Unmapped),
            unknown_band(&record.age_band),
            unknown_band(&record.bmi_band),
        ];
        for (count, flagged) in counts.iter_mut().zip(flags) {
            if flagged {
                *count += 1;
            }
        }
        if flags.contains(&true) {
            offending.push(offending_row(rows, idx));
        }
    }

    let fields = FIELDS
        .iter()
        .zip(counts)
        .map(|(field, count)| FieldCount {
            field: field.to_string(),
            count,
        })
        .collect();

    let failed = offending.len() as u64;
    finish(
        CheckKind::CategoryValidity,
        rows.len() as u64,
        failed,
        offending,
        CheckDetails::CategoryValidity { fields },
    )
}
