//! Blood-pressure consistency: the systolic reading must not be below the
//! diastolic one. Rows missing either reading are skipped.

use cardio_model::{CheckDetails, CheckKind, CheckResult, FeaturedRecord};

use super::{finish, offending_row};

pub fn check(rows: &[FeaturedRecord]) -> CheckResult {
    let mut evaluated = 0u64;
    let mut skipped = 0u64;
    let mut min_pulse_pressure: Option<i64> = None;
    let mut offending = Vec::new();

    for (idx, record) in rows.iter().enumerate() {
        let (Some(ap_hi), Some(ap_lo)) = (record.ap_hi, record.ap_lo) else {
            skipped += 1;
            continue;
        };
        evaluated += 1;
        let pulse = ap_hi.saturating_sub(ap_lo);
        min_pulse_pressure = Some(min_pulse_pressure.map_or(pulse, |min| min.min(pulse)));
        if ap_hi < ap_lo {
            offending.push(offending_row(rows, idx));
        }
    }

    let failed = offending.len() as u64;
    finish(
        CheckKind::BpConsistency,
        evaluated,
        failed,
        offending,
        CheckDetails::Consistency {
            skipped,
            min_pulse_pressure,
        },
    )
}
