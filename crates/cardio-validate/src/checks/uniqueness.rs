//! `patient_id` uniqueness across the whole set.
//!
//! Every row of a duplicate group fails, so a forced collision between two
//! rows reports both.

use std::collections::HashMap;

use cardio_model::{CheckDetails, CheckKind, CheckResult, DuplicateGroup, FeaturedRecord};

use super::{finish, offending_row};

pub fn check(rows: &[FeaturedRecord]) -> CheckResult {
    // Groups in first-appearance order.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();

    for (idx, record) in rows.iter().enumerate() {
        let id = record.patient_id.as_str();
        match index.get(id) {
            Some(&slot) => groups[slot].1.push(idx),
            None => {
                index.insert(id, groups.len());
                groups.push((id, vec![idx]));
            }
        }
    }

    let unique_patient_ids = groups.len() as u64;
    let duplicates: Vec<DuplicateGroup> = groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(id, members)| DuplicateGroup {
            patient_id: id.to_string(),
            rows: members,
        })
        .collect();

    let mut failing_rows: Vec<usize> = duplicates
        .iter()
        .flat_map(|group| group.rows.iter().copied())
        .collect();
    failing_rows.sort_unstable();
    let offending = failing_rows
        .into_iter()
        .map(|idx| offending_row(rows, idx))
        .collect::<Vec<_>>();

    let failed = offending.len() as u64;
    finish(
        CheckKind::IdentifierUniqueness,
        rows.len() as u64,
        failed,
        offending,
        CheckDetails::Uniqueness {
            unique_patient_ids,
            duplicate_patient_ids: rows.len() as u64 - unique_patient_ids,
            groups: duplicates,
        },
    )
}
