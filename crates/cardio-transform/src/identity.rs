//! Surrogate patient identifiers.
//!
//! The raw source identifier never reaches either strategy, so an output id
//! cannot be mapped back to it from the featured data alone.

use std::collections::{HashMap, HashSet};

use sha2::{Digest, Sha256};

use cardio_model::{IdStrategy, RawPatientRecord};

/// Hex characters kept from the content hash.
const HASH_ID_LEN: usize = 16;

/// Issues one `patient_id` per row, in input order.
///
/// Ids are unique within one generator. Both strategies are deterministic for
/// a given input order.
#[derive(Debug)]
pub struct PatientIdGenerator {
    strategy: IdStrategy,
    issued: usize,
    occurrences: HashMap<String, u64>,
    seen: HashSet<String>,
}

impl PatientIdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            issued: 0,
            occurrences: HashMap::new(),
            seen: HashSet::new(),
        }
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> usize {
        self.issued
    }

    pub fn next_id(&mut self, record: &RawPatientRecord) -> String {
        self.issued += 1;
        match &self.strategy {
            IdStrategy::Sequential => format!("P{:07}", self.issued),
            IdStrategy::ContentHash { salt } => {
                let tuple = content_tuple(record);
                let occurrence = self.occurrences.entry(tuple.clone()).or_insert(0);
                loop {
                    let id = hash_id(salt, &tuple, *occurrence);
                    *occurrence += 1;
                    // Truncated hashes can still collide; move on to the next occurrence.
                    if self.seen.insert(id.clone()) {
                        return id;
                    }
                }
            }
        }
    }
}

fn hash_id(salt: &str, tuple: &str, occurrence: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update([0x1f]);
    hasher.update(tuple.as_bytes());
    hasher.update([0x1f]);
    hasher.update(occurrence.to_le_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(HASH_ID_LEN);
    id
}

/// Non-identifying fields joined with a unit separator. Missing values are empty.
fn content_tuple(record: &RawPatientRecord) -> String {
    fn int(value: Option<i64>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }
    fn float(value: Option<f64>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    [
        int(record.age_days),
        int(record.gender),
        float(record.height_cm),
        float(record.weight_kg),
        int(record.ap_hi),
        int(record.ap_lo),
        int(record.cholesterol),
        int(record.glucose),
        int(record.smoke),
        int(record.alcohol),
        int(record.active),
        int(record.cardio),
        record.measure_date.clone().unwrap_or_default(),
    ]
    .join("\u{1f}")
}
