//! Star-schema warehouse tables built from the featured rows.
//!
//! Surrogate keys are 1-based and assigned in first-appearance order, so the
//! tables are a deterministic function of the featured rows.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use cardio_model::FeaturedRecord;

use crate::error::Result;
use crate::table::write_table_file;

pub const DIM_PATIENT_COLUMNS: [&str; 8] = [
    "patient_key",
    "patient_id",
    "gender",
    "age_band",
    "bmi_band",
    "smoker_flag",
    "alcohol_flag",
    "active_flag",
];

pub const DIM_TIME_COLUMNS: [&str; 5] = ["date_key", "date", "year", "month", "quarter"];

pub const DIM_LAB_COLUMNS: [&str; 4] = ["lab_key", "cholesterol_level", "glucose_level", "bp_band"];

pub const FACT_COLUMNS: [&str; 10] = [
    "patient_key",
    "date_key",
    "lab_key",
    "bmi",
    "ap_hi",
    "ap_lo",
    "pulse_pressure",
    "cholesterol_level",
    "glucose_level",
    "cardiovascular_event",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimPatient {
    pub patient_key: u64,
    pub patient_id: String,
    pub gender: Option<i64>,
    pub age_band: String,
    pub bmi_band: String,
    pub smoker_flag: Option<i64>,
    pub alcohol_flag: Option<i64>,
    pub active_flag: Option<i64>,
}

/// One calendar month of measurements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimTime {
    pub date_key: u64,
    /// First day of the month.
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub quarter: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimLab {
    pub lab_key: u64,
    pub cholesterol_level: Option<i64>,
    pub glucose_level: Option<i64>,
    pub bp_band: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactClinicalMetric {
    pub patient_key: u64,
    pub date_key: u64,
    pub lab_key: u64,
    pub bmi: Option<f64>,
    pub ap_hi: Option<i64>,
    pub ap_lo: Option<i64>,
    pub pulse_pressure: Option<i64>,
    pub cholesterol_level: Option<i64>,
    pub glucose_level: Option<i64>,
    pub cardiovascular_event: Option<i64>,
}

/// The complete set of warehouse tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Warehouse {
    pub dim_patient: Vec<DimPatient>,
    pub dim_time: Vec<DimTime>,
    pub dim_lab: Vec<DimLab>,
    pub facts: Vec<FactClinicalMetric>,
}

/// Assigns 1-based keys in first-appearance order.
struct KeyRegistry<K> {
    keys: HashMap<K, u64>,
}

impl<K: std::hash::Hash + Eq> KeyRegistry<K> {
    fn new() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }

    /// Returns the key and whether it was newly assigned.
    fn key(&mut self, value: K) -> (u64, bool) {
        let next = self.keys.len() as u64 + 1;
        match self.keys.entry(value) {
            Entry::Occupied(entry) => (*entry.get(), false),
            Entry::Vacant(entry) => {
                entry.insert(next);
                (next, true)
            }
        }
    }
}

/// Build the dimension and fact tables. One fact row per featured row.
pub fn build_warehouse(rows: &[FeaturedRecord]) -> Warehouse {
    let mut warehouse = Warehouse::default();
    let mut patients = KeyRegistry::new();
    let mut months = KeyRegistry::new();
    let mut labs = KeyRegistry::new();

    for row in rows {
        let (patient_key, new_patient) = patients.key(row.patient_id.clone());
        if new_patient {
            warehouse.dim_patient.push(DimPatient {
                patient_key,
                patient_id: row.patient_id.clone(),
                gender: row.gender,
                age_band: row.age_band.clone(),
                bmi_band: row.bmi_band.clone(),
                smoker_flag: row.smoke,
                alcohol_flag: row.alcohol,
                active_flag: row.active,
            });
        }

        let (date_key, new_month) = months.key(row.measure_month);
        if new_month {
            let date = row.measure_month;
            warehouse.dim_time.push(DimTime {
                date_key,
                date,
                year: date.year(),
                month: date.month(),
                quarter: (date.month() - 1) / 3 + 1,
            });
        }

        let lab = (row.cholesterol_level, row.glucose_level, row.bp_band.clone());
        let (lab_key, new_lab) = labs.key(lab);
        if new_lab {
            warehouse.dim_lab.push(DimLab {
                lab_key,
                cholesterol_level: row.cholesterol_level,
                glucose_level: row.glucose_level,
                bp_band: row.bp_band.clone(),
            });
        }

        warehouse.facts.push(FactClinicalMetric {
            patient_key,
            date_key,
            lab_key,
            bmi: row.bmi,
            ap_hi: row.ap_hi,
            ap_lo: row.ap_lo,
            pulse_pressure: row.pulse_pressure,
            cholesterol_level: row.cholesterol_level,
            glucose_level: row.glucose_level,
            cardiovascular_event: row.cardiovascular_event,
        });
    }

    tracing::debug!(
        dim_patient = warehouse.dim_patient.len(),
        dim_time = warehouse.dim_time.len(),
        dim_lab = warehouse.dim_lab.len(),
        facts = warehouse.facts.len(),
        "warehouse built"
    );
    warehouse
}

/// Write every table as `<name>.csv` under `dir`. Returns the written paths.
pub fn write_warehouse(warehouse: &Warehouse, dir: &Path) -> Result<Vec<PathBuf>> {
    let dim_patient = dir.join("dim_patient.csv");
    let dim_time = dir.join("dim_time.csv");
    let dim_lab = dir.join("dim_lab.csv");
    let facts = dir.join("fact_clinical_metrics.csv");

    write_table_file(&dim_patient, &DIM_PATIENT_COLUMNS, &warehouse.dim_patient)?;
    write_table_file(&dim_time, &DIM_TIME_COLUMNS, &warehouse.dim_time)?;
    write_table_file(&dim_lab, &DIM_LAB_COLUMNS, &warehouse.dim_lab)?;
    write_table_file(&facts, &FACT_COLUMNS, &warehouse.facts)?;

    tracing::info!(
        dir = %dir.display(),
        facts = warehouse.facts.len(),
        "warehouse tables written"
    );
    Ok(vec![dim_patient, dim_time, dim_lab, facts])
}
