//! CSV output for featured records and the analytics warehouse.

mod error;
mod featured;
mod table;
mod warehouse;

pub use error::{OutputError, Result};
pub use featured::{FEATURED_FILE, write_featured, write_featured_csv};
pub use warehouse::{
    DIM_LAB_COLUMNS, DIM_PATIENT_COLUMNS, DIM_TIME_COLUMNS, DimLab, DimPatient, DimTime,
    FACT_COLUMNS, FactClinicalMetric, Warehouse, build_warehouse, write_warehouse,
};
