//! Shared types for the cardio de-identification and quality pipeline.

pub mod band;
pub mod config;
pub mod error;
pub mod lab;
pub mod quality;
pub mod record;

pub use band::{BandDef, BandTable, UNKNOWN_BAND};
pub use config::{
    Bounds, DeriveConfig, HypertensionThresholds, IdStrategy, IngestConfig, MeasureDateConfig,
    PipelineConfig, QualityConfig,
};
pub use error::{ModelError, Result};
pub use lab::LabCategory;
pub use quality::{
    CheckDetails, CheckKind, CheckResult, DatasetSummary, DuplicateGroup, FieldCount,
    FieldMissing, OffendingRow, QualityReport, QualityScore, RangeTally, SCORE_FORMULA, round1,
};
pub use record::{
    FEATURED_COLUMNS, FeaturedField, FeaturedRecord, MEASURE_DATE_COLUMN, RAW_COLUMNS,
    RawPatientRecord,
};
