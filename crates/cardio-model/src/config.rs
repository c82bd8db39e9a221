//! Pipeline configuration.
//!
//! Every threshold and boundary used by derivation and validation lives here
//! as a named field with a documented default. Configuration is passed
//! explicitly into each component; nothing reads ambient state.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::band::{BandTable, default_age_bands, default_bmi_bands, default_bp_bands};
use crate::error::{ModelError, Result};
use crate::record::FeaturedField;

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, field: &str) -> Result<()> {
        if self.min.is_nan() || self.max.is_nan() || self.min > self.max {
            return Err(ModelError::InvalidBounds {
                field: field.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// How surrogate `patient_id` values are produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdStrategy {
    /// `P0000001`, `P0000002`, ... in input order.
    #[default]
    Sequential,
    /// Truncated SHA-256 over the salt, the non-identifying fields and the
    /// occurrence count of that field tuple.
    ContentHash { salt: String },
}

/// Thresholds for the hypertension flag (either reading at or above).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HypertensionThresholds {
    pub systolic: i64,
    pub diastolic: i64,
}

impl Default for HypertensionThresholds {
    fn default() -> Self {
        Self {
            systolic: 140,
            diastolic: 90,
        }
    }
}

/// Windows for measurement dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureDateConfig {
    /// Window for synthesised dates when the source has none.
    pub synthetic_start: NaiveDate,
    pub synthetic_end: NaiveDate,
    /// Supplied dates are clipped into this window.
    pub clip_start: NaiveDate,
    pub clip_end: NaiveDate,
    pub seed: u64,
}

impl Default for MeasureDateConfig {
    fn default() -> Self {
        Self {
            synthetic_start: ymd(2010, 1, 1),
            synthetic_end: ymd(2015, 12, 31),
            clip_start: ymd(2010, 1, 1),
            clip_end: ymd(2025, 12, 31),
            seed: 42,
        }
    }
}

impl MeasureDateConfig {
    fn validate(&self) -> Result<()> {
        if self.synthetic_start > self.synthetic_end {
            return Err(ModelError::Config(
                "measure_dates.synthetic_start is after synthetic_end".to_string(),
            ));
        }
        if self.clip_start > self.clip_end {
            return Err(ModelError::Config(
                "measure_dates.clip_start is after clip_end".to_string(),
            ));
        }
        Ok(())
    }
}

/// Feature derivation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriveConfig {
    /// Divisor for `age_years = floor(age_days / days_per_year)`.
    pub days_per_year: f64,
    pub id_strategy: IdStrategy,
    pub hypertension: HypertensionThresholds,
    pub measure_dates: MeasureDateConfig,
    pub age_bands: BandTable,
    pub bmi_bands: BandTable,
    pub bp_bands: BandTable,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            days_per_year: 365.25,
            id_strategy: IdStrategy::default(),
            hypertension: HypertensionThresholds::default(),
            measure_dates: MeasureDateConfig::default(),
            age_bands: default_age_bands(),
            bmi_bands: default_bmi_bands(),
            bp_bands: default_bp_bands(),
        }
    }
}

/// Validator thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Fields checked for missingness, in report order.
    pub required_fields: Vec<FeaturedField>,
    /// Minimum acceptable overall score (0-100). Recorded in the report only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_threshold: Option<f64>,
    pub age_years: Bounds,
    pub height: Bounds,
    pub weight: Bounds,
    pub bmi: Bounds,
    pub ap_hi: Bounds,
    pub ap_lo: Bounds,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            required_fields: vec![
                FeaturedField::AgeDays,
                FeaturedField::Gender,
                FeaturedField::Height,
                FeaturedField::Weight,
                FeaturedField::ApHi,
                FeaturedField::ApLo,
                FeaturedField::CholesterolLevel,
                FeaturedField::GlucoseLevel,
                FeaturedField::Smoke,
                FeaturedField::Alcohol,
                FeaturedField::Active,
                FeaturedField::CardiovascularEvent,
                FeaturedField::Bmi,
            ],
            score_threshold: None,
            age_years: Bounds::new(18.0, 100.0),
            height: Bounds::new(120.0, 220.0),
            weight: Bounds::new(35.0, 250.0),
            bmi: Bounds::new(10.0, 80.0),
            ap_hi: Bounds::new(80.0, 250.0),
            ap_lo: Bounds::new(40.0, 160.0),
        }
    }
}

impl QualityConfig {
    fn validate(&self) -> Result<()> {
        self.age_years.validate("age_years")?;
        self.height.validate("height")?;
        self.weight.validate("weight")?;
        self.bmi.validate("bmi")?;
        self.ap_hi.validate("ap_hi")?;
        self.ap_lo.validate("ap_lo")?;
        for (idx, field) in self.required_fields.iter().enumerate() {
            if self.required_fields[..idx].contains(field) {
                return Err(ModelError::Config(format!(
                    "required field '{field}' listed more than once"
                )));
            }
        }
        if let Some(threshold) = self.score_threshold
            && !(0.0..=100.0).contains(&threshold)
        {
            return Err(ModelError::Config(format!(
                "score_threshold {threshold} is outside 0-100"
            )));
        }
        Ok(())
    }
}

/// Input reading options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Field separator; detected from the header line when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<char>,
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub ingest: IngestConfig,
    pub derive: DeriveConfig,
    pub quality: QualityConfig,
}

impl PipelineConfig {
    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ModelError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(separator) = self.ingest.separator
            && !separator.is_ascii()
        {
            return Err(ModelError::Config(format!(
                "separator '{separator}' must be a single ASCII character"
            )));
        }
        if !(self.derive.days_per_year.is_finite() && self.derive.days_per_year > 0.0) {
            return Err(ModelError::Config(
                "days_per_year must be a positive number".to_string(),
            ));
        }
        self.derive.age_bands.validate("age_bands")?;
        self.derive.bmi_bands.validate("bmi_bands")?;
        self.derive.bp_bands.validate("bp_bands")?;
        self.derive.measure_dates.validate()?;
        self.quality.validate()
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_include_both_ends() {
        let bounds = Bounds::new(120.0, 220.0);
        assert!(bounds.contains(120.0));
        assert!(bounds.contains(220.0));
        assert!(!bounds.contains(119.9));
        assert!(!bounds.contains(220.1));
        assert!(!bounds.contains(f64::NAN));
    }

    #[test]
    fn default_config_is_valid() {
        PipelineConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [quality.age_years]
            min = 0.0
            max = 120.0
            "#,
        )
        .unwrap();
        assert_eq!(config.quality.age_years, Bounds::new(0.0, 120.0));
        assert_eq!(config.quality.height, QualityConfig::default().height);
        assert_eq!(config.derive, DeriveConfig::default());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let result = PipelineConfig::from_toml_str(
            r#"
            [quality.weight]
            min = 300.0
            max = 35.0
            "#,
        );
        assert!(matches!(result, Err(ModelError::InvalidBounds { .. })));
    }

    #[test]
    fn unknown_required_field_is_rejected() {
        let result = PipelineConfig::from_toml_str(
            r#"
            [quality]
            required_fields = ["age_days", "shoe_size"]
            "#,
        );
        assert!(matches!(result, Err(ModelError::ConfigParse(_))));
    }

    #[test]
    fn band_tables_round_trip_through_toml() {
        let text = PipelineConfig::default().to_toml_string().unwrap();
        let parsed = PipelineConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, PipelineConfig::default());
    }

    #[test]
    fn content_hash_strategy_parses() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [derive.id_strategy]
            kind = "content_hash"
            salt = "pepper"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.derive.id_strategy,
            IdStrategy::ContentHash {
                salt: "pepper".to_string()
            }
        );
    }

    #[test]
    fn overlapping_bands_in_toml_are_rejected() {
        let result = PipelineConfig::from_toml_str(
            r#"
            [[derive.bmi_bands]]
            label = "low"
            lower = 0.0
            upper = 25.0

            [[derive.bmi_bands]]
            label = "high"
            lower = 20.0
            "#,
        );
        assert!(matches!(result, Err(ModelError::InvalidBands { .. })));
    }
}
