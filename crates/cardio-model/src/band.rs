//! Fixed, ordered bucket tables for banding continuous values.
//!
//! A table is a list of contiguous half-open intervals `[lower, upper)`.
//! Only the last band may leave `upper` open. Values that fall outside every
//! band, and values that are missing or non-finite, map to [`UNKNOWN_BAND`].

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Reserved sentinel label for values no band covers.
pub const UNKNOWN_BAND: &str = "unknown";

/// A single named interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandDef {
    pub label: String,
    /// Inclusive lower edge.
    pub lower: f64,
    /// Exclusive upper edge; `None` leaves the band open-ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

impl BandDef {
    pub fn new(label: impl Into<String>, lower: f64, upper: Option<f64>) -> Self {
        Self {
            label: label.into(),
            lower,
            upper,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && self.upper.is_none_or(|upper| value < upper)
    }
}

/// Ordered, non-overlapping band boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandTable {
    bands: Vec<BandDef>,
}

impl BandTable {
    /// Build a table, rejecting boundaries that are unordered or overlapping.
    pub fn new(name: &str, bands: Vec<BandDef>) -> Result<Self> {
        let table = Self { bands };
        table.validate(name)?;
        Ok(table)
    }

    pub fn bands(&self) -> &[BandDef] {
        &self.bands
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bands.iter().map(|band| band.label.as_str())
    }

    /// True for any label this table can assign, including the sentinel.
    pub fn is_known_label(&self, label: &str) -> bool {
        label == UNKNOWN_BAND || self.labels().any(|known| known == label)
    }

    /// Assign a band label by binary search over the lower edges.
    pub fn assign(&self, value: Option<f64>) -> &str {
        let Some(value) = value.filter(|v| v.is_finite()) else {
            return UNKNOWN_BAND;
        };
        let idx = self.bands.partition_point(|band| band.lower <= value);
        match idx.checked_sub(1).map(|i| &self.bands[i]) {
            Some(band) if band.contains(value) => &band.label,
            _ => UNKNOWN_BAND,
        }
    }

    /// Check ordering, contiguity and label rules.
    pub fn validate(&self, name: &str) -> Result<()> {
        let invalid = |reason: String| ModelError::InvalidBands {
            table: name.to_string(),
            reason,
        };
        if self.bands.is_empty() {
            return Err(invalid("table has no bands".to_string()));
        }
        let last = self.bands.len() - 1;
        for (idx, band) in self.bands.iter().enumerate() {
            let label = band.label.trim();
            if label.is_empty() {
                return Err(invalid(format!("band {idx} has an empty label")));
            }
            if label.eq_ignore_ascii_case(UNKNOWN_BAND) {
                return Err(invalid(format!("label '{UNKNOWN_BAND}' is reserved")));
            }
            if !band.lower.is_finite() {
                return Err(invalid(format!("band '{label}' has a non-finite lower edge")));
            }
            match band.upper {
                Some(upper) if upper.is_nan() || upper <= band.lower => {
                    return Err(invalid(format!(
                        "band '{label}' upper edge {upper} is not above lower edge {}",
                        band.lower
                    )));
                }
                None if idx != last => {
                    return Err(invalid(format!(
                        "only the last band may be open-ended, '{label}' is not last"
                    )));
                }
                _ => {}
            }
            if self.bands[..idx].iter().any(|other| other.label == band.label) {
                return Err(invalid(format!("duplicate label '{label}'")));
            }
            if idx > 0 {
                let previous = self.bands[idx - 1].upper;
                if previous != Some(band.lower) {
                    return Err(invalid(format!(
                        "band '{label}' does not start where the previous band ends"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Age bands in completed years.
pub fn default_age_bands() -> BandTable {
    BandTable {
        bands: vec![
            BandDef::new("18-29", 18.0, Some(30.0)),
            BandDef::new("30-39", 30.0, Some(40.0)),
            BandDef::new("40-49", 40.0, Some(50.0)),
            BandDef::new("50-59", 50.0, Some(60.0)),
            BandDef::new("60-69", 60.0, Some(70.0)),
            BandDef::new("70+", 70.0, None),
        ],
    }
}

/// WHO adult BMI categories.
pub fn default_bmi_bands() -> BandTable {
    BandTable {
        bands: vec![
            BandDef::new("underweight", 0.0, Some(18.5)),
            BandDef::new("normal", 18.5, Some(25.0)),
            BandDef::new("overweight", 25.0, Some(30.0)),
            BandDef::new("obese", 30.0, None),
        ],
    }
}

/// Systolic pressure categories.
pub fn default_bp_bands() -> BandTable {
    BandTable {
        bands: vec![
            BandDef::new("normal", 0.0, Some(120.0)),
            BandDef::new("elevated", 120.0, Some(130.0)),
            BandDef::new("stage1", 130.0, Some(140.0)),
            BandDef::new("stage2", 140.0, Some(180.0)),
            BandDef::new("hypertensive_crisis", 180.0, None),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        default_age_bands().validate("age").unwrap();
        default_bmi_bands().validate("bmi").unwrap();
        default_bp_bands().validate("bp").unwrap();
    }

    #[test]
    fn lower_edge_is_inclusive() {
        let bmi = default_bmi_bands();
        assert_eq!(bmi.assign(Some(25.0)), "overweight");
        assert_eq!(bmi.assign(Some(24.999)), "normal");
        assert_eq!(bmi.assign(Some(18.5)), "normal");
        assert_eq!(bmi.assign(Some(42.0)), "obese");
    }

    #[test]
    fn out_of_range_values_are_unknown() {
        let age = default_age_bands();
        assert_eq!(age.assign(Some(17.0)), UNKNOWN_BAND);
        assert_eq!(age.assign(None), UNKNOWN_BAND);
        assert_eq!(age.assign(Some(f64::NAN)), UNKNOWN_BAND);
        assert_eq!(age.assign(Some(120.0)), "70+");
    }

    #[test]
    fn closed_last_band_rejects_values_above() {
        let table = BandTable::new(
            "closed",
            vec![
                BandDef::new("low", 0.0, Some(10.0)),
                BandDef::new("high", 10.0, Some(20.0)),
            ],
        )
        .unwrap();
        assert_eq!(table.assign(Some(19.9)), "high");
        assert_eq!(table.assign(Some(20.0)), UNKNOWN_BAND);
    }

    #[test]
    fn rejects_gaps_and_reserved_labels() {
        let gap = BandTable::new(
            "gap",
            vec![
                BandDef::new("a", 0.0, Some(10.0)),
                BandDef::new("b", 11.0, None),
            ],
        );
        assert!(matches!(gap, Err(ModelError::InvalidBands { .. })));

        let reserved = BandTable::new("reserved", vec![BandDef::new("unknown", 0.0, None)]);
        assert!(reserved.is_err());

        let open_middle = BandTable::new(
            "open",
            vec![BandDef::new("a", 0.0, None), BandDef::new("b", 10.0, None)],
        );
        assert!(open_middle.is_err());

        assert!(BandTable::new("empty", Vec::new()).is_err());
    }

    #[test]
    fn known_labels_include_sentinel() {
        let bmi = default_bmi_bands();
        assert!(bmi.is_known_label("obese"));
        assert!(bmi.is_known_label(UNKNOWN_BAND));
        assert!(!bmi.is_known_label("morbid"));
    }
}
