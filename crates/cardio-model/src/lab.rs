//! Ordinal lab codes and their categorical labels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category for the 1..=3 ordinal cholesterol and glucose codes.
///
/// Codes outside the known range map to [`LabCategory::Unmapped`] instead of
/// failing, so the row survives derivation and is flagged by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabCategory {
    Normal,
    AboveNormal,
    WellAboveNormal,
    Unmapped,
}

impl LabCategory {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Normal,
            2 => Self::AboveNormal,
            3 => Self::WellAboveNormal,
            _ => Self::Unmapped,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::AboveNormal => "above_normal",
            Self::WellAboveNormal => "well_above_normal",
            Self::Unmapped => "unmapped",
        }
    }

    pub fn is_mapped(&self) -> bool {
        !matches!(self, Self::Unmapped)
    }
}

impl fmt::Display for LabCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
