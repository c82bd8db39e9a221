//! Structured JSON document.

use anyhow::{Context, Result};
use cardio_model::QualityReport;

/// Pretty-printed JSON with a trailing newline.
pub fn render_json(report: &QualityReport) -> Result<String> {
    let mut text = serde_json::to_string_pretty(report).context("serialize quality report")?;
    text.push('\n');
    Ok(text)
}
