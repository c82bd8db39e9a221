//! Quality report rendering.
//!
//! Both representations are pure functions of one [`QualityReport`] value,
//! so the machine-readable and human-readable documents cannot disagree.

mod html;
mod json;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cardio_model::QualityReport;

pub use html::render_html;
pub use json::render_json;

/// JSON report file name.
pub const JSON_REPORT_FILE: &str = "dq_report.json";

/// HTML report file name.
pub const HTML_REPORT_FILE: &str = "dq_report.html";

/// Paths of the written report files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub html: PathBuf,
}

/// Render both representations and write them into `dir`.
///
/// Both documents are rendered before either file is written.
pub fn write_reports(report: &QualityReport, dir: &Path) -> Result<ReportPaths> {
    let json = render_json(report)?;
    let html = render_html(report)?;

    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let paths = ReportPaths {
        json: dir.join(JSON_REPORT_FILE),
        html: dir.join(HTML_REPORT_FILE),
    };
    fs::write(&paths.json, json).with_context(|| format!("write {}", paths.json.display()))?;
    fs::write(&paths.html, html).with_context(|| format!("write {}", paths.html.display()))?;

    tracing::info!(
        json = %paths.json.display(),
        html = %paths.html.display(),
        "quality reports written"
    );
    Ok(paths)
}
