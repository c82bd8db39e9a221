use std::path::PathBuf;

use cardio_model::QualityReport;
use cardio_report::ReportPaths;

/// Everything one `run` produced.
#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub rows: usize,
    pub report: QualityReport,
    /// `None` for a dry run.
    pub outputs: Option<OutputPaths>,
    pub min_score: Option<f64>,
}

impl RunResult {
    /// True when a minimum score was requested and the run fell short of it.
    pub fn below_min_score(&self) -> bool {
        self.min_score.is_some_and(|min| self.report.score.overall < min)
    }
}

/// Files written by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub featured: PathBuf,
    pub reports: ReportPaths,
    /// Empty when the warehouse export is disabled.
    pub warehouse: Vec<PathBuf>,
}
