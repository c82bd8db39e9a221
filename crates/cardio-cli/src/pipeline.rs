//! Run processing pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: Read the raw CSV and check its header
//! 2. **Derive**: De-identify rows and compute features
//! 3. **Validate**: Run the quality checks and score the result
//! 4. **Export**: Write the featured CSV, quality reports and warehouse tables
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use cardio_ingest::{RawDataset, read_raw_dataset};
use cardio_model::{
    DeriveConfig, FeaturedRecord, IngestConfig, PipelineConfig, QualityConfig, QualityReport,
};
use cardio_output::{FEATURED_FILE, build_warehouse, write_featured_csv, write_warehouse};
use cardio_report::write_reports;
use cardio_transform::derive_features;

use crate::logging::redact_value;
use crate::types::{OutputPaths, RunResult};

/// Directory under the output root holding the quality reports.
pub const QUALITY_DIR: &str = "quality";

/// Directory under the output root holding the warehouse tables.
pub const WAREHOUSE_DIR: &str = "warehouse";

/// Options that shape one run without changing its results.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Defaults to `output/` beside the input file.
    pub output_dir: Option<PathBuf>,
    pub write_warehouse: bool,
    /// Validate and report without writing output files.
    pub dry_run: bool,
    pub min_score: Option<f64>,
}

/// Run all stages over one input file.
pub fn run_pipeline(
    input: &Path,
    config: &PipelineConfig,
    options: &RunOptions,
) -> Result<RunResult> {
    config.validate().context("invalid configuration")?;
    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(input));
    let run_span = info_span!("run", input = %input.display());
    let _run_guard = run_span.enter();

    let dataset = ingest(input, &config.ingest)?;
    let featured = derive(&dataset, &config.derive);
    let source = input.file_name().map(|name| name.to_string_lossy().into_owned());
    let report = validate(&featured, &config.quality, source.as_deref());

    let outputs = if options.dry_run {
        info!(output_dir = %output_dir.display(), "dry run, no files written");
        None
    } else {
        Some(export(&featured, &report, &output_dir, options.write_warehouse)?)
    };

    Ok(RunResult {
        input: input.to_path_buf(),
        output_dir,
        rows: featured.len(),
        report,
        outputs,
        min_score: options.min_score,
    })
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Read the raw dataset. A header without every required column is fatal.
pub fn ingest(input: &Path, config: &IngestConfig) -> Result<RawDataset> {
    let span = info_span!("ingest", input = %input.display());
    let _guard = span.enter();
    let start = Instant::now();
    let dataset = read_raw_dataset(input, config)
        .with_context(|| format!("read {}", input.display()))?;
    info!(
        rows = dataset.records.len(),
        columns = dataset.columns.len(),
        has_measure_date = dataset.has_measure_date,
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(dataset)
}

// ============================================================================
// Stage 2: Derive
// ============================================================================

pub fn derive(dataset: &RawDataset, config: &DeriveConfig) -> Vec<FeaturedRecord> {
    let span = info_span!("derive", rows = dataset.records.len());
    let _guard = span.enter();
    let start = Instant::now();
    let featured = derive_features(&dataset.records, config);
    info!(
        rows = featured.len(),
        duration_ms = start.elapsed().as_millis(),
        "derive complete"
    );
    featured
}

// ============================================================================
// Stage 3: Validate
// ============================================================================

pub fn validate(
    rows: &[FeaturedRecord],
    config: &QualityConfig,
    source: Option<&str>,
) -> QualityReport {
    let span = info_span!("validate", rows = rows.len());
    let _guard = span.enter();
    let start = Instant::now();
    let report = cardio_validate::validate(rows, config, source);
    for check in report.failed_checks() {
        debug!(
            check = %check.check,
            failed = check.failed,
            first_offender = check
                .offending_ids()
                .next()
                .map(redact_value)
                .unwrap_or("-"),
            "check failed"
        );
    }
    info!(
        overall = report.score.overall,
        failed_checks = report.failed_checks().count(),
        duration_ms = start.elapsed().as_millis(),
        "validate complete"
    );
    report
}

// ============================================================================
// Stage 4: Export
// ============================================================================

/// Write the featured CSV, both reports and, when enabled, the warehouse.
pub fn export(
    rows: &[FeaturedRecord],
    report: &QualityReport,
    output_dir: &Path,
    with_warehouse: bool,
) -> Result<OutputPaths> {
    let span = info_span!("export", output_dir = %output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let featured = output_dir.join(FEATURED_FILE);
    write_featured_csv(&featured, rows)
        .with_context(|| format!("write {}", featured.display()))?;

    let reports = write_reports(report, &output_dir.join(QUALITY_DIR))
        .context("write quality reports")?;

    let warehouse = if with_warehouse {
        let tables = build_warehouse(rows);
        write_warehouse(&tables, &output_dir.join(WAREHOUSE_DIR))
            .context("write warehouse tables")?
    } else {
        debug!("warehouse export disabled");
        Vec::new()
    };

    info!(
        files = 3 + warehouse.len(),
        duration_ms = start.elapsed().as_millis(),
        "export complete"
    );
    Ok(OutputPaths {
        featured,
        reports,
        warehouse,
    })
}

/// `output/` beside the input file.
pub fn default_output_dir(input: &Path) -> PathBuf {
    input
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join("output")
}
