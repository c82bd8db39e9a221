//! Validation entry points.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use cardio_model::{DatasetSummary, FEATURED_COLUMNS, FeaturedRecord, QualityConfig, QualityReport};

use crate::checks::run_all;
use crate::score::compute_score;

/// Validate the featured rows and stamp the report with the current time.
///
/// `source` names the input in the report's dataset summary.
pub fn validate(
    rows: &[FeaturedRecord],
    config: &QualityConfig,
    source: Option<&str>,
) -> QualityReport {
    validate_at(rows, config, source, Utc::now())
}

/// Validate with an explicit report timestamp.
///
/// Two calls on identical input and configuration return equal reports when
/// given the same timestamp.
pub fn validate_at(
    rows: &[FeaturedRecord],
    config: &QualityConfig,
    source: Option<&str>,
    generated_at: DateTime<Utc>,
) -> QualityReport {
    let checks = run_all(rows, config);
    let score = compute_score(&checks, rows.len(), config.score_threshold);

    info!(
        rows = rows.len(),
        checks_passed = score.checks_passed,
        checks_total = score.checks_total,
        overall = score.overall,
        "validation complete"
    );
    if score.meets_threshold == Some(false) {
        warn!(
            overall = score.overall,
            threshold = score.threshold,
            "quality score below configured threshold"
        );
    }

    QualityReport {
        generated_at,
        dataset: DatasetSummary {
            source: source.map(str::to_string),
            rows: rows.len() as u64,
            columns: FEATURED_COLUMNS.len() as u64,
        },
        checks,
        score,
    }
}
