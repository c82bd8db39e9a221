//! Tests for cardio-model types.

use std::io::Write;

use chrono::{TimeZone, Utc};
use tempfile::NamedTempFile;

use cardio_model::{
    CheckDetails, CheckKind, CheckResult, DatasetSummary, FEATURED_COLUMNS, ModelError,
    OffendingRow, PipelineConfig, QualityReport, QualityScore, SCORE_FORMULA, round1,
};

fn check(kind: CheckKind, failed: u64) -> CheckResult {
    CheckResult {
        check: kind,
        description: kind.description().to_string(),
        evaluated: 4,
        passed: 4 - failed,
        failed,
        pass_rate: (4 - failed) as f64 / 4.0,
        offending: (0..failed as usize)
            .map(|row| OffendingRow {
                row,
                patient_id: format!("P{:07}", row + 1),
            })
            .collect(),
        details: CheckDetails::Consistency {
            skipped: 0,
            min_pulse_pressure: Some(40),
        },
    }
}

fn report() -> QualityReport {
    QualityReport {
        generated_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        dataset: DatasetSummary {
            source: Some("cardio.csv".to_string()),
            rows: 4,
            columns: 24,
        },
        checks: vec![
            check(CheckKind::BpConsistency, 1),
            check(CheckKind::AgeRange, 0),
        ],
        score: QualityScore {
            overall: 87.5,
            formula: SCORE_FORMULA.to_string(),
            checks_passed: 1,
            checks_total: 2,
            clean_rows: 3,
            clean_row_rate: 0.75,
            threshold: None,
            meets_threshold: None,
        },
    }
}

#[test]
fn report_lookup_and_failures() {
    let report = report();
    let bp = report.check(CheckKind::BpConsistency).expect("bp check");
    assert_eq!(bp.offending_ids().collect::<Vec<_>>(), vec!["P0000001"]);
    assert!(!bp.is_pass());
    assert_eq!(report.failed_checks().count(), 1);
    assert!(!report.all_passed());
    assert!(report.check(CheckKind::Missingness).is_none());
}

#[test]
fn report_serializes_with_snake_case_names() {
    let json = serde_json::to_value(report()).expect("serialize report");
    assert_eq!(json["checks"][0]["check"], "bp_consistency");
    assert_eq!(json["checks"][0]["details"]["type"], "consistency");
    assert_eq!(json["score"]["formula"], "mean_check_pass_rate");
    assert!(json["score"].get("threshold").is_none());

    let round: QualityReport = serde_json::from_value(json).expect("deserialize report");
    assert_eq!(round, report());
}

#[test]
fn round1_keeps_one_decimal() {
    assert_eq!(round1(87.54), 87.5);
    assert_eq!(round1(87.56), 87.6);
    assert_eq!(round1(100.0), 100.0);
}

#[test]
fn featured_columns_are_stable() {
    insta::assert_snapshot!(
        FEATURED_COLUMNS.join(","),
        @"patient_id,age_days,age_years,age_band,gender,height,weight,bmi,bmi_band,ap_hi,ap_lo,pulse_pressure,bp_band,hypertension_flag,cholesterol_level,cholesterol_category,glucose_level,glucose_category,smoke,alcohol,active,measure_date,measure_month,cardiovascular_event"
    );
}

#[test]
fn config_loads_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "[ingest]\nseparator = \";\"\n\n[quality]\nscore_threshold = 90.0\n"
    )
    .unwrap();
    let config = PipelineConfig::load(file.path()).unwrap();
    assert_eq!(config.ingest.separator, Some(';'));
    assert_eq!(config.quality.score_threshold, Some(90.0));
}

#[test]
fn missing_config_file_reports_path() {
    let err = PipelineConfig::load(std::path::Path::new("/nonexistent/cardio.toml")).unwrap_err();
    assert!(matches!(err, ModelError::ConfigRead { .. }));
    assert!(err.to_string().contains("/nonexistent/cardio.toml"));
}
