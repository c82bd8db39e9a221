//! Tests for report rendering.

use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use cardio_model::{
    CheckDetails, CheckKind, CheckResult, DatasetSummary, OffendingRow, QualityReport,
    QualityScore, SCORE_FORMULA,
};
use cardio_report::{
    HTML_REPORT_FILE, JSON_REPORT_FILE, render_html, render_json, write_reports,
};

fn report() -> QualityReport {
    QualityReport {
        generated_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        dataset: DatasetSummary {
            source: Some("cardio.csv".to_string()),
            rows: 2,
            columns: 24,
        },
        checks: vec![CheckResult {
            check: CheckKind::BpConsistency,
            description: CheckKind::BpConsistency.description().to_string(),
            evaluated: 2,
            passed: 1,
            failed: 1,
            pass_rate: 0.5,
            offending: vec![OffendingRow {
                row: 1,
                patient_id: "P0000002".to_string(),
            }],
            details: CheckDetails::Consistency {
                skipped: 0,
                min_pulse_pressure: Some(-40),
            },
        }],
        score: QualityScore {
            overall: 50.0,
            formula: SCORE_FORMULA.to_string(),
            checks_passed: 0,
            checks_total: 1,
            clean_rows: 1,
            clean_row_rate: 0.5,
            threshold: None,
            meets_threshold: None,
        },
    }
}

#[test]
fn json_document_layout() {
    let json = render_json(&report()).unwrap();
    insta::assert_snapshot!(json.trim_end(), @r#"
    {
      "generated_at": "2024-05-01T12:00:00Z",
      "dataset": {
        "source": "cardio.csv",
        "rows": 2,
        "columns": 24
      },
      "checks": [
        {
          "check": "bp_consistency",
          "description": "Systolic reading is not below diastolic (ap_hi >= ap_lo)",
          "evaluated": 2,
          "passed": 1,
          "failed": 1,
          "pass_rate": 0.5,
          "offending": [
            {
              "row": 1,
              "patient_id": "P0000002"
            }
          ],
          "details": {
            "type": "consistency",
            "skipped": 0,
            "min_pulse_pressure": -40
          }
        }
      ],
      "score": {
        "overall": 50.0,
        "formula": "mean_check_pass_rate",
        "checks_passed": 0,
        "checks_total": 1,
        "clean_rows": 1,
        "clean_row_rate": 0.5
      }
    }
    "#);
}

#[test]
fn json_parses_back_to_the_same_report() {
    let json = render_json(&report()).unwrap();
    let parsed: QualityReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report());
}

#[test]
fn html_carries_the_same_figures() {
    let html = render_html(&report()).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Overall data quality score: 50.0%"));
    assert!(html.contains("BP consistency"));
    assert!(html.contains("row 1: P0000002"));
    assert!(html.contains("Generated: 2024-05-01T12:00:00Z"));
    assert!(html.contains("<td>-40</td>"));
    assert!(html.contains("class=\"fail\""));
}

#[test]
fn html_escapes_text() {
    let mut report = report();
    report.dataset.source = Some("<script>x</script>.csv".to_string());
    let html = render_html(&report).unwrap();

    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[test]
fn long_offending_lists_are_truncated() {
    let mut report = report();
    report.checks[0].offending = (0..30)
        .map(|row| OffendingRow {
            row,
            patient_id: format!("P{:07}", row + 1),
        })
        .collect();
    let html = render_html(&report).unwrap();

    assert!(html.contains("Offending rows (30)"));
    assert!(html.contains("row 24: P0000025"));
    assert!(!html.contains("row 25: P0000026"));
    assert!(html.contains("and 5 more"));
}

#[test]
fn rendering_is_deterministic() {
    assert_eq!(render_html(&report()).unwrap(), render_html(&report()).unwrap());
    assert_eq!(render_json(&report()).unwrap(), render_json(&report()).unwrap());
}

#[test]
fn reports_are_written_side_by_side() {
    let dir = tempdir().unwrap();
    let quality = dir.path().join("quality");
    let paths = write_reports(&report(), &quality).unwrap();

    assert_eq!(paths.json, quality.join(JSON_REPORT_FILE));
    assert_eq!(paths.html, quality.join(HTML_REPORT_FILE));
    let json = std::fs::read_to_string(&paths.json).unwrap();
    assert_eq!(json, render_json(&report()).unwrap());
    assert!(paths.html.exists());
}
