//! Integration tests for the pipeline module.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use cardio_cli::pipeline::{QUALITY_DIR, RunOptions, WAREHOUSE_DIR, run_pipeline};
use cardio_ingest::IngestError;
use cardio_model::{CheckKind, IdStrategy, PipelineConfig};

const HEADER: &str = "id;age;gender;height;weight;ap_hi;ap_lo;cholesterol;gluc;smoke;alco;active;cardio";

const CLEAN_ROWS: [&str; 5] = [
    "0;18393;2;168;62.0;110;80;1;1;0;0;1;0",
    "1;20228;1;156;85.0;140;90;3;1;0;0;1;1",
    "2;18857;1;165;64.0;130;70;3;1;0;0;0;1",
    "3;17623;2;169;82.0;150;100;1;1;0;0;1;1",
    "4;17474;1;156;56.0;100;60;1;1;0;0;0;0",
];

/// Diastolic reading far above systolic.
const INVERTED_ROW: &str = "5;21914;1;151;67.0;120;800;2;2;0;0;0;0";

fn write_input(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("cardio_train.csv");
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    fs::write(&path, text).unwrap();
    path
}

fn options(output_dir: &Path) -> RunOptions {
    RunOptions {
        output_dir: Some(output_dir.to_path_buf()),
        write_warehouse: true,
        dry_run: false,
        min_score: None,
    }
}

#[test]
fn run_writes_every_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &CLEAN_ROWS);
    let out = dir.path().join("out");

    let result = run_pipeline(&input, &PipelineConfig::default(), &options(&out)).unwrap();

    assert_eq!(result.rows, CLEAN_ROWS.len());
    assert_eq!(result.report.checks.len(), CheckKind::ALL.len());
    assert!(result.report.all_passed());
    assert_eq!(result.report.score.overall, 100.0);
    assert!(!result.below_min_score());

    let outputs = result.outputs.expect("outputs written");
    assert_eq!(outputs.featured, out.join("featured.csv"));
    assert!(out.join(QUALITY_DIR).join("dq_report.json").is_file());
    assert!(out.join(QUALITY_DIR).join("dq_report.html").is_file());
    assert_eq!(outputs.warehouse.len(), 4);
    for table in [
        "dim_patient.csv",
        "dim_time.csv",
        "dim_lab.csv",
        "fact_clinical_metrics.csv",
    ] {
        assert!(out.join(WAREHOUSE_DIR).join(table).is_file(), "{table}");
    }

    let featured = fs::read_to_string(&outputs.featured).unwrap();
    let mut lines = featured.lines();
    assert!(lines.next().unwrap().starts_with("patient_id,age_days,age_years"));
    assert_eq!(lines.count(), CLEAN_ROWS.len());
}

#[test]
fn report_json_matches_returned_report() {
    let dir = TempDir::new().unwrap();
    let mut rows = CLEAN_ROWS.to_vec();
    rows.push(INVERTED_ROW);
    let input = write_input(dir.path(), &rows);
    let out = dir.path().join("out");

    let result = run_pipeline(&input, &PipelineConfig::default(), &options(&out)).unwrap();

    let text = fs::read_to_string(out.join(QUALITY_DIR).join("dq_report.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["dataset"]["rows"], 6);
    assert_eq!(json["dataset"]["source"], "cardio_train.csv");
    assert_eq!(json["score"]["overall"], result.report.score.overall);

    let consistency = result.report.check(CheckKind::BpConsistency).unwrap();
    assert_eq!(consistency.failed, 1);
    assert_eq!(consistency.offending[0].row, 5);
    assert_eq!(consistency.offending[0].patient_id, "P0000006");
    assert!(result.report.score.overall < 100.0);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &CLEAN_ROWS);
    let options = RunOptions {
        dry_run: true,
        ..options(&dir.path().join("out"))
    };

    let result = run_pipeline(&input, &PipelineConfig::default(), &options).unwrap();

    assert!(result.outputs.is_none());
    assert_eq!(result.rows, CLEAN_ROWS.len());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn warehouse_can_be_skipped() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &CLEAN_ROWS);
    let out = dir.path().join("out");
    let options = RunOptions {
        write_warehouse: false,
        ..options(&out)
    };

    let result = run_pipeline(&input, &PipelineConfig::default(), &options).unwrap();

    assert!(result.outputs.unwrap().warehouse.is_empty());
    assert!(out.join("featured.csv").is_file());
    assert!(!out.join(WAREHOUSE_DIR).exists());
}

#[test]
fn default_output_dir_is_beside_input() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &CLEAN_ROWS);
    let options = RunOptions {
        output_dir: None,
        ..options(dir.path())
    };

    let result = run_pipeline(&input, &PipelineConfig::default(), &options).unwrap();

    assert_eq!(result.output_dir, dir.path().join("output"));
    assert!(dir.path().join("output").join("featured.csv").is_file());
}

#[test]
fn missing_required_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.csv");
    fs::write(
        &input,
        "id;age;gender;height;weight;ap_lo;cholesterol;gluc;smoke;alco;active;cardio\n\
         0;18393;2;168;62.0;80;1;1;0;0;1;0\n",
    )
    .unwrap();
    let out = dir.path().join("out");

    let error = run_pipeline(&input, &PipelineConfig::default(), &options(&out)).unwrap_err();

    match error.downcast_ref::<IngestError>() {
        Some(IngestError::MissingColumns { columns, .. }) => {
            assert_eq!(columns, &vec!["ap_hi".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!out.exists());
}

#[test]
fn min_score_flags_low_quality_runs() {
    let dir = TempDir::new().unwrap();
    let mut rows = CLEAN_ROWS.to_vec();
    rows.push(INVERTED_ROW);
    let input = write_input(dir.path(), &rows);
    let mut config = PipelineConfig::default();
    config.quality.score_threshold = Some(99.9);
    let options = RunOptions {
        dry_run: true,
        min_score: Some(99.9),
        ..options(&dir.path().join("out"))
    };

    let result = run_pipeline(&input, &config, &options).unwrap();

    assert!(result.below_min_score());
    assert_eq!(result.report.score.meets_threshold, Some(false));
}

#[test]
fn content_hash_ids_are_stable_across_runs() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &CLEAN_ROWS);
    let mut config = PipelineConfig::default();
    config.derive.id_strategy = IdStrategy::ContentHash {
        salt: "pepper".to_string(),
    };

    let first = run_pipeline(&input, &config, &options(&dir.path().join("a"))).unwrap();
    let second = run_pipeline(&input, &config, &options(&dir.path().join("b"))).unwrap();

    let a = fs::read_to_string(dir.path().join("a").join("featured.csv")).unwrap();
    let b = fs::read_to_string(dir.path().join("b").join("featured.csv")).unwrap();
    assert_eq!(a, b);
    assert_eq!(first.report.checks, second.report.checks);

    let first_id = a.lines().nth(1).unwrap().split(',').next().unwrap();
    assert_eq!(first_id.len(), 16);
    assert!(first_id.chars().all(|c| c.is_ascii_hexdigit()));
}
