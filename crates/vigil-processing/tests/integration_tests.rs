//! Integration tests for the data-quality triage pipeline.
//!
//! These tests drive the full pipeline over CSV fixtures and check the
//! persisted outputs end to end.

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

use vigil_processing::io::load_csv;
use vigil_processing::reporting::{
    export_cleaned_table, write_explanation_report, write_overall_summary, FindingsLog,
    SummaryStore,
};
use vigil_processing::{SentinelConfig, SentinelPipeline, TriageLabel};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(filename: &str) -> DataFrame {
    load_csv(&fixtures_path().join(filename)).expect("Failed to load fixture CSV")
}

fn default_pipeline() -> SentinelPipeline {
    SentinelPipeline::new(SentinelConfig::default()).expect("Default config should validate")
}

fn float_column(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .expect("Column should exist")
        .as_materialized_series()
        .f64()
        .expect("Column should be f64")
        .into_iter()
        .collect()
}

// ============================================================================
// Full Pipeline Tests over Fixtures
// ============================================================================

#[test]
fn test_sensor_daily_outlier_lands_amber() {
    let df = load_fixture("sensor_daily.csv");

    let report = default_pipeline().run_file(&df, "sensor_daily.csv");

    assert_eq!(report.time_column, "date");
    assert_eq!(report.findings.len(), 2);
    assert_eq!(report.worst, TriageLabel::Amber);

    let temp = report
        .findings
        .iter()
        .find(|f| f.column == "temp")
        .expect("temp finding");
    // The NaN marker was dropped at load and the gap forward-filled
    assert_eq!(temp.missingness, Some(0.0));
    assert_eq!(temp.cadence.median_s, Some(86_400.0));
    let avg = temp.avg_anomaly_score.expect("temp score");
    assert!(avg > 0.45 && avg < 0.48, "avg was {}", avg);
    assert_eq!(temp.triage, TriageLabel::Amber);

    let humidity = report
        .findings
        .iter()
        .find(|f| f.column == "humidity")
        .expect("humidity finding");
    assert_eq!(humidity.avg_anomaly_score, Some(0.0));
    assert_eq!(humidity.triage, TriageLabel::Green);
}

#[test]
fn test_weekly_gaps_fill_and_cadence() {
    let df = load_fixture("weekly_gaps.csv");

    let report = default_pipeline().run_file(&df, "weekly_gaps.csv");

    assert_eq!(report.time_column, "week");
    let sales = &report.findings[0];
    // Cadence reflects the raw series: mostly 7 days, one 14-day gap
    assert_eq!(sales.cadence.median_s, Some(604_800.0));
    assert_eq!(sales.cadence.min_s, Some(604_800.0));
    assert_eq!(sales.cadence.max_s, Some(1_209_600.0));

    // The regularized grid spans 5 weekly points; the missing week was
    // forward-filled from the previous observation
    let (_, cleaned) = &report.cleaned[0];
    assert_eq!(cleaned.height(), 5);
    assert_eq!(
        float_column(cleaned, "sales"),
        vec![
            Some(100.0),
            Some(110.0),
            Some(105.0),
            Some(105.0),
            Some(115.0)
        ]
    );

    // A short near-normal series averages just above the amber band
    let avg = sales.avg_anomaly_score.expect("sales score");
    assert!(avg > 0.50 && avg < 0.53, "avg was {}", avg);
    assert_eq!(sales.triage, TriageLabel::Red);
    assert_eq!(report.worst, TriageLabel::Red);
}

#[test]
fn test_messy_file_is_cleaned_before_scoring() {
    let df = load_fixture("messy.csv");

    let report = default_pipeline().run_file(&df, "messy.csv");

    assert_eq!(report.findings.len(), 1);
    let value = &report.findings[0];
    assert_eq!(value.column, "value");
    assert_eq!(value.missingness, Some(0.0));

    // Duplicate rows, the duplicate timestamp, and the unparseable timestamp
    // all collapse into a 4-point daily series with the null filled
    let (_, cleaned) = &report.cleaned[0];
    assert_eq!(cleaned.height(), 4);
    assert_eq!(
        float_column(cleaned, "value"),
        vec![Some(1.0), Some(2.0), Some(2.0), Some(4.0)]
    );

    let avg = value.avg_anomaly_score.expect("value score");
    assert!(avg > 0.44 && avg < 0.47, "avg was {}", avg);
    assert_eq!(value.triage, TriageLabel::Amber);
}

#[test]
fn test_explicit_time_column_is_honored() {
    let df = load_fixture("weekly_gaps.csv");
    let config = SentinelConfig::builder()
        .time_column("week")
        .build()
        .unwrap();
    let pipeline = SentinelPipeline::new(config).unwrap();

    let report = pipeline.run_file(&df, "weekly_gaps.csv");

    assert_eq!(report.time_column, "week");
    assert_eq!(report.findings.len(), 1);
}

#[test]
fn test_custom_thresholds_move_the_bands() {
    let df = load_fixture("messy.csv");
    let config = SentinelConfig::builder()
        .green(0.6)
        .amber(0.8)
        .build()
        .unwrap();
    let pipeline = SentinelPipeline::new(config).unwrap();

    let report = pipeline.run_file(&df, "messy.csv");

    // The same ~0.46 average is green under looser thresholds
    assert_eq!(report.findings[0].triage, TriageLabel::Green);
    assert_eq!(report.worst, TriageLabel::Green);
}

// ============================================================================
// Persisted Outputs
// ============================================================================

#[test]
fn test_outputs_written_end_to_end() {
    let df = load_fixture("sensor_daily.csv");
    let out = TempDir::new().unwrap();

    let report = default_pipeline().run_file(&df, "sensor_daily.csv");
    FindingsLog::new(out.path()).append(&report).unwrap();
    SummaryStore::new(out.path()).merge(&report).unwrap();
    export_cleaned_table(&report, out.path()).unwrap();
    write_overall_summary(out.path(), report.worst).unwrap();

    // Findings CSV: header plus one row per column
    let findings = std::fs::read_to_string(out.path().join("dq_findings.csv")).unwrap();
    assert_eq!(findings.lines().count(), 3);
    assert!(findings
        .lines()
        .next()
        .unwrap()
        .starts_with("file,column,missingness"));

    // Summary document keyed by file basename
    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.path().join("dq_summary.json")).unwrap())
            .unwrap();
    let entry = &summary["sensor_daily.csv"];
    assert_eq!(entry["per_column"]["temp"]["triage"], "amber");
    assert_eq!(entry["per_column"]["humidity"]["triage"], "green");
    assert_eq!(entry["policy"]["component"], "anomaly_scoring");

    // Cleaned table merges both projections back onto the time axis
    let cleaned =
        std::fs::read_to_string(out.path().join("sensor_daily_cleaned.csv")).unwrap();
    let mut lines = cleaned.lines();
    assert_eq!(lines.next().unwrap(), "date,temp,humidity");
    assert_eq!(lines.count(), 5);

    // Overall status mirrors the file verdict
    let overall: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(out.path().join("dq_overall_summary.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(overall["status"], "amber");
}

#[test]
fn test_explanation_report_covers_fixture_folder() {
    let out = TempDir::new().unwrap();

    let path = write_explanation_report(&fixtures_path(), out.path()).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("## File: `messy.csv`"));
    assert!(content.contains("## File: `sensor_daily.csv`"));
    assert!(content.contains("## File: `weekly_gaps.csv`"));
    assert!(content.contains("- Inferred time column (candidate): `date`"));
    assert!(content.contains("- Preview rows (first 5):"));
}
