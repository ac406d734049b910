//! Per-file triage orchestration.
//!
//! `SentinelPipeline` wires the components together: it finds the time axis,
//! builds a {time, value} projection per numeric column, regularizes it, runs
//! the analyzers, and folds the per-column labels into a file verdict. A
//! failure in one column never aborts the file; the column is recorded as
//! amber with missing statistics instead.

use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{ConfigValidationError, SentinelConfig};
use crate::error::Result;
use crate::quality::{AnomalyScorer, LevelShiftDetector, MissingnessAnalyzer};
use crate::timeseries::{CadenceAnalyzer, Regularizer, TimeColumnInferrer};
use crate::triage::TriageClassifier;
use crate::types::{ColumnFinding, FileReport, TriageLabel};
use crate::utils::{float_values, numeric_value_columns};

/// Canonical name of the time axis inside per-column projections.
const TIME_AXIS: &str = "time";

/// The per-file triage pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use vigil_processing::{SentinelConfig, SentinelPipeline};
///
/// let pipeline = SentinelPipeline::new(SentinelConfig::default())?;
/// let report = pipeline.run_file(&df, "sensors.csv");
/// println!("{}: {}", report.file, report.worst);
/// ```
pub struct SentinelPipeline {
    config: SentinelConfig,
    inferrer: TimeColumnInferrer,
    regularizer: Regularizer,
    cadence: CadenceAnalyzer,
    missingness: MissingnessAnalyzer,
    level_shift: LevelShiftDetector,
    scorer: AnomalyScorer,
}

// Ensure SentinelPipeline is Send (can be moved to another thread)
// so batch runners can process files from worker threads
static_assertions::assert_impl_all!(SentinelPipeline: Send);

impl SentinelPipeline {
    /// Create a pipeline, validating the configuration first.
    pub fn new(config: SentinelConfig) -> std::result::Result<Self, ConfigValidationError> {
        config.validate()?;
        let level_shift = LevelShiftDetector::new(config.level_shift_window);

        Ok(Self {
            config,
            inferrer: TimeColumnInferrer,
            regularizer: Regularizer,
            cadence: CadenceAnalyzer,
            missingness: MissingnessAnalyzer,
            level_shift,
            scorer: AnomalyScorer,
        })
    }

    /// Triage every numeric column of one table. Never fails; problems are
    /// absorbed into the triage vocabulary (worst case: amber findings).
    pub fn run_file(&self, df: &DataFrame, file_label: &str) -> FileReport {
        info!(
            "Processing '{}' ({} rows, {} columns)",
            file_label,
            df.height(),
            df.width()
        );
        if df.get_columns().is_empty() {
            warn!("'{}' has no columns", file_label);
            return FileReport::unprocessed(file_label, "table has no columns");
        }

        // Step 1: Find the time axis
        info!("Step 1: Inferring time column...");
        let time_col = match self
            .inferrer
            .infer(df, self.config.time_column.as_deref())
        {
            Ok(name) => name,
            Err(err) => {
                // The configured column is missing, so every value column's
                // regularization would fail the same way. Record them all as
                // amber instead of aborting the file.
                warn!("'{}': {}", file_label, err);
                let attempted = self.config.time_column.clone().unwrap_or_default();
                let findings: Vec<ColumnFinding> = numeric_value_columns(df, &attempted)
                    .into_iter()
                    .map(ColumnFinding::failed)
                    .collect();
                let worst = TriageLabel::worst_of(findings.iter().map(|f| f.triage));
                return FileReport {
                    file: file_label.to_string(),
                    time_column: attempted,
                    findings,
                    worst,
                    cleaned: Vec::new(),
                    steps: vec![format!("time column lookup failed: {}", err)],
                };
            }
        };
        debug!("Using time column '{}'", time_col);

        // Step 2: Select signal columns
        info!("Step 2: Selecting value columns...");
        let value_cols = numeric_value_columns(df, &time_col);
        if value_cols.is_empty() {
            info!("'{}' has no numeric value columns", file_label);
            return FileReport {
                file: file_label.to_string(),
                time_column: time_col,
                findings: Vec::new(),
                worst: TriageLabel::Green,
                cleaned: Vec::new(),
                steps: vec![String::from("no numeric value columns")],
            };
        }

        // Step 3: Analyze each column in isolation
        info!("Step 3: Analyzing {} value columns...", value_cols.len());
        let mut findings = Vec::with_capacity(value_cols.len());
        let mut cleaned = Vec::new();
        let mut steps = Vec::new();
        for column in &value_cols {
            match self.analyze_column(df, &time_col, column) {
                Ok((finding, projection)) => {
                    steps.push(format!(
                        "{}: {} rows after regularization, avg anomaly score {:.3}, triage {}",
                        column,
                        projection.height(),
                        finding.avg_anomaly_score.unwrap_or(0.0),
                        finding.triage
                    ));
                    findings.push(finding);
                    cleaned.push((column.clone(), projection));
                }
                Err(err) => {
                    warn!("Column '{}' in '{}' failed: {}", column, file_label, err);
                    steps.push(format!("{}: analysis failed ({})", column, err));
                    findings.push(ColumnFinding::failed(column.clone()));
                }
            }
        }

        // Step 4: Fold per-column labels into the file verdict
        let worst = TriageLabel::worst_of(findings.iter().map(|f| f.triage));
        info!("File '{}' triage: {}", file_label, worst);

        FileReport {
            file: file_label.to_string(),
            time_column: time_col,
            findings,
            worst,
            cleaned,
            steps,
        }
    }

    /// Run the full analysis for one value column. Returns the finding and
    /// the cleaned {time, value} projection with the original time name.
    fn analyze_column(
        &self,
        df: &DataFrame,
        time_col: &str,
        column: &str,
    ) -> Result<(ColumnFinding, DataFrame)> {
        let mut projection = df.select([time_col, column])?;
        projection.rename(time_col, TIME_AXIS.into())?;

        let value_cols = [column.to_string()];
        let mut regular = self.regularizer.regularize(&projection, TIME_AXIS, &value_cols)?;

        // Cadence comes from the pre-regularization projection, otherwise the
        // grid would hide exactly the irregularity it is meant to report
        let cadence = self.cadence.analyze(&projection, TIME_AXIS);

        let missingness = self
            .missingness
            .analyze(&regular)
            .into_iter()
            .find(|(name, _)| name == column)
            .map(|(_, fraction)| fraction);

        let level_shift = self.level_shift.detect(&regular, column);

        let values = float_values(regular.column(column)?.as_materialized_series())?;
        let scores = self.scorer.score(&values);
        let avg_score = AnomalyScorer::average(&scores);
        let triage = TriageClassifier::classify(Some(avg_score), &self.config.thresholds);

        regular.rename(TIME_AXIS, time_col.into())?;

        Ok((
            ColumnFinding {
                column: column.to_string(),
                missingness,
                cadence,
                level_shift,
                avg_anomaly_score: Some(avg_score),
                triage,
            },
            regular,
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
