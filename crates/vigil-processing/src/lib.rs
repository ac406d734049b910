//! Data Quality Sentinel Library
//!
//! A time-series data-quality triage library built with Rust and Polars.
//!
//! # Overview
//!
//! This library turns folders of messy CSV time-series into per-column
//! quality verdicts:
//!
//! - **Time-Column Inference**: Ordered strategies find the time axis by
//!   name hints, parseability probes, or positional fallback
//! - **Regularization**: Deduplication, timestamp normalization, and
//!   median-cadence resampling with forward/backward fill
//! - **Quality Statistics**: Missingness fractions, cadence statistics,
//!   rolling level-shift evidence
//! - **Anomaly Scoring**: Two-sided normal tail probabilities per point,
//!   averaged into a column score
//! - **Triage**: Green/amber/red verdicts per column, folded into per-file
//!   and per-run worst labels
//! - **Reporting**: Append-only findings CSV, merged JSON summaries, cleaned
//!   table exports, and an optional dataset-explanation markdown
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use vigil_processing::{SentinelConfig, SentinelPipeline};
//! use vigil_processing::reporting::{export_cleaned_table, FindingsLog, SummaryStore};
//! use std::path::Path;
//!
//! // Load data
//! let df = vigil_processing::io::load_csv(Path::new("sensors.csv"))?;
//!
//! // Configure thresholds and run the triage pipeline
//! let config = SentinelConfig::builder()
//!     .green(0.2)
//!     .amber(0.5)
//!     .build()?;
//!
//! let pipeline = SentinelPipeline::new(config)?;
//! let report = pipeline.run_file(&df, "sensors.csv");
//!
//! println!("{} -> {}", report.file, report.worst);
//! for finding in &report.findings {
//!     println!("  {}: {}", finding.column, finding.triage);
//! }
//!
//! // Persist the results
//! let out_dir = Path::new("dq_out");
//! FindingsLog::new(out_dir).append(&report)?;
//! SummaryStore::new(out_dir).merge(&report)?;
//! export_cleaned_table(&report, out_dir)?;
//! ```
//!
//! # Configuration
//!
//! Use [`SentinelConfig`] to customize triage behavior:
//!
//! ```rust,ignore
//! use vigil_processing::SentinelConfig;
//!
//! let config = SentinelConfig::builder()
//!     .time_column("recorded_at")   // Skip inference, use this column
//!     .green(0.1)                   // Scores <= 0.1 are green
//!     .amber(0.4)                   // Scores <= 0.4 are amber, above red
//!     .level_shift_window(14)       // Rolling window for shift detection
//!     .build()?;
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod quality;
pub mod reporting;
pub mod timeseries;
pub mod triage;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, SentinelConfig, SentinelConfigBuilder};
pub use error::{Result as SentinelResult, ResultExt, SentinelError};
pub use pipeline::SentinelPipeline;
pub use quality::{AnomalyScorer, LevelShiftDetector, MissingnessAnalyzer};
pub use reporting::{
    export_cleaned_table, write_explanation_report, write_overall_summary, FindingsLog,
    SummaryStore,
};
pub use timeseries::{
    CadenceAnalyzer, InferenceStrategy, Regularizer, TimeColumnInferrer, STRATEGY_ORDER,
};
pub use triage::{PolicyCard, TriageClassifier, TriageThresholds};
pub use types::{CadenceStats, ColumnFinding, FileReport, LevelShiftStats, TriageLabel};
pub use utils::{is_numeric_dtype, is_temporal_dtype, numeric_value_columns, NULL_MARKERS};
