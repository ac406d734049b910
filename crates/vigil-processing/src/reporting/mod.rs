//! Report writing module.
//!
//! This module persists everything a run produces: the append-only findings
//! log, the merged per-file summary document, the overall status, the
//! cleaned-table exports, and the optional dataset-explanation markdown.
//!
//! # Example
//!
//! ```rust,ignore
//! use vigil_processing::reporting::{export_cleaned_table, FindingsLog, SummaryStore};
//!
//! let findings = FindingsLog::new(out_dir);
//! let summaries = SummaryStore::new(out_dir);
//!
//! let report = pipeline.run_file(&df, "sensors.csv");
//! findings.append(&report)?;
//! summaries.merge(&report)?;
//! export_cleaned_table(&report, out_dir)?;
//! ```

mod cleaned;
mod explain;
mod findings;
mod summary;

pub use cleaned::export_cleaned_table;
pub use explain::write_explanation_report;
pub use findings::FindingsLog;
pub use summary::{write_overall_summary, SummaryStore};
