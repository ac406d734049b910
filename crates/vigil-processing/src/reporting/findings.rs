//! Append-only findings log.
//!
//! One `dq_findings.csv` row per (file, column) finding. The log accumulates
//! across files and across runs; callers that want a fresh document call
//! [`FindingsLog::clear`] first.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::types::FileReport;

/// Writer for the per-column findings CSV.
pub struct FindingsLog {
    path: PathBuf,
}

impl FindingsLog {
    /// File name inside the output directory.
    pub const FILE_NAME: &'static str = "dq_findings.csv";

    pub fn new(out_dir: &Path) -> Self {
        Self {
            path: out_dir.join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the log so the next append starts a fresh document.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Append one row per finding. The header is written only when the file
    /// does not exist yet; missing statistics serialize as empty cells.
    pub fn append(&self, report: &FileReport) -> Result<()> {
        let n = report.findings.len();
        let mut files = Vec::with_capacity(n);
        let mut columns = Vec::with_capacity(n);
        let mut missingness = Vec::with_capacity(n);
        let mut medians = Vec::with_capacity(n);
        let mut jumps = Vec::with_capacity(n);
        let mut z_scores = Vec::with_capacity(n);
        let mut scores = Vec::with_capacity(n);
        let mut labels = Vec::with_capacity(n);
        for finding in &report.findings {
            files.push(report.file.as_str());
            columns.push(finding.column.as_str());
            missingness.push(finding.missingness);
            medians.push(finding.cadence.median_s);
            jumps.push(finding.level_shift.max_jump);
            z_scores.push(finding.level_shift.max_z);
            scores.push(finding.avg_anomaly_score);
            labels.push(finding.triage.as_str());
        }

        let mut frame = df! {
            "file" => files,
            "column" => columns,
            "missingness" => missingness,
            "cadence_median_s" => medians,
            "max_jump" => jumps,
            "max_z" => z_scores,
            "avg_anomaly_score" => scores,
            "triage" => labels,
        }?;

        let write_header = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        CsvWriter::new(&mut file)
            .include_header(write_header)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut frame)?;

        info!("Findings appended: {}", self.path.display());
        Ok(())
    }
}
