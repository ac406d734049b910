//! Run summaries.
//!
//! `dq_summary.json` is a document keyed by input file basename, merged
//! across runs; `dq_overall_summary.json` holds the single worst label of the
//! latest run.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};
use tracing::info;

use crate::error::Result;
use crate::triage::PolicyCard;
use crate::types::{FileReport, TriageLabel};

/// Read-merge-rewrite store for the per-file summary document.
pub struct SummaryStore {
    path: PathBuf,
}

impl SummaryStore {
    /// File name inside the output directory.
    pub const FILE_NAME: &'static str = "dq_summary.json";

    pub fn new(out_dir: &Path) -> Self {
        Self {
            path: out_dir.join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the document so the next merge starts fresh.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Merge one file's entry into the document and rewrite it.
    ///
    /// Each entry carries the per-column scores and labels plus the static
    /// policy card describing the scorer's scope.
    pub fn merge(&self, report: &FileReport) -> Result<()> {
        let mut document = self.read_document();

        let mut per_column = Map::new();
        for finding in &report.findings {
            per_column.insert(
                finding.column.clone(),
                json!({
                    "avg_score": finding.avg_anomaly_score,
                    "triage": finding.triage.as_str(),
                }),
            );
        }

        document.insert(
            report.file.clone(),
            json!({
                "per_column": per_column,
                "policy": PolicyCard::default(),
            }),
        );

        let mut file = File::create(&self.path)?;
        file.write_all(serde_json::to_string_pretty(&document)?.as_bytes())?;

        info!("Summary saved: {}", self.path.display());
        Ok(())
    }

    /// The existing document, or a fresh one when the file is absent or
    /// does not hold a JSON object.
    fn read_document(&self) -> Map<String, Value> {
        match fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_default(),
            Err(_) => Map::new(),
        }
    }
}

/// Rewrite `dq_overall_summary.json` with the run's worst label.
pub fn write_overall_summary(out_dir: &Path, worst: TriageLabel) -> Result<()> {
    let path = out_dir.join("dq_overall_summary.json");
    let document = json!({ "status": worst.as_str() });

    let mut file = File::create(&path)?;
    file.write_all(serde_json::to_string_pretty(&document)?.as_bytes())?;

    info!("Overall status saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnFinding;
    use tempfile::TempDir;

    fn report_for(file: &str, column: &str) -> FileReport {
        let mut finding = ColumnFinding::failed(column);
        finding.avg_anomaly_score = Some(0.7);
        finding.triage = TriageLabel::Red;
        FileReport {
            file: file.to_string(),
            time_column: "date".to_string(),
            findings: vec![finding],
            worst: TriageLabel::Red,
            cleaned: Vec::new(),
            steps: Vec::new(),
        }
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_merge_writes_entry_with_policy_card() {
        let dir = TempDir::new().unwrap();
        let store = SummaryStore::new(dir.path());

        store.merge(&report_for("sensors.csv", "temp")).unwrap();

        let doc = read_json(store.path());
        let entry = &doc["sensors.csv"];
        assert_eq!(entry["per_column"]["temp"]["triage"], "red");
        assert_eq!(entry["per_column"]["temp"]["avg_score"], 0.7);
        assert_eq!(entry["policy"]["component"], "anomaly_scoring");
    }

    #[test]
    fn test_merge_accumulates_across_files() {
        let dir = TempDir::new().unwrap();
        let store = SummaryStore::new(dir.path());

        store.merge(&report_for("a.csv", "x")).unwrap();
        store.merge(&report_for("b.csv", "y")).unwrap();

        let doc = read_json(store.path());
        assert!(doc.get("a.csv").is_some());
        assert!(doc.get("b.csv").is_some());
    }

    #[test]
    fn test_corrupt_document_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let store = SummaryStore::new(dir.path());
        fs::write(store.path(), "not json {{").unwrap();

        store.merge(&report_for("a.csv", "x")).unwrap();

        let doc = read_json(store.path());
        assert_eq!(doc.as_object().unwrap().len(), 1);
        assert!(doc.get("a.csv").is_some());
    }

    #[test]
    fn test_failed_column_serializes_null_score() {
        let dir = TempDir::new().unwrap();
        let store = SummaryStore::new(dir.path());

        let report = FileReport {
            file: "broken.csv".to_string(),
            time_column: String::new(),
            findings: vec![ColumnFinding::failed("temp")],
            worst: TriageLabel::Amber,
            cleaned: Vec::new(),
            steps: Vec::new(),
        };
        store.merge(&report).unwrap();

        let doc = read_json(store.path());
        let column = &doc["broken.csv"]["per_column"]["temp"];
        assert!(column["avg_score"].is_null());
        assert_eq!(column["triage"], "amber");
    }

    #[test]
    fn test_overall_summary_holds_worst_label() {
        let dir = TempDir::new().unwrap();

        write_overall_summary(dir.path(), TriageLabel::Red).unwrap();

        let doc = read_json(&dir.path().join("dq_overall_summary.json"));
        assert_eq!(doc["status"], "red");
    }
}
