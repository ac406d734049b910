use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Three-tier data-quality verdict for a column or file.
///
/// Labels are totally ordered `Green < Amber < Red` so a file-level verdict
/// is simply the maximum over its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageLabel {
    /// Signal looks healthy; safe for downstream analytics.
    Green,
    /// Suspicious or unconfirmed; needs a look before trusting.
    Amber,
    /// Strong evidence of a data-quality problem.
    Red,
}

impl TriageLabel {
    /// Lowercase wire/report form of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Amber => "amber",
            Self::Red => "red",
        }
    }

    /// Icon for terminal summaries.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Green => "🟢",
            Self::Amber => "🟠",
            Self::Red => "🔴",
        }
    }

    /// Process exit code the CLI maps this label to.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Green => 0,
            Self::Amber => 1,
            Self::Red => 2,
        }
    }

    /// Fold a collection of labels into the worst one; Green when empty.
    pub fn worst_of(labels: impl IntoIterator<Item = TriageLabel>) -> TriageLabel {
        labels.into_iter().max().unwrap_or(TriageLabel::Green)
    }
}

impl std::fmt::Display for TriageLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inter-sample gap statistics, in seconds.
///
/// All fields are `None` when fewer than 2 valid timestamps exist; `std_s`
/// alone is `None` when only a single delta was observed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CadenceStats {
    pub median_s: Option<f64>,
    pub std_s: Option<f64>,
    pub min_s: Option<f64>,
    pub max_s: Option<f64>,
}

/// Rolling level-shift evidence: largest rolling-mean delta and largest
/// locally-normalized delta. Both `None` when the column held no numeric data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelShiftStats {
    pub max_jump: Option<f64>,
    pub max_z: Option<f64>,
}

/// Per-column data-quality finding, immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFinding {
    /// Column name in the source table.
    pub column: String,
    /// Fraction of missing values in the cleaned projection; `None` when the
    /// column's analysis failed outright.
    pub missingness: Option<f64>,
    pub cadence: CadenceStats,
    pub level_shift: LevelShiftStats,
    /// Mean per-point anomaly score; 0.0 for an empty series, `None` when the
    /// column's analysis failed outright.
    pub avg_anomaly_score: Option<f64>,
    pub triage: TriageLabel,
}

impl ColumnFinding {
    /// The finding recorded when a column's analysis fails: every statistic
    /// missing and the label amber, so a broken column is surfaced as
    /// suspicious rather than silently healthy.
    pub fn failed(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            missingness: None,
            cadence: CadenceStats::default(),
            level_shift: LevelShiftStats::default(),
            avg_anomaly_score: None,
            triage: TriageLabel::Amber,
        }
    }
}

/// Everything the pipeline produced for one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Label for the file (basename of the input path).
    pub file: String,
    /// Time column the findings were computed against.
    pub time_column: String,
    /// One finding per analyzed value column, in column order.
    pub findings: Vec<ColumnFinding>,
    /// Worst label across `findings`; Green when there are none.
    pub worst: TriageLabel,
    /// Cleaned `{time, value}` projections per column, for the cleaned-table
    /// export. Not serialized.
    #[serde(skip)]
    pub cleaned: Vec<(String, DataFrame)>,
    /// Human-auditable descriptions of what was done, in order.
    pub steps: Vec<String>,
}

impl FileReport {
    /// Report for a file that could not be processed at all (unreadable CSV
    /// in a directory run): no findings, amber verdict.
    pub fn unprocessed(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            time_column: String::new(),
            findings: Vec::new(),
            worst: TriageLabel::Amber,
            cleaned: Vec::new(),
            steps: vec![reason.into()],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_triage_label_ordering() {
        assert!(TriageLabel::Green < TriageLabel::Amber);
        assert!(TriageLabel::Amber < TriageLabel::Red);
    }

    #[test]
    fn test_triage_label_worst_of() {
        let labels = [TriageLabel::Green, TriageLabel::Red, TriageLabel::Amber];
        assert_eq!(TriageLabel::worst_of(labels), TriageLabel::Red);

        let labels = [TriageLabel::Green, TriageLabel::Green];
        assert_eq!(TriageLabel::worst_of(labels), TriageLabel::Green);

        // No columns at all still yields a verdict
        assert_eq!(TriageLabel::worst_of([]), TriageLabel::Green);
    }

    #[test]
    fn test_triage_label_exit_codes() {
        assert_eq!(TriageLabel::Green.exit_code(), 0);
        assert_eq!(TriageLabel::Amber.exit_code(), 1);
        assert_eq!(TriageLabel::Red.exit_code(), 2);
    }

    #[test]
    fn test_triage_label_serialization() {
        assert_eq!(serde_json::to_string(&TriageLabel::Amber).unwrap(), "\"amber\"");
        let parsed: TriageLabel = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(parsed, TriageLabel::Red);
    }

    #[test]
    fn test_failed_finding_is_amber_and_empty() {
        let finding = ColumnFinding::failed("pressure");
        assert_eq!(finding.column, "pressure");
        assert_eq!(finding.triage, TriageLabel::Amber);
        assert!(finding.missingness.is_none());
        assert!(finding.avg_anomaly_score.is_none());
        assert_eq!(finding.cadence, CadenceStats::default());
        assert_eq!(finding.level_shift, LevelShiftStats::default());
    }

    #[test]
    fn test_column_finding_serialization_keeps_nulls() {
        let finding = ColumnFinding::failed("pressure");
        let json = serde_json::to_string(&finding).unwrap();
        // Missing statistics serialize as explicit nulls, not absent keys
        assert!(json.contains("\"missingness\":null"));
        assert!(json.contains("\"triage\":\"amber\""));
    }

    #[test]
    fn test_unprocessed_report() {
        let report = FileReport::unprocessed("broken.csv", "Failed to load CSV");
        assert_eq!(report.worst, TriageLabel::Amber);
        assert!(report.findings.is_empty());
        assert_eq!(report.steps.len(), 1);
    }
}
