//! Threshold-based triage classification and the scoring policy card.

use serde::{Deserialize, Serialize};

use crate::types::TriageLabel;

/// Ordered score thresholds for the triage bands.
///
/// Both values live in [0,1] with `green < amber`; the configuration layer
/// validates the pair once at construction, the classifier trusts it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriageThresholds {
    /// Scores at or below this are green.
    pub green: f64,
    /// Scores above `green` and at or below this are amber; above it, red.
    pub amber: f64,
}

impl Default for TriageThresholds {
    fn default() -> Self {
        Self {
            green: 0.2,
            amber: 0.5,
        }
    }
}

/// Maps a scalar aggregate anomaly score to a [`TriageLabel`].
pub struct TriageClassifier;

impl TriageClassifier {
    /// Classify a score against the thresholds.
    ///
    /// A missing or NaN score is amber: absent evidence is suspicious, not
    /// healthy. Band edges are inclusive on the lower side, so a score equal
    /// to `green` is green and a score equal to `amber` is amber.
    pub fn classify(score: Option<f64>, thresholds: &TriageThresholds) -> TriageLabel {
        let score = match score {
            Some(s) if !s.is_nan() => s,
            _ => return TriageLabel::Amber,
        };

        if score <= thresholds.green {
            TriageLabel::Green
        } else if score <= thresholds.amber {
            TriageLabel::Amber
        } else {
            TriageLabel::Red
        }
    }
}

/// Static description of the anomaly-scoring component: what it covers, what
/// it assumes, and where it is known to mislead. Embedded verbatim in every
/// summary entry so downstream consumers see the caveats next to the scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyCard {
    pub component: String,
    pub scope: String,
    pub assumptions: Vec<String>,
    pub risks: Vec<String>,
}

impl Default for PolicyCard {
    fn default() -> Self {
        Self {
            component: "anomaly_scoring".to_string(),
            scope: "Univariate numeric time-series per file/column".to_string(),
            assumptions: vec![
                "Time column can be inferred or provided to CLI".to_string(),
                "Series are univariate numeric signals measured at regular cadence or near-regular cadence".to_string(),
                "Simple imputation (ffill/bfill) is acceptable for scoring".to_string(),
            ],
            risks: vec![
                "Seasonal/periodic patterns may be flagged as anomalies by simple z-based detectors".to_string(),
                "Multivariate anomalies (cross-signals) are not detected".to_string(),
                "Thresholds need dataset-specific calibration".to_string(),
                "Timestamp parsing errors will cause incorrect cadence detection".to_string(),
            ],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
