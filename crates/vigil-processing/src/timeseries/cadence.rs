//! Sampling-cadence statistics.

use polars::prelude::*;

use super::parse::series_to_epoch_millis;
use crate::quality::statistics::{interpolated_median, sample_std};
use crate::types::CadenceStats;

/// Summarizes the gaps between consecutive samples.
pub struct CadenceAnalyzer;

impl CadenceAnalyzer {
    /// Compute inter-sample delta statistics, in seconds.
    ///
    /// Timestamps are parsed, sorted, and deduplicated internally so the
    /// result describes the observed sampling pattern rather than row order.
    /// All fields are None with fewer than 2 valid timestamps; `std_s` also
    /// needs at least 2 deltas.
    pub fn analyze(&self, df: &DataFrame, time_col: &str) -> CadenceStats {
        let Ok(column) = df.column(time_col) else {
            return CadenceStats::default();
        };

        let mut millis: Vec<i64> = series_to_epoch_millis(column.as_materialized_series())
            .into_iter()
            .flatten()
            .collect();
        millis.sort_unstable();
        millis.dedup();

        Self::from_sorted_timestamps(&millis)
    }

    /// Delta statistics over already-sorted, deduplicated epoch millis.
    pub(crate) fn from_sorted_timestamps(millis: &[i64]) -> CadenceStats {
        if millis.len() < 2 {
            return CadenceStats::default();
        }

        let deltas: Vec<f64> = millis
            .windows(2)
            .map(|pair| (pair[1] - pair[0]) as f64 / 1000.0)
            .collect();

        let min_s = deltas.iter().copied().fold(f64::INFINITY, f64::min);
        let max_s = deltas.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        CadenceStats {
            median_s: interpolated_median(&deltas),
            std_s: sample_std(&deltas),
            min_s: Some(min_s),
            max_s: Some(max_s),
        }
    }
}
