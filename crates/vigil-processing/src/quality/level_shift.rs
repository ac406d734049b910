//! Rolling level-shift detection.
//!
//! A level shift shows up as a large jump between consecutive rolling means.
//! The jump is also normalized by the local rolling standard deviation to
//! separate "large relative to noise" from "large in absolute units".

use polars::prelude::*;

use crate::quality::statistics::{mean, sample_std};
use crate::types::LevelShiftStats;
use crate::utils::float_values;

/// Default rolling window, in samples.
const DEFAULT_WINDOW: usize = 7;

/// Detects abrupt level changes in a numeric column.
#[derive(Debug, Clone, Copy)]
pub struct LevelShiftDetector {
    window: usize,
}

impl Default for LevelShiftDetector {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

impl LevelShiftDetector {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Compute jump statistics for one column.
    ///
    /// Returns all-None when the column is absent or holds no numeric data.
    /// With data but no jumps (a single observation), both statistics are 0.
    /// When jumps exist but every local standard deviation is zero (perfectly
    /// flat series), `max_z` is None: no evidence of a shift is not the same
    /// as a shift of magnitude zero.
    pub fn detect(&self, df: &DataFrame, value_col: &str) -> LevelShiftStats {
        let Ok(column) = df.column(value_col) else {
            return LevelShiftStats::default();
        };
        let Ok(values) = float_values(column.as_materialized_series()) else {
            return LevelShiftStats::default();
        };
        if values.iter().all(Option::is_none) {
            return LevelShiftStats::default();
        }

        let roll = rolling_mean(&values, self.window);
        let roll_std = rolling_std(&roll, self.window);

        // Jump at i is defined when the rolling mean exists at i and i-1;
        // its z-score additionally needs a usable local deviation at i
        let mut jumps = Vec::new();
        let mut z_scores = Vec::new();
        for i in 1..roll.len() {
            let (Some(curr), Some(prev)) = (roll[i], roll[i - 1]) else {
                continue;
            };
            let jump = (curr - prev).abs();
            jumps.push(jump);
            if let Some(std) = roll_std[i] {
                z_scores.push(jump / std);
            }
        }

        let max_jump = if jumps.is_empty() {
            0.0
        } else {
            jumps.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        };
        let max_z = if jumps.is_empty() {
            Some(0.0)
        } else if z_scores.is_empty() {
            None
        } else {
            Some(z_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        };

        LevelShiftStats {
            max_jump: Some(max_jump),
            max_z,
        }
    }
}

/// Trailing-window mean with a minimum of one observation per window.
/// None only where the whole window is missing.
fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            let lo = (i + 1).saturating_sub(window);
            let defined: Vec<f64> = values[lo..=i].iter().flatten().copied().collect();
            mean(&defined)
        })
        .collect()
}

/// Trailing-window sample standard deviation. Undefined with fewer than 2
/// observations in the window, and a zero deviation is treated as undefined
/// rather than dividing by it downstream.
fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            let lo = (i + 1).saturating_sub(window);
            let defined: Vec<f64> = values[lo..=i].iter().flatten().copied().collect();
            sample_std(&defined).filter(|std| *std != 0.0)
        })
        .collect()
}
