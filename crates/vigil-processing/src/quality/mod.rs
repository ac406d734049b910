//! Data-quality analyzers.
//!
//! This module provides functionality for:
//! - Missing-value fractions per column
//! - Rolling level-shift detection
//! - Probabilistic per-point anomaly scoring

mod anomaly;
mod level_shift;
mod missingness;
pub(crate) mod statistics;

pub use anomaly::AnomalyScorer;
pub use level_shift::LevelShiftDetector;
pub use missingness::MissingnessAnalyzer;
