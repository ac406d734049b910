//! Time-axis handling.
//!
//! This module provides functionality for:
//! - Parsing timestamps out of strings, epoch numbers, and native columns
//! - Discovering which column is the time axis
//! - Summarizing sampling cadence
//! - Resampling a table onto a regular grid with gap-filling

mod cadence;
mod infer;
mod parse;
mod regularize;

pub use cadence::CadenceAnalyzer;
pub use infer::{InferenceStrategy, STRATEGY_ORDER, TimeColumnInferrer};
pub use regularize::Regularizer;
