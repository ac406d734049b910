//! Pipeline module.
//!
//! This module provides the per-file triage pipeline that wires the
//! time-series and quality components together.

mod runner;

pub use runner::SentinelPipeline;
