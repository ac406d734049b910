//! Time-column discovery.
//!
//! The fallback cascade is an explicit ordered list of strategies so that
//! selection is auditable: name hints first, then a parse probe over every
//! column, then the first column as a last resort.

use polars::prelude::*;
use tracing::debug;

use super::parse::series_to_epoch_millis;
use crate::error::{Result, SentinelError};

/// Column-name fragments (case-insensitive) that suggest a time axis.
const TIME_NAME_TOKENS: [&str; 6] = ["date", "time", "timestamp", "ts", "day", "week"];

/// A single step of the inference cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceStrategy {
    /// Columns whose name contains a time-like token, in table order.
    NameHint,
    /// Any column with at least one parseable timestamp, in table order.
    AnyParseable,
    /// The table's first column, regardless of content.
    FirstColumn,
}

/// Strategies in the order they are tried.
pub const STRATEGY_ORDER: [InferenceStrategy; 3] = [
    InferenceStrategy::NameHint,
    InferenceStrategy::AnyParseable,
    InferenceStrategy::FirstColumn,
];

/// Picks the time axis of a table.
pub struct TimeColumnInferrer;

impl TimeColumnInferrer {
    /// Determine the time column, honoring an explicit name when given.
    ///
    /// An explicit name is used verbatim and only checked for existence. The
    /// automatic cascade only fails on a table with no columns at all.
    pub fn infer(&self, df: &DataFrame, explicit: Option<&str>) -> Result<String> {
        if let Some(name) = explicit {
            return if df.get_column_names().iter().any(|c| c.as_str() == name) {
                Ok(name.to_string())
            } else {
                Err(SentinelError::TimeColumnNotFound(name.to_string()))
            };
        }

        for strategy in STRATEGY_ORDER {
            if let Some(column) = Self::apply_strategy(strategy, df) {
                debug!("Time column '{}' selected by {:?} strategy", column, strategy);
                return Ok(column);
            }
        }

        // Only reachable for a table with no columns at all
        Err(SentinelError::TimeColumnNotFound(String::from("<none>")))
    }

    /// Run one strategy against the table, returning its pick if any.
    pub fn apply_strategy(strategy: InferenceStrategy, df: &DataFrame) -> Option<String> {
        match strategy {
            InferenceStrategy::NameHint => df
                .get_columns()
                .iter()
                .filter(|col| {
                    let lower = col.name().to_lowercase();
                    TIME_NAME_TOKENS.iter().any(|token| lower.contains(token))
                })
                .find(|col| Self::has_parseable_sample(col.as_materialized_series()))
                .map(|col| col.name().to_string()),
            InferenceStrategy::AnyParseable => df
                .get_columns()
                .iter()
                .find(|col| Self::has_parseable_sample(col.as_materialized_series()))
                .map(|col| col.name().to_string()),
            InferenceStrategy::FirstColumn => {
                df.get_columns().first().map(|col| col.name().to_string())
            }
        }
    }

    /// Check whether any value in the column parses as a timestamp. The
    /// whole column is probed: a single valid value qualifies, no matter
    /// how late in the series it appears.
    fn has_parseable_sample(series: &Series) -> bool {
        series_to_epoch_millis(series)
            .iter()
            .any(|parsed| parsed.is_some())
    }
}
