//! Configuration types for the data-quality pipeline.
//!
//! This module provides configuration options using the builder pattern,
//! validated once at the boundary so the analysis code can trust the values.

use serde::{Deserialize, Serialize};

use crate::triage::TriageThresholds;

/// Configuration for the data-quality pipeline.
///
/// Use [`SentinelConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use vigil_processing::SentinelConfig;
///
/// let config = SentinelConfig::builder()
///     .time_column("timestamp")
///     .green(0.1)
///     .amber(0.4)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentinelConfig {
    /// Explicitly specified time column, used verbatim when set.
    /// If None, the time column is inferred per table.
    /// Default: None
    pub time_column: Option<String>,

    /// Triage score thresholds (green, amber), both in [0,1], green < amber.
    /// Default: (0.2, 0.5)
    pub thresholds: TriageThresholds,

    /// Rolling window (in samples) for level-shift detection.
    /// Default: 7
    pub level_shift_window: usize,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            time_column: None,
            thresholds: TriageThresholds::default(),
            level_shift_window: 7,
        }
    }
}

impl SentinelConfig {
    /// Create a new configuration builder.
    pub fn builder() -> SentinelConfigBuilder {
        SentinelConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.thresholds.green) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "green".to_string(),
                value: self.thresholds.green,
            });
        }

        if !(0.0..=1.0).contains(&self.thresholds.amber) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "amber".to_string(),
                value: self.thresholds.amber,
            });
        }

        if self.thresholds.green >= self.thresholds.amber {
            return Err(ConfigValidationError::ThresholdOrder {
                green: self.thresholds.green,
                amber: self.thresholds.amber,
            });
        }

        if self.level_shift_window == 0 {
            return Err(ConfigValidationError::InvalidWindow(self.level_shift_window));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Thresholds out of order: green {green} must be strictly below amber {amber}")]
    ThresholdOrder { green: f64, amber: f64 },

    #[error("Invalid level-shift window: {0} (must be at least 1)")]
    InvalidWindow(usize),
}

/// Builder for [`SentinelConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct SentinelConfigBuilder {
    time_column: Option<String>,
    green: Option<f64>,
    amber: Option<f64>,
    level_shift_window: Option<usize>,
}

impl SentinelConfigBuilder {
    /// Set an explicit time column, bypassing inference.
    pub fn time_column(mut self, column: impl Into<String>) -> Self {
        self.time_column = Some(column.into());
        self
    }

    /// Set the green threshold: scores at or below it are classified green.
    pub fn green(mut self, threshold: f64) -> Self {
        self.green = Some(threshold);
        self
    }

    /// Set the amber threshold: scores above it are classified red.
    pub fn amber(mut self, threshold: f64) -> Self {
        self.amber = Some(threshold);
        self
    }

    /// Set both triage thresholds at once.
    pub fn thresholds(mut self, thresholds: TriageThresholds) -> Self {
        self.green = Some(thresholds.green);
        self.amber = Some(thresholds.amber);
        self
    }

    /// Set the rolling window for level-shift detection.
    pub fn level_shift_window(mut self, window: usize) -> Self {
        self.level_shift_window = Some(window);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `SentinelConfig` or an error if validation fails.
    pub fn build(self) -> Result<SentinelConfig, ConfigValidationError> {
        let defaults = TriageThresholds::default();
        let config = SentinelConfig {
            time_column: self.time_column,
            thresholds: TriageThresholds {
                green: self.green.unwrap_or(defaults.green),
                amber: self.amber.unwrap_or(defaults.amber),
            },
            level_shift_window: self.level_shift_window.unwrap_or(7),
        };

        config.validate()?;
        Ok(config)
    }
}
