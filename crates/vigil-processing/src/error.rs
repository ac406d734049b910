//! Custom error types for the data-quality pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. The only
//! domain error the core can raise is [`SentinelError::TimeColumnNotFound`];
//! everything else wraps I/O, CSV/frame, or JSON failures from the layers
//! around the core. Per-column analysis treats every error as column-scoped:
//! the runner catches it and records an amber finding instead of aborting the
//! file.

use thiserror::Error;

/// The main error type for the data-quality pipeline.
#[derive(Error, Debug)]
pub enum SentinelError {
    /// The designated time column does not exist on the input table.
    #[error("Time column '{0}' not found in table")]
    TimeColumnNotFound(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SentinelError>,
    },
}

impl SentinelError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SentinelError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this error names a missing time column.
    ///
    /// The runner uses this to distinguish "the caller pointed at a column
    /// that is not there" from frame-level failures when logging.
    pub fn is_time_column_missing(&self) -> bool {
        match self {
            Self::TimeColumnNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_time_column_missing(),
            _ => false,
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, SentinelError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SentinelError::Polars(e).with_context(context))
    }
}
