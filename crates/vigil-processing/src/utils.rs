//! Shared utilities for the data-quality pipeline.
//!
//! Dtype predicates and the null-marker vocabulary used by both the CSV
//! loader and the missingness analyzer.

use polars::prelude::*;

/// Strings treated as missing values, both at CSV load time and when
/// counting missingness on string columns already in memory.
pub const NULL_MARKERS: [&str; 8] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a date/datetime/time type.
#[inline]
pub fn is_temporal_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Check if a string is a recognized missing-value marker.
#[inline]
pub fn is_null_marker(s: &str) -> bool {
    let trimmed = s.trim();
    NULL_MARKERS.iter().any(|&marker| trimmed == marker)
}

/// Select the signal columns of a table: every integer or float column
/// except the time column. Booleans and strings are not signals.
pub fn numeric_value_columns(df: &DataFrame, time_col: &str) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.name().as_str() != time_col && is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

/// Extract a column as floats, normalizing NaN to missing.
pub fn float_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let cast = series.cast(&DataType::Float64)?;
    let values = cast
        .f64()?
        .into_iter()
        .map(|opt| opt.filter(|v| !v.is_nan()))
        .collect();
    Ok(values)
}

// =============================================================================
// Tests
// =============================================================================
