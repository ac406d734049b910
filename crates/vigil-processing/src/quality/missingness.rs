//! Missing-value fractions.

use polars::prelude::*;

use crate::utils::is_null_marker;

/// Computes the fraction of missing values per column.
///
/// Missing means: null, NaN in float columns, or a recognized null-marker
/// string in string columns. An empty table reports 1.0 for every column by
/// convention.
pub struct MissingnessAnalyzer;

impl MissingnessAnalyzer {
    /// Per-column missing fractions, in table column order.
    pub fn analyze(&self, df: &DataFrame) -> Vec<(String, f64)> {
        df.get_columns()
            .iter()
            .map(|col| {
                (
                    col.name().to_string(),
                    Self::column_fraction(col.as_materialized_series()),
                )
            })
            .collect()
    }

    /// Missing fraction of a single column.
    pub fn column_fraction(series: &Series) -> f64 {
        let total = series.len();
        if total == 0 {
            return 1.0;
        }

        let missing = match series.dtype() {
            DataType::Float32 | DataType::Float64 => {
                match series.cast(&DataType::Float64).and_then(|s| s.f64().cloned()) {
                    Ok(values) => values
                        .into_iter()
                        .filter(|opt| opt.is_none_or(f64::is_nan))
                        .count(),
                    Err(_) => series.null_count(),
                }
            }
            DataType::String => match series.str() {
                Ok(values) => values
                    .into_iter()
                    .filter(|opt| opt.is_none_or(is_null_marker))
                    .count(),
                Err(_) => series.null_count(),
            },
            _ => series.null_count(),
        };

        missing as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_is_fully_missing() {
        let df = df! {
            "a" => Vec::<f64>::new(),
            "b" => Vec::<String>::new(),
        }
        .unwrap();

        let fractions = MissingnessAnalyzer.analyze(&df);
        assert_eq!(
            fractions,
            vec![(String::from("a"), 1.0), (String::from("b"), 1.0)]
        );
    }

    #[test]
    fn test_nan_counts_as_missing_in_floats() {
        let series = Series::new("v".into(), &[Some(1.0), None, Some(f64::NAN), Some(4.0)]);
        assert_eq!(MissingnessAnalyzer::column_fraction(&series), 0.5);
    }

    #[test]
    fn test_null_markers_count_as_missing_in_strings() {
        let series = Series::new("s".into(), &[Some("ok"), Some("N/A"), Some("null"), None]);
        assert_eq!(MissingnessAnalyzer::column_fraction(&series), 0.75);
    }

    #[test]
    fn test_integer_column_counts_nulls_only() {
        let series = Series::new("n".into(), &[Some(1i64), None, Some(3), Some(4)]);
        assert_eq!(MissingnessAnalyzer::column_fraction(&series), 0.25);
    }

    #[test]
    fn test_complete_column_is_zero() {
        let series = Series::new("v".into(), &[1.0, 2.0, 3.0]);
        assert_eq!(MissingnessAnalyzer::column_fraction(&series), 0.0);
    }
}
