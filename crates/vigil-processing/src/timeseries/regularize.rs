//! Resampling onto a regular timestamp grid.
//!
//! The regularizer deduplicates rows, drops unparseable timestamps, sorts,
//! dedups by timestamp, then re-aligns the table onto a grid stepped by the
//! integer median delta. Degenerate inputs fall back to the deduplicated,
//! unresampled table instead of failing.

use polars::prelude::*;
use tracing::{debug, warn};

use super::cadence::CadenceAnalyzer;
use super::parse::{millis_to_datetime_series, series_to_epoch_millis};
use crate::error::{Result, SentinelError};

/// Grids larger than this are considered degenerate (bad cadence estimate)
/// and trigger the no-resample fallback.
const MAX_GRID_POINTS: i64 = 10_000_000;

/// Cleans and resamples a table along its time axis.
pub struct Regularizer;

impl Regularizer {
    /// Regularize `df` onto a median-delta grid.
    ///
    /// The time column is replaced with parsed millisecond datetimes. Columns
    /// named in `value_cols` are coerced to floats and gap-filled forward then
    /// backward; all other columns keep missing entries at unmatched grid
    /// points. Fails only when `time_col` is absent.
    pub fn regularize(
        &self,
        df: &DataFrame,
        time_col: &str,
        value_cols: &[String],
    ) -> Result<DataFrame> {
        if df.get_column_names().iter().all(|c| c.as_str() != time_col) {
            return Err(SentinelError::TimeColumnNotFound(time_col.to_string()));
        }

        // 1. Drop fully duplicate rows, keeping first occurrences
        let deduped = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        let dropped = df.height() - deduped.height();
        if dropped > 0 {
            debug!("Removed {} duplicate rows", dropped);
        }

        // 2. Parse timestamps and drop rows where parsing failed
        let raw_millis = series_to_epoch_millis(deduped.column(time_col)?.as_materialized_series());
        let parsed_series = millis_to_datetime_series(time_col, raw_millis)?;
        let mut work = deduped;
        work.with_column(parsed_series)?;

        let valid = work.column(time_col)?.as_materialized_series().is_not_null();
        let unparseable = work.height() - valid.sum().unwrap_or(0) as usize;
        if unparseable > 0 {
            debug!("Dropped {} rows with unparseable timestamps", unparseable);
        }
        let work = work.filter(&valid)?;

        // 3. Sort by timestamp, stable
        let work = work.sort(
            [time_col],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;

        // 4. Drop repeated timestamps, keeping first occurrences
        let sorted_millis: Vec<i64> =
            series_to_epoch_millis(work.column(time_col)?.as_materialized_series())
                .into_iter()
                .flatten()
                .collect();
        let mut first_seen = Vec::with_capacity(sorted_millis.len());
        let mut prev = None;
        for &ts in &sorted_millis {
            first_seen.push(prev != Some(ts));
            prev = Some(ts);
        }
        let keep = BooleanChunked::from_slice("keep".into(), &first_seen);
        let work = work.filter(&keep)?;
        let timestamps: Vec<i64> = sorted_millis
            .iter()
            .zip(&first_seen)
            .filter(|&(_, &kept)| kept)
            .map(|(&ts, _)| ts)
            .collect();

        // 5. Too short to resample
        if work.height() < 2 {
            return Ok(work);
        }

        // 6. Median delta in whole seconds; non-positive means no usable cadence
        let stats = CadenceAnalyzer::from_sorted_timestamps(&timestamps);
        let step_s = match stats.median_s {
            Some(median) => median as i64,
            None => return Ok(work),
        };
        if step_s <= 0 {
            debug!("Median cadence is sub-second or zero, skipping resample");
            return Ok(work);
        }

        // 7. Build the regular grid
        let step_ms = step_s * 1000;
        let start = timestamps[0];
        let end = timestamps[timestamps.len() - 1];
        let points = (end - start) / step_ms + 1;
        if points > MAX_GRID_POINTS {
            warn!(
                "Grid of {} points exceeds cap, keeping irregular series",
                points
            );
            return Ok(work);
        }
        let grid: Vec<Option<i64>> = (0..points).map(|i| Some(start + i * step_ms)).collect();
        let grid_series = millis_to_datetime_series(time_col, grid)?;
        let grid_df = DataFrame::new(vec![grid_series.into_column()])?;

        // 8. Re-align rows onto the grid by exact timestamp match
        let joined = grid_df
            .lazy()
            .join(
                work.lazy(),
                [col(time_col)],
                [col(time_col)],
                JoinArgs::new(JoinType::Left),
            )
            .collect()?;
        let mut joined = joined.sort(
            [time_col],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;

        // 9. Coerce and gap-fill the designated value columns
        for name in value_cols {
            if name == time_col {
                continue;
            }
            let Ok(column) = joined.column(name) else {
                continue;
            };
            let filled = Self::coerce_and_fill(column.as_materialized_series())?;
            joined.with_column(filled)?;
        }

        debug!(
            "Resampled {} rows onto a {}-point grid (step {}s)",
            timestamps.len(),
            points,
            step_s
        );
        Ok(joined)
    }

    /// Coerce a column to floats (bad values become missing, NaN included),
    /// then forward-fill and backward-fill the gaps.
    fn coerce_and_fill(series: &Series) -> Result<Series> {
        let cast = series.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = cast
            .f64()?
            .into_iter()
            .map(|opt| opt.filter(|v| !v.is_nan()))
            .collect();

        let rebuilt = Series::new(series.name().clone(), values);
        let filled = rebuilt
            .fill_null(FillNullStrategy::Forward(None))?
            .fill_null(FillNullStrategy::Backward(None))?;
        Ok(filled)
    }
}
