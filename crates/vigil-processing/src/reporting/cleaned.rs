//! Cleaned-table export.
//!
//! The per-column cleaned projections carried by a [`FileReport`] are merged
//! back into one table on the original time-column name and written next to
//! the findings.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::types::FileReport;

/// Merge the cleaned projections and write `<input stem>_cleaned.csv`.
///
/// Returns the written path, or `None` when the report carries no cleaned
/// projections (every column failed, or there was nothing to analyze).
pub fn export_cleaned_table(report: &FileReport, out_dir: &Path) -> Result<Option<PathBuf>> {
    let Some((_, first)) = report.cleaned.first() else {
        return Ok(None);
    };
    let time_col = report.time_column.as_str();

    let mut merged = first.clone();
    for (_, projection) in &report.cleaned[1..] {
        merged = merged
            .lazy()
            .join(
                projection.clone().lazy(),
                [col(time_col)],
                [col(time_col)],
                JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
            )
            .collect()?;
    }
    let mut merged = merged.sort(
        [time_col],
        SortMultipleOptions::default().with_maintain_order(true),
    )?;

    let stem = Path::new(&report.file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(report.file.as_str());
    let path = out_dir.join(format!("{}_cleaned.csv", stem));
    let mut file = File::create(&path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut merged)?;

    info!("Cleaned table saved: {}", path.display());
    Ok(Some(path))
}
