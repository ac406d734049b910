//! CSV discovery and loading.
//!
//! Loading goes through a fallback chain of progressively more lenient parse
//! settings so one malformed file degrades gracefully instead of failing the
//! run. All strategies map the common textual null markers to real nulls at
//! parse time.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::utils::NULL_MARKERS;

/// Load a CSV file with multiple fallback strategies.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(parse_options().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading of '{}' failed: {}", path.display(), e);
        }
    }

    // Strategy 2: Without quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(parse_options().with_quote_char(None))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Loading '{}' without quotes failed: {}", path.display(), e);
        }
    }

    // Strategy 3: Lenient parse; unparseable values become nulls and ragged
    // lines are truncated to the header width
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_ignore_errors(true)
        .with_parse_options(parse_options().with_truncate_ragged_lines(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Load only the first `rows` rows of a CSV file, leniently.
///
/// Used for preview-style reports that must stay cheap on large files.
pub fn load_csv_prefix(path: &Path, rows: usize) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_n_rows(Some(rows))
        .with_ignore_errors(true)
        .with_parse_options(parse_options().with_truncate_ragged_lines(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

fn parse_options() -> CsvParseOptions {
    CsvParseOptions::default().with_null_values(Some(NullValues::AllColumns(
        NULL_MARKERS.iter().map(|m| (*m).into()).collect(),
    )))
}

/// Discover `*.csv` files under `dir` (case-insensitive extension), sorted by
/// path for a deterministic processing order. Top level only unless
/// `recursive` is set.
pub fn discover_csv_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_csv_files(dir, recursive, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_csv_files(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                collect_csv_files(&path, recursive, out)?;
            }
        } else if has_csv_extension(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}
