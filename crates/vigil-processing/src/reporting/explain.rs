//! Dataset explanation report.
//!
//! Writes a markdown document describing every CSV under a folder: columns,
//! the name-based time-column candidate, the numeric columns, and a short
//! preview. Reads only a bounded prefix of each file so the report stays
//! cheap on large datasets.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use serde_json::{Map, Value};
use tracing::info;

use crate::error::Result;
use crate::io::{discover_csv_files, load_csv_prefix};
use crate::timeseries::{InferenceStrategy, TimeColumnInferrer};
use crate::utils::numeric_value_columns;

/// Rows read per file when building the report.
const PREFIX_ROWS: usize = 200;
/// Rows rendered in each preview block.
const PREVIEW_ROWS: usize = 5;

/// Describe every CSV under `root` (recursively) into
/// `<out_dir>/dataset_explanation.md` and return the written path.
pub fn write_explanation_report(root: &Path, out_dir: &Path) -> Result<PathBuf> {
    let mut sections = vec![String::from("# Dataset folder explanation\n")];
    for path in discover_csv_files(root, true)? {
        let label = path.strip_prefix(root).unwrap_or(&path).display().to_string();
        match load_csv_prefix(&path, PREFIX_ROWS) {
            Ok(df) => sections.push(describe_table(&label, &df)),
            Err(err) => {
                sections.push(format!("## File: `{}`\n- Error reading file: {}\n", label, err));
            }
        }
    }

    let path = out_dir.join("dataset_explanation.md");
    let mut file = File::create(&path)?;
    file.write_all(sections.join("\n").as_bytes())?;

    info!("Dataset explanation saved: {}", path.display());
    Ok(path)
}

fn describe_table(label: &str, df: &DataFrame) -> String {
    let columns: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
    let time_candidate = TimeColumnInferrer::apply_strategy(InferenceStrategy::NameHint, df);
    let numeric = numeric_value_columns(df, time_candidate.as_deref().unwrap_or(""));

    let mut lines = vec![
        format!("## File: `{}`", label),
        format!("- Columns: {:?}", columns),
        match &time_candidate {
            Some(name) => format!("- Inferred time column (candidate): `{}`", name),
            None => String::from("- Inferred time column (candidate): none"),
        },
        format!("- Numeric columns: {:?}", numeric),
        format!("- Preview rows (first {}):", PREVIEW_ROWS),
    ];
    for row in 0..df.height().min(PREVIEW_ROWS) {
        lines.push(format!("  - {}", render_row(df, row)));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Render one row as a compact JSON object.
fn render_row(df: &DataFrame, row: usize) -> String {
    let mut object = Map::new();
    for column in df.get_columns() {
        let value = column
            .get(row)
            .map(any_value_to_json)
            .unwrap_or(Value::Null);
        object.insert(column.name().to_string(), value);
    }
    serde_json::to_string(&object).unwrap_or_default()
}

fn any_value_to_json(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Int8(v) => Value::from(v),
        AnyValue::Int16(v) => Value::from(v),
        AnyValue::Int32(v) => Value::from(v),
        AnyValue::Int64(v) => Value::from(v),
        AnyValue::UInt8(v) => Value::from(v),
        AnyValue::UInt16(v) => Value::from(v),
        AnyValue::UInt32(v) => Value::from(v),
        AnyValue::UInt64(v) => Value::from(v),
        AnyValue::Float32(v) => float_to_json(f64::from(v)),
        AnyValue::Float64(v) => float_to_json(v),
        other => Value::String(format!("{}", other)),
    }
}

fn float_to_json(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
