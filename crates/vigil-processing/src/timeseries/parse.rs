//! Timestamp parsing for the time axis.
//!
//! Every supported representation (date/datetime strings, epoch integers,
//! native temporal columns) normalizes to epoch milliseconds. Parsing is
//! always best-effort: a value that cannot be read as a point in time becomes
//! missing, never an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

/// Shapes a string must have before the chrono format cascade is attempted.
/// Cheap pre-filter so clearly non-temporal strings skip the parse attempts.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}$").expect("Invalid regex: ISO date"),
        Regex::new(r"^\d{1,2}[-/]\d{1,2}[-/]\d{4}$").expect("Invalid regex: US date"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}:\d{2}").expect("Invalid regex: datetime"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("Invalid regex: ISO datetime"),
    ]
});

/// Datetime string formats tried in order after the RFC 3339 fast path.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Date-only formats tried in order; parsed dates become midnight UTC.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y"];

/// Interpret a raw integer as an epoch timestamp in milliseconds.
///
/// Values in [1e9, 2e9) read as seconds, values in [1e12, 2e12) as
/// milliseconds (both cover 2001 through 2033); anything else is not a
/// plausible timestamp.
pub(crate) fn epoch_to_millis(raw: i64) -> Option<i64> {
    if raw > 1_000_000_000 && raw < 2_000_000_000 {
        Some(raw * 1000)
    } else if raw > 1_000_000_000_000 && raw < 2_000_000_000_000 {
        Some(raw)
    } else {
        None
    }
}

/// Parse one string as a timestamp, returning epoch milliseconds.
pub(crate) fn parse_timestamp_str(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Integer strings are epoch timestamps, not calendar dates
    if let Ok(raw) = trimmed.parse::<i64>() {
        return epoch_to_millis(raw);
    }

    if !DATE_PATTERNS.iter().any(|p| p.is_match(trimmed)) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc).timestamp_millis());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&midnight).timestamp_millis());
        }
    }

    None
}

/// Best-effort parse of a whole column to epoch milliseconds, aligned 1:1
/// with the input rows. Unparseable or missing values come back as None.
pub(crate) fn series_to_epoch_millis(series: &Series) -> Vec<Option<i64>> {
    let len = series.len();

    match series.dtype() {
        DataType::String => {
            let Ok(str_series) = series.str() else {
                return vec![None; len];
            };
            str_series
                .into_iter()
                .map(|opt| opt.and_then(parse_timestamp_str))
                .collect()
        }
        DataType::Date => {
            // Physical representation is days since epoch
            let Ok(days) = series.cast(&DataType::Int32) else {
                return vec![None; len];
            };
            let Ok(days) = days.i32() else {
                return vec![None; len];
            };
            days.into_iter()
                .map(|opt| opt.map(|d| i64::from(d) * 86_400_000))
                .collect()
        }
        DataType::Datetime(unit, _) => {
            let Ok(raw) = series.cast(&DataType::Int64) else {
                return vec![None; len];
            };
            let Ok(raw) = raw.i64() else {
                return vec![None; len];
            };
            let scale = match unit {
                TimeUnit::Nanoseconds => 1_000_000,
                TimeUnit::Microseconds => 1_000,
                TimeUnit::Milliseconds => 1,
            };
            raw.into_iter().map(|opt| opt.map(|v| v / scale)).collect()
        }
        dtype if dtype.is_integer() => {
            let Ok(cast) = series.cast(&DataType::Int64) else {
                return vec![None; len];
            };
            let Ok(values) = cast.i64() else {
                return vec![None; len];
            };
            values
                .into_iter()
                .map(|opt| opt.and_then(epoch_to_millis))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let Ok(cast) = series.cast(&DataType::Float64) else {
                return vec![None; len];
            };
            let Ok(values) = cast.f64() else {
                return vec![None; len];
            };
            values
                .into_iter()
                .map(|opt| {
                    opt.filter(|v| v.is_finite())
                        .and_then(|v| epoch_to_millis(v as i64))
                })
                .collect()
        }
        _ => vec![None; len],
    }
}

/// Build a millisecond-precision datetime series from parsed epoch values.
pub(crate) fn millis_to_datetime_series(
    name: &str,
    millis: Vec<Option<i64>>,
) -> PolarsResult<Series> {
    let series = Series::new(name.into(), millis);
    series.cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== parse_timestamp_str tests ====================

    #[test]
    fn test_parse_iso_date() {
        // 2020-01-01 midnight UTC
        assert_eq!(parse_timestamp_str("2020-01-01"), Some(1_577_836_800_000));
        assert_eq!(parse_timestamp_str("2020/01/01"), Some(1_577_836_800_000));
    }

    #[test]
    fn test_parse_us_date() {
        assert_eq!(parse_timestamp_str("01/02/2020"), Some(1_577_923_200_000));
        assert_eq!(parse_timestamp_str("1-2-2020"), Some(1_577_923_200_000));
    }

    #[test]
    fn test_parse_datetime_strings() {
        assert_eq!(
            parse_timestamp_str("2020-01-01 00:00:00"),
            Some(1_577_836_800_000)
        );
        assert_eq!(
            parse_timestamp_str("2020-01-01T00:00:01"),
            Some(1_577_836_801_000)
        );
        assert_eq!(
            parse_timestamp_str("2020-01-01T00:00:00.500"),
            Some(1_577_836_800_500)
        );
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        assert_eq!(
            parse_timestamp_str("2020-01-01T01:00:00+01:00"),
            Some(1_577_836_800_000)
        );
    }

    #[test]
    fn test_parse_epoch_strings() {
        // Seconds scale up, milliseconds pass through
        assert_eq!(parse_timestamp_str("1577836800"), Some(1_577_836_800_000));
        assert_eq!(
            parse_timestamp_str("1577836800000"),
            Some(1_577_836_800_000)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp_str("not a date"), None);
        assert_eq!(parse_timestamp_str(""), None);
        assert_eq!(parse_timestamp_str("12.5"), None);
        // Integers outside both epoch windows are not timestamps
        assert_eq!(parse_timestamp_str("42"), None);
        assert_eq!(parse_timestamp_str("99999999999999999"), None);
        // Date-shaped but impossible
        assert_eq!(parse_timestamp_str("2020-13-45"), None);
    }

    // ==================== epoch_to_millis tests ====================

    #[test]
    fn test_epoch_ranges() {
        assert_eq!(epoch_to_millis(1_600_000_000), Some(1_600_000_000_000));
        assert_eq!(epoch_to_millis(1_600_000_000_000), Some(1_600_000_000_000));
        assert_eq!(epoch_to_millis(100), None);
        assert_eq!(epoch_to_millis(3_000_000_000), None);
        assert_eq!(epoch_to_millis(999_999_999_999_999), None);
    }

    // ==================== series_to_epoch_millis tests ====================

    #[test]
    fn test_series_of_date_strings() {
        let series = Series::new(
            "t".into(),
            &["2020-01-01", "bad", "2020-01-03"],
        );
        let parsed = series_to_epoch_millis(&series);
        assert_eq!(
            parsed,
            vec![Some(1_577_836_800_000), None, Some(1_578_009_600_000)]
        );
    }

    #[test]
    fn test_series_of_epoch_ints() {
        let series = Series::new("t".into(), &[1_577_836_800i64, 42]);
        let parsed = series_to_epoch_millis(&series);
        assert_eq!(parsed, vec![Some(1_577_836_800_000), None]);
    }

    #[test]
    fn test_series_with_nulls_preserved() {
        let series = Series::new("t".into(), &[Some("2020-01-01"), None]);
        let parsed = series_to_epoch_millis(&series);
        assert_eq!(parsed, vec![Some(1_577_836_800_000), None]);
    }

    #[test]
    fn test_non_temporal_series_is_all_none() {
        let series = Series::new("flag".into(), &[true, false]);
        let parsed = series_to_epoch_millis(&series);
        assert_eq!(parsed, vec![None, None]);
    }

    #[test]
    fn test_native_datetime_series() {
        let millis = vec![Some(1_577_836_800_000i64), Some(1_577_923_200_000)];
        let series = millis_to_datetime_series("t", millis.clone()).unwrap();
        assert!(matches!(series.dtype(), DataType::Datetime(_, _)));

        let parsed = series_to_epoch_millis(&series);
        assert_eq!(parsed, millis);
    }

    #[test]
    fn test_float_epoch_series() {
        let series = Series::new("t".into(), &[1_577_836_800.0f64, f64::NAN]);
        let parsed = series_to_epoch_millis(&series);
        assert_eq!(parsed, vec![Some(1_577_836_800_000), None]);
    }
}
