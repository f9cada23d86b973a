//! # Cell Formatting
//!
//! Value extraction and type dispatch for grid cells.
//!
//! The formatters themselves sit behind the `CellFormatter` trait so a host
//! can plug in its own date and number conventions. `StdFormatter` is the
//! built-in implementation.

use crate::primitives::{
    DEFAULT_DATE_FORMAT, DEFAULT_PRECISION, DEFAULT_THOUSANDS_SEPARATOR, EMPTY_PLACEHOLDER,
};
use crate::types::{Column, ColumnType, Row};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::fmt::Write;

/// Stand-in passed to typed formatters when a field path is missing.
static NULL: Value = Value::Null;

// =============================================================================
// FORMATTER TRAIT
// =============================================================================

/// Formatting collaborators used by typed columns and aggregate rounding.
///
/// Implementations must be pure: same value and format, same string.
pub trait CellFormatter: Send + Sync {
    /// Render a date-like value with an optional pattern.
    fn format_date(&self, value: &Value, format: Option<&str>) -> String;

    /// Render a number with thousands separators.
    fn separate_number(&self, value: &Value, format: Option<&str>) -> String;

    /// Render a number with a fixed number of decimals.
    fn to_fixed(&self, value: &Value, precision: usize) -> String;
}

/// Default formatter.
///
/// - Dates: RFC 3339, `YYYY-MM-DD[ HH:MM:SS]` strings or epoch milliseconds,
///   rendered with a strftime pattern (default `%Y-%m-%d`).
/// - `separate_number`: the format string is the group separator.
/// - Blank input renders as the placeholder; unparseable input is passed through.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFormatter;

impl CellFormatter for StdFormatter {
    fn format_date(&self, value: &Value, format: Option<&str>) -> String {
        if is_falsy(Some(value)) {
            return EMPTY_PLACEHOLDER.to_string();
        }

        match parse_date(value) {
            Some(date) => render_date(date, format.unwrap_or(DEFAULT_DATE_FORMAT)),
            None => display_value(value),
        }
    }

    fn separate_number(&self, value: &Value, format: Option<&str>) -> String {
        let Some(number) = coerce_number(value) else {
            return fallback(value);
        };

        let separator = format
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_THOUSANDS_SEPARATOR);
        group_thousands(&display_number(number), separator)
    }

    fn to_fixed(&self, value: &Value, precision: usize) -> String {
        match coerce_number(value) {
            Some(number) => format!("{:.*}", precision, number),
            None => fallback(value),
        }
    }
}

fn fallback(value: &Value) -> String {
    if is_falsy(Some(value)) {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        display_value(value)
    }
}

// =============================================================================
// VALUE HELPERS
// =============================================================================

/// Blank-means-dash policy: missing, `null`, `""`, `0`, `false` are falsy.
#[must_use]
pub fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64().is_none_or(|f| f == 0.0 || f.is_nan()),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => false,
    }
}

/// Plain display string of a value.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => display_number(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Numeric coercion for aggregates and number formatters.
///
/// Numbers pass through, numeric strings are parsed, booleans are 1/0.
/// Everything else, including non-finite parses, has no numeric value.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn display_number(number: f64) -> String {
    // f64 Display already drops a trailing ".0".
    format!("{}", number)
}

/// Insert `separator` between groups of three integer digits.
fn group_thousands(number: &str, separator: &str) -> String {
    let (integer, decimals) = match number.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (number, None),
    };
    let negative = integer.starts_with('-');
    let digits = integer.trim_start_matches('-');

    let mut grouped = String::with_capacity(number.len() + digits.len() / 3);
    if negative {
        grouped.push('-');
    }
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(c);
    }

    if let Some(decimals) = decimals {
        grouped.push('.');
        grouped.push_str(decimals);
    }
    grouped
}

// =============================================================================
// DATES
// =============================================================================

fn parse_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.naive_local())
                .ok()
                .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok())
                .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                })
        }
        // Epoch milliseconds.
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc()),
        _ => None,
    }
}

fn render_date(date: NaiveDateTime, pattern: &str) -> String {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    let items = if items.iter().any(|item| matches!(item, Item::Error)) {
        tracing::warn!(pattern, "invalid date pattern, using default");
        StrftimeItems::new(DEFAULT_DATE_FORMAT).collect()
    } else {
        items
    };

    let mut out = String::new();
    // Offset specifiers have nothing to print for a naive date and error out.
    if write!(out, "{}", date.format_with_items(items.iter())).is_err() {
        return date.format(DEFAULT_DATE_FORMAT).to_string();
    }
    out
}

// =============================================================================
// CELL RESOLUTION
// =============================================================================

/// Precision of a `toFixed` column: the format as a positive integer, else 2.
#[must_use]
pub fn column_precision(column: &Column) -> usize {
    column
        .format
        .as_deref()
        .and_then(|f| f.trim().parse::<usize>().ok())
        .filter(|&p| p > 0)
        .unwrap_or(DEFAULT_PRECISION)
}

/// Resolve a row's value for a column and render it per the column type.
#[must_use]
pub fn resolve_cell(row: &Row, column: &Column, formatter: &dyn CellFormatter) -> String {
    let value = row.lookup(&column.field).value();
    let format = column.format.as_deref();

    match column.kind {
        ColumnType::Date => formatter.format_date(value.unwrap_or(&NULL), format),
        ColumnType::ToFixed => {
            formatter.to_fixed(value.unwrap_or(&NULL), column_precision(column))
        }
        ColumnType::SeparateNumber => {
            formatter.separate_number(value.unwrap_or(&NULL), format)
        }
        ColumnType::Plain => match value {
            Some(v) if !is_falsy(Some(v)) => display_value(v),
            _ => EMPTY_PLACEHOLDER.to_string(),
        },
    }
}

// =============================================================================
// TESTS
// =============================================================================
