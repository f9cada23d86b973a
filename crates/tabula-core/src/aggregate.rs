//! # Column Aggregates
//!
//! Footer sums and averages over the rows the user currently sees.
//!
//! Aggregates are recomputed from scratch on every call; nothing is cached
//! between row-set changes.
//!
//! ## Non-numeric values
//!
//! A missing field, `null`, or a value that does not coerce to a finite
//! number contributes 0. Averages still divide by the number of visible rows,
//! so the result is never NaN.

use crate::format::{CellFormatter, coerce_number};
use crate::primitives::AGGREGATE_PRECISION;
use crate::types::{AggregateKind, Column, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Aggregate values keyed by column field.
///
/// Only columns declaring an aggregate have an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Aggregates(BTreeMap<String, f64>);

impl Aggregates {
    /// Aggregate for a field, if the column declares one.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<f64> {
        self.0.get(field).copied()
    }

    /// Number of aggregated columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no column is aggregated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(field, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(field, value)| (field.as_str(), *value))
    }
}

/// Sum of a field across rows, non-numeric values counting as zero.
fn column_sum(rows: &[&Row], field: &str) -> f64 {
    rows.iter()
        .map(|row| {
            row.lookup(field)
                .value()
                .and_then(coerce_number)
                .unwrap_or(0.0)
        })
        .sum()
}

/// Round a fractional result through the fixed-precision formatter.
fn round_fractional(value: f64, formatter: &dyn CellFormatter) -> f64 {
    if value.fract() == 0.0 {
        return value;
    }
    formatter
        .to_fixed(&Value::from(value), AGGREGATE_PRECISION)
        .parse::<f64>()
        .unwrap_or(value)
}

/// Compute every declared aggregate over `rows`.
#[must_use]
pub fn compute_aggregates(
    columns: &[Column],
    rows: &[&Row],
    formatter: &dyn CellFormatter,
) -> Aggregates {
    let mut result = BTreeMap::new();

    for column in columns {
        let Some(kind) = column.aggregate else {
            continue;
        };

        let sum = column_sum(rows, &column.field);
        let value = match kind {
            AggregateKind::Sum => sum,
            AggregateKind::Avg if rows.is_empty() => 0.0,
            AggregateKind::Avg => sum / rows.len() as f64,
        };

        result.insert(column.field.clone(), round_fractional(value, formatter));
    }

    Aggregates(result)
}

// =============================================================================
// TESTS
// =============================================================================
