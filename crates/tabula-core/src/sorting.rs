//! # Row Sorting
//!
//! Stable single-column sort over borrowed rows.
//!
//! Values are ranked by type before they are compared, so mixed columns
//! still order deterministically:
//! Numbers(0) < Text(1) < Bool(2) < Other(3) < Blank(4).

use crate::types::{Row, SortDirection};
use serde_json::Value;
use std::cmp::Ordering;

/// Typed comparison key for a single cell.
#[derive(Debug, Clone, PartialEq)]
enum SortKey<'a> {
    Number(f64),
    Text(&'a str),
    Bool(bool),
    /// Arrays and objects, compared by their JSON text.
    Other(String),
    Blank,
}

impl<'a> SortKey<'a> {
    fn from_value(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Blank,
            Some(Value::Number(n)) => n.as_f64().map_or(Self::Blank, Self::Number),
            Some(Value::String(s)) if s.is_empty() => Self::Blank,
            Some(Value::String(s)) => Self::Text(s),
            Some(Value::Bool(b)) => Self::Bool(*b),
            Some(other) => Self::Other(other.to_string()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Text(_) => 1,
            Self::Bool(_) => 2,
            Self::Other(_) => 3,
            Self::Blank => 4,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Other(a), Self::Other(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Compare two optional cell values in ascending order.
#[must_use]
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    SortKey::from_value(a).compare(&SortKey::from_value(b))
}

/// Sort rows in place by `field` (dot paths allowed).
///
/// The sort is stable in both directions: rows with equal keys keep their
/// relative order, descending included.
pub fn sort_rows(rows: &mut [&Row], field: &str, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = compare_values(a.lookup(field).value(), b.lookup(field).value());
        match direction {
            SortDirection::Up => ordering,
            SortDirection::Down => ordering.reverse(),
        }
    });
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: Vec<Value>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| Row::from_value(v).expect("object"))
            .collect()
    }

    fn ids(sorted: &[&Row]) -> Vec<i64> {
        sorted
            .iter()
            .map(|r| r.get("id").and_then(Value::as_i64).unwrap_or(-1))
            .collect()
    }

    #[test]
    fn numeric_ascending_and_descending() {
        let data = rows(vec![
            json!({"id": 1, "n": 10}),
            json!({"id": 2, "n": 2}),
            json!({"id": 3, "n": 33}),
        ]);
        let mut view: Vec<&Row> = data.iter().collect();

        sort_rows(&mut view, "n", SortDirection::Up);
        assert_eq!(ids(&view), vec![2, 1, 3]);

        sort_rows(&mut view, "n", SortDirection::Down);
        assert_eq!(ids(&view), vec![3, 1, 2]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let data = rows(vec![
            json!({"id": 1, "k": "b"}),
            json!({"id": 2, "k": "a"}),
            json!({"id": 3, "k": "b"}),
            json!({"id": 4, "k": "a"}),
        ]);
        let mut view: Vec<&Row> = data.iter().collect();
        sort_rows(&mut view, "k", SortDirection::Up);
        assert_eq!(ids(&view), vec![2, 4, 1, 3]);

        let mut view: Vec<&Row> = data.iter().collect();
        sort_rows(&mut view, "k", SortDirection::Down);
        assert_eq!(ids(&view), vec![1, 3, 2, 4]);
    }

    #[test]
    fn blanks_sort_last_ascending() {
        let data = rows(vec![
            json!({"id": 1}),
            json!({"id": 2, "v": "x"}),
            json!({"id": 3, "v": 5}),
            json!({"id": 4, "v": null}),
        ]);
        let mut view: Vec<&Row> = data.iter().collect();
        sort_rows(&mut view, "v", SortDirection::Up);
        assert_eq!(ids(&view), vec![3, 2, 1, 4]);
    }

    #[test]
    fn text_is_case_insensitive_first() {
        let data = rows(vec![
            json!({"id": 1, "name": "bob"}),
            json!({"id": 2, "name": "Alice"}),
            json!({"id": 3, "name": "alice"}),
        ]);
        let mut view: Vec<&Row> = data.iter().collect();
        sort_rows(&mut view, "name", SortDirection::Up);
        assert_eq!(ids(&view), vec![2, 3, 1]);
    }

    #[test]
    fn nested_sort_field() {
        let data = rows(vec![
            json!({"id": 1, "user": {"age": 40}}),
            json!({"id": 2, "user": {"age": 25}}),
        ]);
        let mut view: Vec<&Row> = data.iter().collect();
        sort_rows(&mut view, "user.age", SortDirection::Up);
        assert_eq!(ids(&view), vec![2, 1]);
    }

    #[test]
    fn caller_rows_untouched() {
        let data = rows(vec![json!({"id": 2}), json!({"id": 1})]);
        let mut view: Vec<&Row> = data.iter().collect();
        sort_rows(&mut view, "id", SortDirection::Up);
        assert_eq!(ids(&view), vec![1, 2]);
        assert_eq!(data[0].get("id"), Some(&json!(2)));
    }
}
