//! # Core Type Definitions
//!
//! This module contains the types shared by every part of the grid engine:
//! - Row storage and dot-path lookup (`Row`, `Lookup`)
//! - Column configuration (`Column`, `ColumnType`, `AggregateKind`, `ColumnWidth`)
//! - Sort state (`SortSpec`, `SortDirection`, `SortIndicator`, `ColumnSorted`)
//! - Error types (`TabulaError`)
//!
//! ## Ownership
//!
//! Rows and columns belong to the caller. The grid only borrows rows when it
//! sorts or slices them, so a `Row` is never mutated after construction.

use crate::primitives::{ICON_SORT_DOWN, ICON_SORT_UP, PATH_SEPARATOR, SORT_SEPARATOR};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// ROW
// =============================================================================

/// A single data row: an arbitrary mapping from field name to JSON value.
///
/// Values may be nested objects reachable through a dot path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(pub Map<String, Value>);

/// Result of resolving a field path against a row.
///
/// `Missing` is distinct from a present-but-empty value so callers can tell
/// an absent key from `""` or `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// The path resolved to a value (which may itself be `null` or empty).
    Found(&'a Value),
    /// Some segment of the path does not exist.
    Missing,
}

impl<'a> Lookup<'a> {
    /// The resolved value, if any.
    #[must_use]
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing => None,
        }
    }

    /// Check whether the path failed to resolve.
    #[must_use]
    pub fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl Row {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from a JSON value. Only objects are rows.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Insert or replace a top-level field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Direct top-level lookup, no path walking.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Resolve a field that may be a dot path (`"user.age"`).
    ///
    /// Each segment after the first is looked up on the previous value; a
    /// missing key or a non-object intermediate ends the walk with `Missing`.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Lookup<'_> {
        if !path.contains(PATH_SEPARATOR) {
            return self.0.get(path).map_or(Lookup::Missing, Lookup::Found);
        }

        let mut segments = path.split(PATH_SEPARATOR);
        let Some(mut current) = segments.next().and_then(|first| self.0.get(first)) else {
            return Lookup::Missing;
        };

        for segment in segments {
            match current.get(segment) {
                Some(next) => current = next,
                None => return Lookup::Missing,
            }
        }

        Lookup::Found(current)
    }

    /// Number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// =============================================================================
// COLUMN
// =============================================================================

/// How a column's value is rendered.
///
/// Unknown type names fall back to `Plain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    /// Raw value, `"-"` when falsy.
    #[default]
    Plain,
    /// Date formatter with the column's format string.
    Date,
    /// Fixed-precision number; the format is the precision.
    ToFixed,
    /// Number with thousands separators; the format is the separator.
    SeparateNumber,
}

impl ColumnType {
    /// Wire name of the type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Date => "date",
            Self::ToFixed => "toFixed",
            Self::SeparateNumber => "separateNumber",
        }
    }
}

impl From<String> for ColumnType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "date" => Self::Date,
            "toFixed" => Self::ToFixed,
            "separateNumber" => Self::SeparateNumber,
            _ => Self::Plain,
        }
    }
}

impl From<ColumnType> for String {
    fn from(kind: ColumnType) -> Self {
        kind.as_str().to_string()
    }
}

/// Summary statistic computed over the visible rows of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateKind {
    /// Sum of the numeric values.
    Sum,
    /// Sum divided by the number of visible rows.
    Avg,
}

/// Declared column width: a bare number or any CSS length string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnWidth {
    Pixels(u32),
    Css(String),
}

impl fmt::Display for ColumnWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{}", px),
            Self::Css(css) => f.write_str(css),
        }
    }
}

/// A column definition. Owned by the caller and immutable per render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Field name or dot path into the row.
    pub field: String,
    /// Header text.
    #[serde(default)]
    pub label: String,
    /// Rendering type.
    #[serde(default, rename = "type")]
    pub kind: ColumnType,
    /// Type-specific format (date pattern, precision, group separator).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Whether clicking the header toggles sorting.
    #[serde(default)]
    pub sortable: bool,
    /// Footer aggregate, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<AggregateKind>,
    /// Declared width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<ColumnWidth>,
}

impl Column {
    /// Create a plain, unsortable column.
    #[must_use]
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            kind: ColumnType::Plain,
            format: None,
            sortable: false,
            aggregate: None,
            width: None,
        }
    }

    /// Set the rendering type.
    #[must_use]
    pub fn with_type(mut self, kind: ColumnType) -> Self {
        self.kind = kind;
        self
    }

    /// Set the type-specific format string.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Mark the column sortable.
    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Attach a footer aggregate.
    #[must_use]
    pub fn with_aggregate(mut self, kind: AggregateKind) -> Self {
        self.aggregate = Some(kind);
        self
    }

    /// Set the declared width.
    #[must_use]
    pub fn with_width(mut self, width: ColumnWidth) -> Self {
        self.width = Some(width);
        self
    }
}

// =============================================================================
// SORT STATE
// =============================================================================

/// Direction of a single-column sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    Up,
    /// Descending.
    Down,
}

impl SortDirection {
    /// Wire name (`"up"` / `"down"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl FromStr for SortDirection {
    type Err = TabulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(TabulaError::InvalidSort(other.to_string())),
        }
    }
}

/// Current sort of the grid.
///
/// Serialized as `"field,direction"`; the empty string is `Unsorted`.
///
/// Toggling the same column cycles
/// `Unsorted -> Ascending -> Descending -> Unsorted`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortSpec {
    #[default]
    Unsorted,
    Ascending(String),
    Descending(String),
}

impl SortSpec {
    /// The sorted field, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Unsorted => None,
            Self::Ascending(field) | Self::Descending(field) => Some(field),
        }
    }

    /// The sort direction, if any.
    #[must_use]
    pub fn direction(&self) -> Option<SortDirection> {
        match self {
            Self::Unsorted => None,
            Self::Ascending(_) => Some(SortDirection::Up),
            Self::Descending(_) => Some(SortDirection::Down),
        }
    }

    /// Check if no sort is applied.
    #[must_use]
    pub fn is_unsorted(&self) -> bool {
        matches!(self, Self::Unsorted)
    }

    /// Next state after toggling `field`.
    ///
    /// A different field always starts over at ascending.
    #[must_use]
    pub fn toggled(&self, field: &str) -> Self {
        match self {
            Self::Ascending(current) if current == field => Self::Descending(field.to_string()),
            Self::Descending(current) if current == field => Self::Unsorted,
            _ => Self::Ascending(field.to_string()),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.field(), self.direction()) {
            (Some(field), Some(direction)) => {
                write!(f, "{}{}{}", field, SORT_SEPARATOR, direction.as_str())
            }
            _ => Ok(()),
        }
    }
}

impl FromStr for SortSpec {
    type Err = TabulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::Unsorted);
        }

        let (field, direction) = s
            .split_once(SORT_SEPARATOR)
            .ok_or_else(|| TabulaError::InvalidSort(s.to_string()))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(TabulaError::InvalidSort(s.to_string()));
        }

        match direction.parse::<SortDirection>() {
            Ok(SortDirection::Up) => Ok(Self::Ascending(field.to_string())),
            Ok(SortDirection::Down) => Ok(Self::Descending(field.to_string())),
            Err(_) => Err(TabulaError::InvalidSort(s.to_string())),
        }
    }
}

impl TryFrom<String> for SortSpec {
    type Error = TabulaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortSpec> for String {
    fn from(spec: SortSpec) -> Self {
        spec.to_string()
    }
}

/// Header indicator derived from the sort state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortIndicator {
    #[default]
    None,
    Up,
    Down,
}

impl SortIndicator {
    /// Icon class for the indicator, empty when there is none.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Up => ICON_SORT_UP,
            Self::Down => ICON_SORT_DOWN,
        }
    }

    /// Single-character arrow for plain-text rendering.
    #[must_use]
    pub fn arrow(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Up => "↑",
            Self::Down => "↓",
        }
    }
}

/// Whether a column is the active sort column, and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnSorted {
    pub is_active: bool,
    pub indicator: SortIndicator,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in Tabula.
///
/// Grid commands never fail; these cover construction preconditions and
/// the loading of configuration and data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TabulaError {
    /// Page size must be at least one row.
    #[error("Invalid page size: {0} (must be at least 1)")]
    InvalidPerPage(usize),

    /// Pages are 1-based.
    #[error("Invalid page: {0} (pages start at 1)")]
    InvalidPage(usize),

    /// Server-side mode needs the externally reported row count.
    #[error("Server-side mode requires total_rows")]
    MissingTotalRows,

    /// A sort spec string could not be parsed.
    #[error("Invalid sort spec: {0:?}")]
    InvalidSort(String),

    /// A referenced column does not exist.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Configuration is malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
