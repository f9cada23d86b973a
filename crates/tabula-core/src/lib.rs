//! # tabula-core
//!
//! The data-grid state engine for Tabula.
//!
//! Given column definitions, rows and pagination settings, this crate keeps
//! the interaction state of one grid (current page, sort, loading) and derives
//! everything a view needs from it: the sorted and paged rows, rendered cell
//! strings, sort indicators, footer aggregates and a sliding window of page
//! links.
//!
//! ## Modes
//!
//! - **Client-side**: the grid holds every row and sorts and slices locally.
//! - **Server-side**: the caller supplies one page of rows plus a total
//!   count; page changes are reported through a `PageReader`.
//!
//! ## Architectural Constraints
//!
//! - No rendering, no I/O, no async: commands are synchronous and every
//!   derived value is a pure function of the state.
//! - Grid commands never fail. Out-of-range or redundant navigation is
//!   ignored and reported as `Navigation::Ignored`.

// =============================================================================
// MODULES
// =============================================================================

pub mod aggregate;
pub mod config;
pub mod format;
pub mod grid;
pub mod pagination;
pub mod primitives;
pub mod snapshot;
pub mod sorting;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    AggregateKind, Column, ColumnSorted, ColumnType, ColumnWidth, Lookup, Row, SortDirection,
    SortIndicator, SortSpec, TabulaError,
};

// =============================================================================
// RE-EXPORTS: Grid Engine
// =============================================================================

pub use aggregate::{Aggregates, compute_aggregates};
pub use config::GridConfig;
pub use format::{CellFormatter, StdFormatter, resolve_cell};
pub use grid::{GridState, IgnoreReason, Navigation, PageReader};
pub use pagination::{PaginationWindow, total_pages};
pub use snapshot::{ColumnHeader, GridSnapshot};
pub use sorting::{compare_values, sort_rows};
