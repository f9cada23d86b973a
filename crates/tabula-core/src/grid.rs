//! # Grid State
//!
//! `GridState` owns the configuration, the interaction state and the
//! pagination window of one grid, and computes every derived value on read.
//!
//! ## Data flow
//!
//! ```text
//! rows ──sort──▶ sorted view ──slice (client-side)──▶ visible rows ──▶ aggregates
//! current page + total pages ──────────────────────▶ pagination window
//! ```
//!
//! Only the pagination window is stored: it depends on its own history, so
//! every mutator refreshes it. Everything else is a pure function of state.

use crate::aggregate::{Aggregates, compute_aggregates};
use crate::config::GridConfig;
use crate::format::{CellFormatter, StdFormatter, resolve_cell};
use crate::pagination::{PaginationWindow, total_pages};
use crate::sorting::sort_rows;
use crate::types::{
    Column, ColumnSorted, ColumnWidth, Row, SortDirection, SortIndicator, SortSpec, TabulaError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// PAGE READER
// =============================================================================

/// Caller-supplied fetch hook for server-side mode.
///
/// Invoked with the requested 1-based page on every accepted page change.
/// It is fire-and-forget: the grid neither awaits nor cancels it, and the new
/// rows arrive later through `GridState::set_rows`.
pub trait PageReader: Send + Sync {
    fn read_page(&mut self, page: usize);
}

impl<F> PageReader for F
where
    F: FnMut(usize) + Send + Sync,
{
    fn read_page(&mut self, page: usize) {
        self(page);
    }
}

// =============================================================================
// NAVIGATION OUTCOME
// =============================================================================

/// Why a navigation command did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Neither a next nor a previous page exists.
    SinglePage,
    /// The requested page is the current one and a load is in flight.
    AlreadyLoading,
    /// The requested page is outside `[1, total_pages]`.
    OutOfRange,
    NoNextPage,
    NoPreviousPage,
}

/// Result of a navigation command. Navigation never fails; it moves or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Navigation {
    Moved { from: usize, to: usize },
    Ignored { reason: IgnoreReason },
}

impl Navigation {
    /// Check whether the current page changed hands.
    #[must_use]
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

// =============================================================================
// GRID STATE
// =============================================================================

/// State of a single data grid.
pub struct GridState {
    columns: Vec<Column>,
    rows: Vec<Row>,
    per_page: usize,
    /// Configured initial page, restored by `reset()`.
    initial_page: usize,
    current_page: usize,
    footer: bool,
    loading: bool,
    server_side: bool,
    total_rows: Option<usize>,
    sort: SortSpec,
    window: PaginationWindow,
    formatter: Box<dyn CellFormatter>,
    reader: Option<Box<dyn PageReader>>,
}

impl fmt::Debug for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridState")
            .field("columns", &self.columns.len())
            .field("rows", &self.rows.len())
            .field("per_page", &self.per_page)
            .field("current_page", &self.current_page)
            .field("server_side", &self.server_side)
            .field("total_rows", &self.total_rows)
            .field("loading", &self.loading)
            .field("sort", &self.sort)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl GridState {
    /// Build a grid from its configuration.
    ///
    /// Fails only on broken preconditions (zero page size, page 0,
    /// server-side without a total).
    pub fn new(config: GridConfig) -> Result<Self, TabulaError> {
        config.validate()?;

        let mut grid = Self {
            columns: config.columns,
            rows: config.rows,
            per_page: config.per_page,
            initial_page: config.current_page,
            current_page: config.current_page,
            footer: config.footer,
            loading: config.loading,
            server_side: config.server_side,
            total_rows: config.total_rows,
            sort: SortSpec::Unsorted,
            window: PaginationWindow::default(),
            formatter: Box::new(StdFormatter),
            reader: None,
        };
        grid.refresh_window();
        Ok(grid)
    }

    /// Replace the cell formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: impl CellFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Attach the server-side page reader.
    #[must_use]
    pub fn with_page_reader(mut self, reader: impl PageReader + 'static) -> Self {
        self.reader = Some(Box::new(reader));
        self
    }

    /// Attach or replace the server-side page reader.
    pub fn set_page_reader(&mut self, reader: impl PageReader + 'static) {
        self.reader = Some(Box::new(reader));
    }

    // =========================================================================
    // CONFIGURATION ACCESSORS
    // =========================================================================

    /// Column definitions in display order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Find a column by field.
    #[must_use]
    pub fn column(&self, field: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// The materialized rows, unsorted.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub fn is_server_side(&self) -> bool {
        self.server_side
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the aggregate footer should be shown.
    #[must_use]
    pub fn show_footer(&self) -> bool {
        self.footer
    }

    /// Current sort.
    #[must_use]
    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Raw window bounds.
    #[must_use]
    pub fn window(&self) -> PaginationWindow {
        self.window
    }

    // =========================================================================
    // DERIVED VALUES
    // =========================================================================

    /// Total row count: the reported total server-side, the row count otherwise.
    ///
    /// A missing or zero server total falls back to the row count.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        match self.total_rows {
            Some(total) if self.server_side && total > 0 => total,
            _ => self.rows.len(),
        }
    }

    /// `ceil(total_rows / per_page)`.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.total_rows(), self.per_page)
    }

    /// Index of the first row of the current page.
    #[must_use]
    pub fn start_index(&self) -> usize {
        self.current_page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// One past the last row of the current page, capped at the total.
    #[must_use]
    pub fn end_index(&self) -> usize {
        self.start_index()
            .saturating_add(self.per_page)
            .min(self.total_rows())
    }

    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.end_index() < self.total_rows()
    }

    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.start_index() > 0
    }

    /// All materialized rows in sort order. Caller rows are only borrowed.
    #[must_use]
    pub fn sorted_rows(&self) -> Vec<&Row> {
        let mut view: Vec<&Row> = self.rows.iter().collect();
        if let (Some(field), Some(direction)) = (self.sort.field(), self.sort.direction()) {
            sort_rows(&mut view, field, direction);
        }
        view
    }

    /// Rows to display.
    ///
    /// Server-side rows are already one page and are returned whole;
    /// client-side rows are sliced to `[start_index, end_index)`.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<&Row> {
        let view = self.sorted_rows();
        if self.server_side {
            return view;
        }

        let start = self.start_index().min(view.len());
        let end = self.end_index().clamp(start, view.len());
        view[start..end].to_vec()
    }

    /// Aggregates over the visible rows, recomputed on every call.
    #[must_use]
    pub fn aggregates(&self) -> Aggregates {
        compute_aggregates(&self.columns, &self.visible_rows(), self.formatter.as_ref())
    }

    /// 0-based page indices currently exposed for navigation.
    #[must_use]
    pub fn pagination_window(&self) -> Vec<usize> {
        self.window.pages(self.total_pages())
    }

    // =========================================================================
    // CELLS & HEADERS
    // =========================================================================

    /// Render a row's value for a column.
    #[must_use]
    pub fn resolve_cell_value(&self, row: &Row, column: &Column) -> String {
        resolve_cell(row, column, self.formatter.as_ref())
    }

    /// Declared width of a column, number or CSS string as configured.
    #[must_use]
    pub fn column_width<'a>(&self, column: &'a Column) -> Option<&'a ColumnWidth> {
        column.width.as_ref()
    }

    /// Sort indicator for a column header.
    #[must_use]
    pub fn is_column_sorted(&self, column: &Column) -> ColumnSorted {
        if !column.sortable || self.sort.field() != Some(column.field.as_str()) {
            return ColumnSorted::default();
        }

        let indicator = match self.sort.direction() {
            Some(SortDirection::Up) => SortIndicator::Up,
            Some(SortDirection::Down) => SortIndicator::Down,
            None => SortIndicator::None,
        };
        ColumnSorted {
            is_active: true,
            indicator,
        }
    }

    // =========================================================================
    // SORT COMMANDS
    // =========================================================================

    /// Toggle sorting on a column.
    ///
    /// Returns `false` (and changes nothing) for unsortable columns.
    pub fn toggle_sort(&mut self, column: &Column) -> bool {
        if !column.sortable {
            return false;
        }
        self.sort = self.sort.toggled(&column.field);
        tracing::debug!(field = %column.field, sort = %self.sort, "sort toggled");
        true
    }

    /// Apply a sort directly, e.g. from saved configuration.
    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    // =========================================================================
    // PAGE NAVIGATION
    // =========================================================================

    /// Go to the next page, if there is one.
    pub fn next_page(&mut self) -> Navigation {
        if !self.has_next_page() {
            return Navigation::Ignored {
                reason: IgnoreReason::NoNextPage,
            };
        }
        self.change_page(self.current_page + 1)
    }

    /// Go to the previous page, if there is one.
    pub fn previous_page(&mut self) -> Navigation {
        if !self.has_previous_page() {
            return Navigation::Ignored {
                reason: IgnoreReason::NoPreviousPage,
            };
        }
        self.change_page(self.current_page - 1)
    }

    /// Go to page 1.
    pub fn first_page(&mut self) -> Navigation {
        self.change_page(1)
    }

    /// Go to the last page.
    pub fn last_page(&mut self) -> Navigation {
        self.change_page(self.total_pages())
    }

    /// Change the current page.
    ///
    /// Ignored when the grid has a single page, when the page is the current
    /// one while loading, or when it is out of range. Server-side, the page
    /// reader is called before the page is set.
    pub fn change_page(&mut self, page: usize) -> Navigation {
        let reason = if !self.has_next_page() && !self.has_previous_page() {
            Some(IgnoreReason::SinglePage)
        } else if page == self.current_page && self.loading {
            Some(IgnoreReason::AlreadyLoading)
        } else if page == 0 || page > self.total_pages() {
            Some(IgnoreReason::OutOfRange)
        } else {
            None
        };

        if let Some(reason) = reason {
            tracing::debug!(page, ?reason, "page change ignored");
            return Navigation::Ignored { reason };
        }

        if self.server_side
            && let Some(reader) = self.reader.as_mut()
        {
            tracing::debug!(page, "requesting server page");
            reader.read_page(page);
        }

        let from = self.current_page;
        self.current_page = page;
        self.refresh_window();
        tracing::debug!(from, to = page, "page changed");

        Navigation::Moved { from, to: page }
    }

    // =========================================================================
    // CALLER UPDATES
    // =========================================================================

    /// Overwrite the current page from outside, without navigation guards
    /// and without calling the page reader.
    ///
    /// The synced page also becomes the page `reset()` returns to.
    pub fn set_current_page(&mut self, page: usize) {
        let page = page.max(1);
        self.initial_page = page;
        self.current_page = page;
        self.refresh_window();
    }

    /// Replace the materialized rows.
    ///
    /// The current page is not clamped; a shrinking dataset can leave it
    /// past the end until the next navigation.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        if self.server_side && rows.len() > self.per_page {
            tracing::warn!(
                rows = rows.len(),
                per_page = self.per_page,
                "server-side rows exceed one page; showing all of them"
            );
        }
        self.rows = rows;
        self.refresh_window();
    }

    /// Update the externally reported row count.
    pub fn set_total_rows(&mut self, total_rows: Option<usize>) {
        self.total_rows = total_rows;
        self.refresh_window();
    }

    /// Replace the column definitions.
    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
    }

    /// Set the caller-owned loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Teardown reset: clear the sort and return to the initial page, the
    /// configured one or the last synced through `set_current_page` (not
    /// page 1). Call when the grid's view goes away.
    pub fn reset(&mut self) {
        self.sort = SortSpec::Unsorted;
        self.current_page = self.initial_page;
        self.refresh_window();
    }

    fn refresh_window(&mut self) {
        let total = self.total_pages();
        self.window.advance(self.current_page, total);
    }
}

// =============================================================================
// TESTS
// =============================================================================
