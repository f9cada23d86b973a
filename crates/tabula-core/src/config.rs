//! # Grid Configuration
//!
//! Construction-time inputs of a `GridState`. Every field has a default so a
//! configuration can be deserialized from a partial JSON document.

use crate::primitives::{DEFAULT_CURRENT_PAGE, DEFAULT_PER_PAGE};
use crate::types::{Column, Row, TabulaError};
use serde::{Deserialize, Serialize};

/// Inputs of a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Ordered column definitions.
    pub columns: Vec<Column>,
    /// The full row set (client-side) or the current page (server-side).
    pub rows: Vec<Row>,
    /// Initial 1-based page; `reset()` returns here.
    pub current_page: usize,
    /// Rows per page.
    pub per_page: usize,
    /// Show the aggregate footer. Presentation only.
    pub footer: bool,
    /// A server-side fetch is in flight.
    pub loading: bool,
    /// Rows are supplied one page at a time by the caller.
    pub server_side: bool,
    /// Externally reported row count; required in server-side mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            current_page: DEFAULT_CURRENT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            footer: false,
            loading: false,
            server_side: false,
            total_rows: None,
        }
    }
}

impl GridConfig {
    /// Client-side configuration with default paging.
    #[must_use]
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    /// Set the page size.
    #[must_use]
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Set the initial page.
    #[must_use]
    pub fn with_current_page(mut self, page: usize) -> Self {
        self.current_page = page;
        self
    }

    /// Switch to server-side mode with the externally reported row count.
    #[must_use]
    pub fn server_side(mut self, total_rows: usize) -> Self {
        self.server_side = true;
        self.total_rows = Some(total_rows);
        self
    }

    /// Set the loading flag.
    #[must_use]
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Show the aggregate footer.
    #[must_use]
    pub fn with_footer(mut self, footer: bool) -> Self {
        self.footer = footer;
        self
    }

    /// Check construction preconditions.
    pub fn validate(&self) -> Result<(), TabulaError> {
        if self.per_page == 0 {
            return Err(TabulaError::InvalidPerPage(self.per_page));
        }
        if self.current_page == 0 {
            return Err(TabulaError::InvalidPage(self.current_page));
        }
        if self.server_side && self.total_rows.is_none() {
            return Err(TabulaError::MissingTotalRows);
        }
        Ok(())
    }
}
