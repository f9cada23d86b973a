//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use serde::{Deserialize, Serialize};
use tabula_core::{GridSnapshot, Navigation, Row};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// COMMAND REQUESTS
// =============================================================================

/// Go to a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
}

/// Relative navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigateAction {
    Next,
    Previous,
    First,
    Last,
}

/// Navigate relative to the current page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateRequest {
    pub action: NavigateAction,
}

/// Toggle sort on a column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortRequest {
    pub field: String,
}

/// Set the loading flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingRequest {
    pub loading: bool,
}

/// Replace the rows, typically with a freshly fetched server-side page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowsRequest {
    pub rows: Vec<Row>,
    /// New externally reported total; omitted keeps the current one.
    #[serde(default, rename = "totalRows", skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<usize>,
}

// =============================================================================
// GRID RESPONSE
// =============================================================================

/// Response of every grid endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridResponse {
    pub success: bool,
    /// Outcome of a navigation command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Navigation>,
    /// Whether a sort toggle was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggled: Option<bool>,
    /// Grid state after the command.
    pub grid: Option<GridSnapshot>,
    pub error: Option<String>,
}

impl GridResponse {
    pub fn snapshot(grid: GridSnapshot) -> Self {
        Self {
            success: true,
            navigation: None,
            toggled: None,
            grid: Some(grid),
            error: None,
        }
    }

    pub fn navigated(navigation: Navigation, grid: GridSnapshot) -> Self {
        Self {
            navigation: Some(navigation),
            ..Self::snapshot(grid)
        }
    }

    pub fn toggled(toggled: bool, grid: GridSnapshot) -> Self {
        Self {
            toggled: Some(toggled),
            ..Self::snapshot(grid)
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            navigation: None,
            toggled: None,
            grid: None,
            error: Some(msg.into()),
        }
    }
}
