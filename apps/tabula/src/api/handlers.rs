//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Grid commands never fail: ignored navigation and no-op sort toggles are
//! answered with `200` and the unchanged snapshot. Only requests naming an
//! unknown column are rejected.

use super::{
    AppState,
    types::{
        GridResponse, HealthResponse, LoadingRequest, NavigateAction, NavigateRequest,
        PageRequest, RowsRequest, SortRequest,
    },
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// GRID HANDLER
// =============================================================================

/// Get the rendered grid.
pub async fn grid_handler(State(state): State<AppState>) -> impl IntoResponse {
    let grid = state.grid.read().await;
    (StatusCode::OK, Json(GridResponse::snapshot(grid.snapshot())))
}

// =============================================================================
// NAVIGATION HANDLERS
// =============================================================================

/// Go to a page.
pub async fn page_handler(
    State(state): State<AppState>,
    Json(request): Json<PageRequest>,
) -> impl IntoResponse {
    let mut grid = state.grid.write().await;
    let navigation = grid.change_page(request.page);
    (
        StatusCode::OK,
        Json(GridResponse::navigated(navigation, grid.snapshot())),
    )
}

/// Go to the next, previous, first or last page.
pub async fn navigate_handler(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> impl IntoResponse {
    let mut grid = state.grid.write().await;
    let navigation = match request.action {
        NavigateAction::Next => grid.next_page(),
        NavigateAction::Previous => grid.previous_page(),
        NavigateAction::First => grid.first_page(),
        NavigateAction::Last => grid.last_page(),
    };
    (
        StatusCode::OK,
        Json(GridResponse::navigated(navigation, grid.snapshot())),
    )
}

// =============================================================================
// SORT HANDLER
// =============================================================================

/// Toggle sort on a column.
pub async fn sort_handler(
    State(state): State<AppState>,
    Json(request): Json<SortRequest>,
) -> impl IntoResponse {
    let mut grid = state.grid.write().await;

    let Some(column) = grid.column(&request.field).cloned() else {
        return (
            StatusCode::NOT_FOUND,
            Json(GridResponse::error(format!(
                "Unknown column: {}",
                request.field
            ))),
        );
    };

    let toggled = grid.toggle_sort(&column);
    (
        StatusCode::OK,
        Json(GridResponse::toggled(toggled, grid.snapshot())),
    )
}

// =============================================================================
// CALLER UPDATE HANDLERS
// =============================================================================

/// Set the loading flag.
pub async fn loading_handler(
    State(state): State<AppState>,
    Json(request): Json<LoadingRequest>,
) -> impl IntoResponse {
    let mut grid = state.grid.write().await;
    grid.set_loading(request.loading);
    (StatusCode::OK, Json(GridResponse::snapshot(grid.snapshot())))
}

/// Replace the rows and, optionally, the reported total.
pub async fn rows_handler(
    State(state): State<AppState>,
    Json(request): Json<RowsRequest>,
) -> impl IntoResponse {
    let mut grid = state.grid.write().await;
    let count = request.rows.len();

    grid.set_rows(request.rows);
    if request.total_rows.is_some() {
        grid.set_total_rows(request.total_rows);
    }

    tracing::info!(rows = count, total_rows = grid.total_rows(), "rows replaced");
    (StatusCode::OK, Json(GridResponse::snapshot(grid.snapshot())))
}

/// Clear the sort and return to the initial page.
pub async fn reset_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut grid = state.grid.write().await;
    grid.reset();
    (StatusCode::OK, Json(GridResponse::snapshot(grid.snapshot())))
}
