//! # Tabula HTTP API Module
//!
//! This module implements the HTTP REST API server using axum. The server
//! owns a single grid; every request reads or mutates it under a lock.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /grid` - Rendered grid snapshot
//! - `POST /page` - Go to a page
//! - `POST /navigate` - Next, previous, first or last page
//! - `POST /sort` - Toggle sort on a column
//! - `POST /loading` - Set the loading flag
//! - `POST /rows` - Replace rows (and the total, server-side)
//! - `POST /reset` - Clear sort, restore the initial page
//!
//! ## Configuration (Environment Variables)
//!
//! - `TABULA_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)

mod handlers;
mod types;

// Re-export handlers and types for integration tests (via `tabula::api::*`)
pub use handlers::{
    grid_handler, health_handler, loading_handler, navigate_handler, page_handler, reset_handler,
    rows_handler, sort_handler,
};
pub use types::{
    GridResponse, HealthResponse, LoadingRequest, NavigateAction, NavigateRequest, PageRequest,
    RowsRequest, SortRequest,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use tabula_core::{GridState, TabulaError};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the grid.
#[derive(Clone)]
pub struct AppState {
    /// The grid served by this process.
    pub grid: Arc<RwLock<GridState>>,
}

impl AppState {
    /// Create new app state around a grid.
    #[must_use]
    pub fn new(grid: GridState) -> Self {
        Self {
            grid: Arc::new(RwLock::new(grid)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Origins served when `TABULA_CORS_ORIGINS` is unset or has no valid entry.
const LOCAL_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:8080",
];

/// Origins a grid front end may call from.
#[derive(Debug, PartialEq)]
enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

/// Resolve the `TABULA_CORS_ORIGINS` value: `*`, a comma-separated list, or
/// unset for localhost. Invalid entries are skipped.
fn allowed_origins(setting: Option<&str>) -> AllowedOrigins {
    let setting = setting.map(str::trim).unwrap_or_default();
    if setting == "*" {
        return AllowedOrigins::Any;
    }

    let configured: Vec<HeaderValue> = setting
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin, error = %e, "CORS: skipping invalid origin");
                None
            }
        })
        .collect();

    if configured.is_empty() {
        tracing::info!("CORS: localhost only");
        AllowedOrigins::List(LOCAL_ORIGINS.map(HeaderValue::from_static).to_vec())
    } else {
        AllowedOrigins::List(configured)
    }
}

fn build_cors_layer() -> CorsLayer {
    match allowed_origins(std::env::var("TABULA_CORS_ORIGINS").ok().as_deref()) {
        AllowedOrigins::Any => {
            tracing::warn!("CORS: allowing all origins (TABULA_CORS_ORIGINS=*)");
            CorsLayer::permissive()
        }
        AllowedOrigins::List(origins) => CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
    }
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner): tracing, CORS, body limit.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/grid", get(handlers::grid_handler))
        .route("/page", post(handlers::page_handler))
        .route("/navigate", post(handlers::navigate_handler))
        .route("/sort", post(handlers::sort_handler))
        .route("/loading", post(handlers::loading_handler))
        .route("/rows", post(handlers::rows_handler))
        .route("/reset", post(handlers::reset_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer())
                .layer(axum::extract::DefaultBodyLimit::max(16 * 1024 * 1024)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, grid: GridState) -> Result<(), TabulaError> {
    let state = AppState::new(grid);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| TabulaError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Tabula HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| TabulaError::IoError(format!("Server error: {}", e)))
}
