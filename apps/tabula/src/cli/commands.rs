//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands, plus the
//! loaders that turn a TOML settings file and a JSON data file into a grid.

use crate::api;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tabula_core::{
    Column, GridConfig, GridSnapshot, GridState, Navigation, Row, SortSpec, TabulaError,
    primitives::{DEFAULT_CURRENT_PAGE, DEFAULT_PER_PAGE},
};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a grid settings file (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Maximum size of a data file (100 MB).
///
/// The whole file is materialized in memory as rows.
const MAX_DATA_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), TabulaError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| TabulaError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(TabulaError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input path.
///
/// Canonicalizes the path (resolving symlinks and "..") and checks that it
/// names an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, TabulaError> {
    let canonical = path.canonicalize().map_err(|e| {
        TabulaError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(TabulaError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate, size-check and read a text file.
fn read_input(path: &Path, max_size: u64) -> Result<String, TabulaError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, max_size)?;

    std::fs::read_to_string(&validated)
        .map_err(|e| TabulaError::IoError(format!("Read '{}': {}", path.display(), e)))
}

// =============================================================================
// SETTINGS & DATA FILES
// =============================================================================

/// Grid settings, read from TOML.
///
/// ```toml
/// per_page = 20
/// footer = true
/// sort = "price,down"
///
/// [[columns]]
/// field = "price"
/// label = "Price"
/// type = "toFixed"
/// format = "2"
/// sortable = true
/// aggregate = "sum"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub columns: Vec<Column>,
    pub per_page: usize,
    pub current_page: usize,
    pub footer: bool,
    /// Initial sort as `"field,up"` / `"field,down"`.
    pub sort: Option<String>,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            per_page: DEFAULT_PER_PAGE,
            current_page: DEFAULT_CURRENT_PAGE,
            footer: false,
            sort: None,
        }
    }
}

/// Row data, read from JSON.
///
/// A bare array is the full dataset (client-side). An object with `rows`
/// and `totalRows` is one page of a larger remote dataset (server-side).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DataFile {
    Rows(Vec<Row>),
    Page {
        rows: Vec<Row>,
        #[serde(rename = "totalRows")]
        total_rows: usize,
    },
}

/// Load grid settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<GridSettings, TabulaError> {
    let text = read_input(path, MAX_CONFIG_FILE_SIZE)?;
    toml::from_str(&text)
        .map_err(|e| TabulaError::Config(format!("{}: {}", path.display(), e)))
}

/// Load row data from a JSON file.
pub fn load_data(path: &Path) -> Result<DataFile, TabulaError> {
    let text = read_input(path, MAX_DATA_FILE_SIZE)?;
    serde_json::from_str(&text)
        .map_err(|e| TabulaError::SerializationError(format!("{}: {}", path.display(), e)))
}

/// Build a grid from settings and optional data.
pub fn build_grid(settings: GridSettings, data: Option<DataFile>) -> Result<GridState, TabulaError> {
    let mut config = GridConfig::new(settings.columns, Vec::new())
        .with_per_page(settings.per_page)
        .with_current_page(settings.current_page)
        .with_footer(settings.footer);

    match data {
        Some(DataFile::Rows(rows)) => config.rows = rows,
        Some(DataFile::Page { rows, total_rows }) => {
            config.rows = rows;
            config = config.server_side(total_rows);
        }
        None => {}
    }

    let mut grid = GridState::new(config)?;
    if let Some(sort) = settings.sort.as_deref() {
        apply_sort(&mut grid, sort)?;
    }
    Ok(grid)
}

/// Parse a sort spec and apply it, checking the column exists and is sortable.
pub fn apply_sort(grid: &mut GridState, spec: &str) -> Result<(), TabulaError> {
    let sort: SortSpec = spec.parse()?;

    if let Some(field) = sort.field() {
        let column = grid
            .column(field)
            .ok_or_else(|| TabulaError::UnknownColumn(field.to_string()))?;
        if !column.sortable {
            return Err(TabulaError::InvalidSort(format!(
                "column '{}' is not sortable",
                field
            )));
        }
    }

    grid.set_sort(sort);
    Ok(())
}

/// Load settings and data, and build the grid.
///
/// Server-side grids get a page reader that logs each requested page; the
/// rows for it are expected through the API.
pub fn load_grid(config: &Path, data: Option<&Path>) -> Result<GridState, TabulaError> {
    let settings = load_settings(config)?;
    let data = data.map(load_data).transpose()?;
    let mut grid = build_grid(settings, data)?;

    if grid.is_server_side() {
        grid.set_page_reader(|page: usize| {
            tracing::info!(page, "page requested from data source");
        });
    }

    tracing::info!(
        columns = grid.columns().len(),
        rows = grid.rows().len(),
        total_rows = grid.total_rows(),
        server_side = grid.is_server_side(),
        "grid loaded"
    );
    Ok(grid)
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    config: &Path,
    data: Option<&Path>,
    host: &str,
    port: u16,
) -> Result<(), TabulaError> {
    let grid = load_grid(config, data)?;

    println!("Tabula Grid Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Settings: {:?}", config);
    println!("  Rows:     {}", grid.rows().len());
    println!("  Mode:     {}", mode_name(&grid));
    println!();
    println!("Endpoints:");
    println!("  GET  /health   - Health check");
    println!("  GET  /grid     - Rendered grid snapshot");
    println!("  POST /page     - Go to a page");
    println!("  POST /navigate - next / previous / first / last");
    println!("  POST /sort     - Toggle sort on a column");
    println!("  POST /loading  - Set the loading flag");
    println!("  POST /rows     - Replace rows (server-side pages)");
    println!("  POST /reset    - Clear sort, restore initial page");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, grid).await
}

fn mode_name(grid: &GridState) -> &'static str {
    if grid.is_server_side() {
        "server-side"
    } else {
        "client-side"
    }
}

// =============================================================================
// PAGE COMMAND
// =============================================================================

/// Render one page of the grid.
pub fn cmd_page(
    config: &Path,
    data: Option<&Path>,
    json_mode: bool,
    verbose: bool,
    page: Option<usize>,
    sort: Option<&str>,
) -> Result<(), TabulaError> {
    let mut grid = load_grid(config, data)?;

    if let Some(sort) = sort {
        apply_sort(&mut grid, sort)?;
    }

    let mut outcome = None;
    if let Some(page) = page {
        if page == 0 || page > grid.total_pages().max(1) {
            return Err(TabulaError::InvalidPage(page));
        }
        outcome = Some(grid.change_page(page));
    }

    let snapshot = grid.snapshot();

    if json_mode {
        let output = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| TabulaError::SerializationError(e.to_string()))?;
        println!("{}", output);
        return Ok(());
    }

    print!("{}", render_table(&snapshot));

    if verbose {
        println!();
        println!("Mode:   {}", mode_name(&grid));
        println!("Window: {:?}", grid.window().range());
        if let Some(Navigation::Ignored { reason }) = outcome {
            println!("Page change ignored: {:?}", reason);
        }
    }

    Ok(())
}

// =============================================================================
// COLUMNS COMMAND
// =============================================================================

/// List the configured columns.
pub fn cmd_columns(config: &Path, json_mode: bool) -> Result<(), TabulaError> {
    let settings = load_settings(config)?;

    if json_mode {
        let output = serde_json::to_string_pretty(&settings.columns)
            .map_err(|e| TabulaError::SerializationError(e.to_string()))?;
        println!("{}", output);
        return Ok(());
    }

    println!("Tabula Columns");
    println!("==============");
    for column in &settings.columns {
        let aggregate = column
            .aggregate
            .map(|a| format!("{:?}", a).to_lowercase())
            .unwrap_or_else(|| "-".to_string());
        let width = column
            .width
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<20} {:<20} type={:<15} sortable={:<5} aggregate={:<4} width={}",
            column.field,
            column.label,
            column.kind.as_str(),
            column.sortable,
            aggregate,
            width
        );
    }

    Ok(())
}

// =============================================================================
// TEXT RENDERING
// =============================================================================

/// Render a snapshot as a plain-text table with a page summary.
pub fn render_table(snapshot: &GridSnapshot) -> String {
    let headers: Vec<String> = snapshot
        .columns
        .iter()
        .map(|c| {
            let label = if c.label.is_empty() { &c.field } else { &c.label };
            format!("{}{}", label, c.sorted.indicator.arrow())
        })
        .collect();

    let footer: Option<Vec<String>> = (snapshot.footer && !snapshot.aggregates.is_empty()).then(|| {
        snapshot
            .columns
            .iter()
            .map(|c| {
                snapshot
                    .aggregates
                    .get(&c.field)
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            })
            .collect()
    });

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for line in snapshot.rows.iter().chain(footer.iter()) {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect();
        padded.join(" | ").trim_end().to_string()
    };
    let separator = widths
        .iter()
        .map(|&w| "-".repeat(w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut out = String::new();
    out.push_str(&format_line(&headers));
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    for row in &snapshot.rows {
        out.push_str(&format_line(row));
        out.push('\n');
    }
    if let Some(footer) = &footer {
        out.push_str(&separator);
        out.push('\n');
        out.push_str(&format_line(footer));
        out.push('\n');
    }

    out.push('\n');
    if snapshot.total_rows == 0 {
        out.push_str("No rows\n");
        return out;
    }

    out.push_str(&format!(
        "Rows {}-{} of {} | Page {} of {}\n",
        snapshot.start_index + 1,
        snapshot.end_index,
        snapshot.total_rows,
        snapshot.current_page,
        snapshot.total_pages
    ));

    let pages: Vec<String> = snapshot
        .pagination_window
        .iter()
        .map(|&index| {
            if index + 1 == snapshot.current_page {
                format!("[{}]", index + 1)
            } else {
                (index + 1).to_string()
            }
        })
        .collect();
    out.push_str(&format!("Pages: {}\n", pages.join(" ")));

    out
}
