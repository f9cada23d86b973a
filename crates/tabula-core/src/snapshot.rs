//! # Grid Snapshot
//!
//! A serializable, fully rendered view of a `GridState`: header indicators,
//! visible cells, pagination and aggregates in one value. Used by the CLI
//! JSON output and the HTTP API.

use crate::aggregate::Aggregates;
use crate::grid::GridState;
use crate::types::{ColumnSorted, ColumnWidth, SortSpec};
use serde::{Deserialize, Serialize};

/// Rendered column header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnHeader {
    pub field: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<ColumnWidth>,
    pub sortable: bool,
    pub sorted: ColumnSorted,
}

/// Rendered state of a grid at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub current_page: usize,
    pub per_page: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub server_side: bool,
    pub loading: bool,
    pub footer: bool,
    pub sort: SortSpec,
    /// 0-based page indices.
    pub pagination_window: Vec<usize>,
    pub columns: Vec<ColumnHeader>,
    /// Visible rows, one rendered string per column.
    pub rows: Vec<Vec<String>>,
    pub aggregates: Aggregates,
}

impl GridSnapshot {
    /// Render the current state of `grid`.
    #[must_use]
    pub fn capture(grid: &GridState) -> Self {
        let columns = grid
            .columns()
            .iter()
            .map(|column| ColumnHeader {
                field: column.field.clone(),
                label: column.label.clone(),
                width: grid.column_width(column).cloned(),
                sortable: column.sortable,
                sorted: grid.is_column_sorted(column),
            })
            .collect();

        let rows = grid
            .visible_rows()
            .into_iter()
            .map(|row| {
                grid.columns()
                    .iter()
                    .map(|column| grid.resolve_cell_value(row, column))
                    .collect()
            })
            .collect();

        Self {
            current_page: grid.current_page(),
            per_page: grid.per_page(),
            total_rows: grid.total_rows(),
            total_pages: grid.total_pages(),
            start_index: grid.start_index(),
            end_index: grid.end_index(),
            has_next_page: grid.has_next_page(),
            has_previous_page: grid.has_previous_page(),
            server_side: grid.is_server_side(),
            loading: grid.is_loading(),
            footer: grid.show_footer(),
            sort: grid.sort().clone(),
            pagination_window: grid.pagination_window(),
            columns,
            rows,
            aggregates: grid.aggregates(),
        }
    }
}

impl GridState {
    /// Capture a rendered snapshot of the grid.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::types::{AggregateKind, Column, ColumnType, Row, SortIndicator};
    use serde_json::json;

    fn grid() -> GridState {
        let columns = vec![
            Column::new("name", "Name").sortable(),
            Column::new("price", "Price")
                .with_width(ColumnWidth::Pixels(80))
                .with_type(ColumnType::ToFixed)
                .with_format("1")
                .with_aggregate(AggregateKind::Sum),
        ];
        let rows = vec![
            Row::new().with("name", "b").with("price", 2.24),
            Row::new().with("name", "a").with("price", 1),
            Row::new().with("name", "").with("price", 4),
        ];
        GridState::new(
            GridConfig::new(columns, rows)
                .with_per_page(2)
                .with_footer(true),
        )
        .expect("grid")
    }

    #[test]
    fn captures_rendered_page() {
        let mut grid = grid();
        let name = grid.column("name").cloned().expect("column");
        grid.toggle_sort(&name);

        let snapshot = grid.snapshot();
        assert_eq!(snapshot.total_rows, 3);
        assert_eq!(snapshot.total_pages, 2);
        assert_eq!(snapshot.pagination_window, vec![0, 1]);
        assert!(snapshot.footer);
        assert_eq!(snapshot.sort, SortSpec::Ascending("name".into()));
        assert_eq!(snapshot.columns[0].sorted.indicator, SortIndicator::Up);
        assert!(!snapshot.columns[1].sorted.is_active);

        // Blank names sort last.
        assert_eq!(
            snapshot.rows,
            vec![
                vec!["a".to_string(), "1.0".to_string()],
                vec!["b".to_string(), "2.2".to_string()],
            ]
        );
        assert_eq!(snapshot.aggregates.get("price"), Some(3.24));
    }

    #[test]
    fn serializes_snake_case() {
        let value = serde_json::to_value(grid().snapshot()).expect("serialize");
        assert_eq!(value["current_page"], json!(1));
        assert_eq!(value["has_next_page"], json!(true));
        assert_eq!(value["sort"], json!(""));
        assert!(value["columns"][0].get("width").is_none());
        assert_eq!(value["columns"][1]["width"], json!(80));
    }
}
