//! # Grid Scenario Tests (S0-S4)
//!
//! End-to-end behavior of a grid through its public API.
//!
//! ## Tiers
//! - S0: Client-side paging
//! - S1: Sorting and cell rendering
//! - S2: Pagination window
//! - S3: Server-side mode
//! - S4: Aggregates and reset

use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tabula_core::{
    AggregateKind, Column, ColumnType, GridConfig, GridState, IgnoreReason, Navigation, Row,
    SortIndicator, SortSpec,
};

fn numbered_rows(count: usize) -> Vec<Row> {
    (1..=count)
        .map(|i| Row::new().with("id", i as u64))
        .collect()
}

fn row(value: serde_json::Value) -> Row {
    Row::from_value(value).expect("object")
}

fn visible_ids(grid: &GridState) -> Vec<u64> {
    grid.visible_rows()
        .iter()
        .filter_map(|r| r.get("id").and_then(|v| v.as_u64()))
        .collect()
}

// =============================================================================
// TIER S0: CLIENT-SIDE PAGING
// =============================================================================

mod s0_client_paging {
    use super::*;

    fn grid() -> GridState {
        GridState::new(GridConfig::new(
            vec![Column::new("id", "ID")],
            numbered_rows(25),
        ))
        .expect("grid")
    }

    /// S0.1: 25 rows at 10 per page make 3 pages; page 1 shows rows 1-10.
    #[test]
    fn first_page() {
        let grid = grid();
        assert_eq!(grid.total_pages(), 3);
        assert_eq!(visible_ids(&grid), (1..=10).collect::<Vec<_>>());
        assert!(grid.has_next_page());
        assert!(!grid.has_previous_page());
    }

    /// S0.2: Page 3 shows rows 21-25 and has no next page.
    #[test]
    fn last_partial_page() {
        let mut grid = grid();
        assert_eq!(grid.change_page(3), Navigation::Moved { from: 1, to: 3 });
        assert_eq!(grid.start_index(), 20);
        assert_eq!(grid.end_index(), 25);
        assert_eq!(visible_ids(&grid), (21..=25).collect::<Vec<_>>());
        assert!(!grid.has_next_page());
        assert!(grid.has_previous_page());
    }

    /// S0.3: Out-of-range targets are ignored.
    #[test]
    fn out_of_range_ignored() {
        let mut grid = grid();
        assert_eq!(
            grid.change_page(9),
            Navigation::Ignored {
                reason: IgnoreReason::OutOfRange
            }
        );
        assert_eq!(grid.current_page(), 1);
    }

    /// S0.4: Zero rows means zero pages and frozen navigation.
    #[test]
    fn empty_grid() {
        let mut grid = GridState::new(GridConfig::default()).expect("grid");
        assert_eq!(grid.total_pages(), 0);
        assert!(grid.visible_rows().is_empty());
        assert!(grid.pagination_window().is_empty());
        assert_eq!(
            grid.next_page(),
            Navigation::Ignored {
                reason: IgnoreReason::NoNextPage
            }
        );
        assert_eq!(
            grid.change_page(1),
            Navigation::Ignored {
                reason: IgnoreReason::SinglePage
            }
        );
    }
}

// =============================================================================
// TIER S1: SORTING AND CELL RENDERING
// =============================================================================

mod s1_sorting_and_cells {
    use super::*;

    /// S1.1: Sorting by a nested path orders rows by the nested value.
    #[test]
    fn nested_path_sort() {
        let column = Column::new("user.age", "Age").sortable();
        let rows = vec![
            row(json!({"id": 1, "user": {"age": 40}})),
            row(json!({"id": 2, "user": {"age": 25}})),
        ];
        let mut grid = GridState::new(GridConfig::new(vec![column.clone()], rows)).expect("grid");

        assert!(grid.toggle_sort(&column));
        assert_eq!(visible_ids(&grid), vec![2, 1]);
        assert_eq!(grid.resolve_cell_value(grid.visible_rows()[0], &column), "25");

        let sorted = grid.is_column_sorted(&column);
        assert!(sorted.is_active);
        assert_eq!(sorted.indicator, SortIndicator::Up);
        assert_eq!(sorted.indicator.icon(), "mdi mdi-arrow-up-thin");
    }

    /// S1.2: A missing nested path renders the placeholder.
    #[test]
    fn missing_path_placeholder() {
        let column = Column::new("user.age", "Age");
        let grid = GridState::new(GridConfig::new(
            vec![column.clone()],
            vec![row(json!({"user": {}}))],
        ))
        .expect("grid");
        assert_eq!(grid.resolve_cell_value(&grid.rows()[0], &column), "-");
    }

    /// S1.3: Unsortable columns ignore toggles.
    #[test]
    fn unsortable_toggle_is_noop() {
        let column = Column::new("id", "ID");
        let mut grid =
            GridState::new(GridConfig::new(vec![column.clone()], numbered_rows(3))).expect("grid");
        assert!(!grid.toggle_sort(&column));
        assert_eq!(grid.sort(), &SortSpec::Unsorted);
        assert!(!grid.is_column_sorted(&column).is_active);
    }

    /// S1.4: Switching columns restarts at ascending.
    #[test]
    fn switching_column_restarts() {
        let id = Column::new("id", "ID").sortable();
        let name = Column::new("name", "Name").sortable();
        let mut grid =
            GridState::new(GridConfig::new(vec![id.clone(), name.clone()], numbered_rows(3)))
                .expect("grid");

        grid.toggle_sort(&id);
        grid.toggle_sort(&id);
        grid.toggle_sort(&name);
        assert_eq!(grid.sort(), &SortSpec::Ascending("name".into()));
        assert!(!grid.is_column_sorted(&id).is_active);
    }

    /// S1.5: Typed columns go through the formatter.
    #[test]
    fn typed_columns() {
        let date = Column::new("at", "At")
            .with_type(ColumnType::Date)
            .with_format("%d/%m/%Y");
        let fixed = Column::new("price", "Price").with_type(ColumnType::ToFixed);
        let grouped = Column::new("total", "Total").with_type(ColumnType::SeparateNumber);

        let data = row(json!({"at": "2024-03-05", "price": 1.23456, "total": 1234567}));
        let grid = GridState::new(GridConfig::new(
            vec![date.clone(), fixed.clone(), grouped.clone()],
            vec![data.clone()],
        ))
        .expect("grid");

        assert_eq!(grid.resolve_cell_value(&data, &date), "05/03/2024");
        assert_eq!(grid.resolve_cell_value(&data, &fixed), "1.23");
        assert_eq!(grid.resolve_cell_value(&data, &grouped), "1,234,567");
    }
}

// =============================================================================
// TIER S2: PAGINATION WINDOW
// =============================================================================

mod s2_window {
    use super::*;

    fn grid() -> GridState {
        GridState::new(GridConfig::new(
            vec![Column::new("id", "ID")],
            numbered_rows(200),
        ))
        .expect("grid")
    }

    /// S2.1: A fresh 20-page grid exposes the first 8 pages.
    #[test]
    fn initial_window() {
        assert_eq!(grid().pagination_window(), (0..8).collect::<Vec<_>>());
    }

    /// S2.2: Stepping onto the last slot slides the window forward.
    #[test]
    fn forward_slide() {
        let mut grid = grid();
        for _ in 0..7 {
            assert!(grid.next_page().is_moved());
        }
        assert_eq!(grid.pagination_window(), (6..14).collect::<Vec<_>>());
    }

    /// S2.3: Inside the window nothing moves; at the edge it slides and clamps.
    #[test]
    fn slide_clamps_at_total() {
        let mut grid = grid();
        grid.change_page(10);
        assert_eq!(grid.window().range(), 6..14);

        grid.change_page(13);
        assert_eq!(grid.window().range(), 6..14);

        grid.change_page(14);
        assert_eq!(grid.pagination_window(), (12..20).collect::<Vec<_>>());
    }

    /// S2.4: First and last page snap to the ends.
    #[test]
    fn snaps_to_ends() {
        let mut grid = grid();
        grid.last_page();
        assert_eq!(grid.pagination_window(), (12..20).collect::<Vec<_>>());
        grid.first_page();
        assert_eq!(grid.pagination_window(), (0..8).collect::<Vec<_>>());
    }

    /// S2.5: Small page counts show every page.
    #[test]
    fn small_grid_shows_all() {
        let mut grid = GridState::new(GridConfig::new(
            vec![Column::new("id", "ID")],
            numbered_rows(45),
        ))
        .expect("grid");
        grid.change_page(4);
        assert_eq!(grid.pagination_window(), vec![0, 1, 2, 3, 4]);
    }
}

// =============================================================================
// TIER S3: SERVER-SIDE MODE
// =============================================================================

mod s3_server_side {
    use super::*;

    fn counting_grid(loading: bool) -> (GridState, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = GridConfig::new(vec![Column::new("id", "ID")], numbered_rows(10))
            .server_side(95)
            .with_loading(loading);
        let grid = GridState::new(config)
            .expect("grid")
            .with_page_reader(move |_page: usize| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        (grid, calls)
    }

    /// S3.1: The reported total drives paging; rows are not sliced.
    #[test]
    fn reported_total_drives_paging() {
        let (mut grid, calls) = counting_grid(false);
        assert_eq!(grid.total_pages(), 10);

        assert!(grid.change_page(5).is_moved());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(visible_ids(&grid), (1..=10).collect::<Vec<_>>());
        assert_eq!(grid.start_index(), 40);
    }

    /// S3.2: Re-requesting the page being loaded does nothing.
    #[test]
    fn loading_same_page_is_noop() {
        let (mut grid, calls) = counting_grid(true);
        assert_eq!(
            grid.change_page(1),
            Navigation::Ignored {
                reason: IgnoreReason::AlreadyLoading
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(grid.current_page(), 1);
    }

    /// S3.3: Arriving rows replace the page without calling the reader.
    #[test]
    fn rows_arrive_later() {
        let (mut grid, calls) = counting_grid(false);
        grid.next_page();
        grid.set_loading(true);
        grid.set_rows((11..=20).map(|i| Row::new().with("id", i as u64)).collect());
        grid.set_loading(false);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(visible_ids(&grid), (11..=20).collect::<Vec<_>>());
    }

    /// S3.4: A changed total recomputes the page count.
    #[test]
    fn total_update() {
        let (mut grid, _calls) = counting_grid(false);
        grid.set_total_rows(Some(30));
        assert_eq!(grid.total_pages(), 3);
        grid.set_total_rows(None);
        assert_eq!(grid.total_pages(), 1);
    }
}

// =============================================================================
// TIER S4: AGGREGATES AND RESET
// =============================================================================

mod s4_aggregates_and_reset {
    use super::*;

    /// S4.1: Aggregates cover the visible page only.
    #[test]
    fn aggregates_per_page() {
        let columns = vec![
            Column::new("id", "ID")
                .sortable()
                .with_aggregate(AggregateKind::Sum),
            Column::new("score", "Score").with_aggregate(AggregateKind::Avg),
        ];
        let rows: Vec<Row> = (1..=12)
            .map(|i| Row::new().with("id", i as u64).with("score", if i % 2 == 0 { 1 } else { 2 }))
            .collect();
        let mut grid = GridState::new(GridConfig::new(columns, rows).with_per_page(3))
            .expect("grid");

        let aggregates = grid.aggregates();
        assert_eq!(aggregates.get("id"), Some(6.0));
        assert_eq!(aggregates.get("score"), Some(1.67));

        grid.last_page();
        assert_eq!(grid.aggregates().get("id"), Some(33.0));
    }

    /// S4.2: Reset clears the sort and restores the configured page.
    #[test]
    fn reset_restores_initial_state() {
        let column = Column::new("id", "ID").sortable();
        let config = GridConfig::new(vec![column.clone()], numbered_rows(100)).with_current_page(2);
        let mut grid = GridState::new(config).expect("grid");

        grid.toggle_sort(&column);
        grid.change_page(7);
        grid.reset();

        assert_eq!(grid.current_page(), 2);
        assert!(grid.sort().is_unsorted());
        assert_eq!(visible_ids(&grid), (11..=20).collect::<Vec<_>>());
    }

    /// S4.3: Snapshots agree with the live accessors.
    #[test]
    fn snapshot_matches_state() {
        let mut grid = GridState::new(GridConfig::new(
            vec![Column::new("id", "ID")],
            numbered_rows(25),
        ))
        .expect("grid");
        grid.next_page();

        let snapshot = grid.snapshot();
        assert_eq!(snapshot.current_page, 2);
        assert_eq!(snapshot.start_index, 10);
        assert_eq!(snapshot.end_index, 20);
        assert_eq!(snapshot.rows.len(), 10);
        assert_eq!(snapshot.rows[0], vec!["11".to_string()]);
        assert_eq!(snapshot.pagination_window, vec![0, 1, 2]);
    }
}
