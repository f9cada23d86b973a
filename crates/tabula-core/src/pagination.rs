//! # Pagination Window
//!
//! Decides which page numbers are exposed as navigation targets.
//!
//! The window holds at most `MAX_WINDOW_SIZE` page indices (0-based) and is
//! stateful: it remembers where it was and slides in half-window jumps when
//! the current page reaches one of its edges, instead of re-centering on
//! every move.
//!
//! ## Algorithm
//!
//! 1. No pages: window untouched, nothing visible.
//! 2. `total_pages + 1 < MAX_WINDOW_SIZE`: show every page.
//! 3. First page: snap to `[0, min(total, MAX))`.
//!    Last page: snap to `[total - MAX, total)`.
//!    Otherwise slide back (`start + 2 - MAX/2 .. start + 2`) when the current
//!    page is at the start edge, slide forward (`end - 2 .. end + MAX - 2`)
//!    when it is at the end edge.
//!
//! The `+2/-2` offsets keep the current page off the edge after a slide.

use crate::primitives::MAX_WINDOW_SIZE;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Number of pages needed for `total_rows` at `per_page` rows each.
///
/// Zero rows (or a zero page size) means zero pages.
#[must_use]
pub fn total_pages(total_rows: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total_rows.div_ceil(per_page)
}

/// Sliding window of page indices `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationWindow {
    start: usize,
    end: usize,
}

impl Default for PaginationWindow {
    fn default() -> Self {
        Self {
            start: 0,
            end: MAX_WINDOW_SIZE,
        }
    }
}

impl PaginationWindow {
    /// Create a window with explicit bounds.
    ///
    /// `end` is raised to `start` if smaller.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// First page index in the window.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last page index in the window.
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Window bounds as a range.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Check whether a 0-based page index is inside the window.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }

    /// Page indices to expose: the window intersected with `[0, total_pages)`.
    #[must_use]
    pub fn pages(&self, total_pages: usize) -> Vec<usize> {
        (self.start.min(total_pages)..self.end.min(total_pages)).collect()
    }

    /// Move the window for the given 1-based `current_page`.
    ///
    /// Calling this again without a state change leaves the window where it
    /// is, because every slide lands with the current page strictly inside.
    pub fn advance(&mut self, current_page: usize, total_pages: usize) {
        if total_pages == 0 {
            return;
        }

        if total_pages + 1 < MAX_WINDOW_SIZE {
            self.start = 0;
            self.end = total_pages;
            return;
        }

        if current_page <= 1 {
            self.start = 0;
            self.end = total_pages.min(MAX_WINDOW_SIZE);
        } else if current_page >= total_pages {
            self.start = total_pages.saturating_sub(MAX_WINDOW_SIZE);
            self.end = total_pages;
        } else {
            // Jumps farther than one slide repeat the slide until the
            // current page is inside; single steps slide once.
            loop {
                if current_page <= self.start + 1 && self.start > 0 {
                    let start = self.start;
                    self.start = (start + 2).saturating_sub(MAX_WINDOW_SIZE / 2);
                    self.end = start + 2;
                } else if current_page >= self.end {
                    let end = self.end;
                    self.start = end.saturating_sub(2);
                    self.end = (end + MAX_WINDOW_SIZE - 2).min(total_pages);
                } else {
                    break;
                }
            }
        }

        self.end = self.end.min(total_pages);
        self.start = self.start.min(self.end);
    }
}

// =============================================================================
// TESTS
// =============================================================================
