//! # Grid Primitives
//!
//! Fixed constants of the grid engine. These are compiled in and never
//! change at runtime; configuration only chooses values *within* them.

/// Maximum number of page links exposed by the pagination window.
///
/// The window slides in half-window jumps once the page count exceeds it.
pub const MAX_WINDOW_SIZE: usize = 8;

/// Default page size when the configuration does not provide one.
pub const DEFAULT_PER_PAGE: usize = 10;

/// Pages are 1-based; a fresh grid starts here.
pub const DEFAULT_CURRENT_PAGE: usize = 1;

/// Precision used by `toFixed` columns whose format is absent or invalid.
pub const DEFAULT_PRECISION: usize = 2;

/// Decimal places kept for fractional aggregate results.
pub const AGGREGATE_PRECISION: usize = 2;

/// Rendered in place of falsy values in untyped columns.
pub const EMPTY_PLACEHOLDER: &str = "-";

/// Separator between segments of a nested field path (`"user.address.city"`).
pub const PATH_SEPARATOR: char = '.';

/// Separator in the serialized sort spec (`"price,up"`).
pub const SORT_SEPARATOR: char = ',';

/// strftime pattern used by date columns without a format.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Group separator used by `separateNumber` columns without a format.
pub const DEFAULT_THOUSANDS_SEPARATOR: &str = ",";

/// Icon class for an ascending sort indicator.
pub const ICON_SORT_UP: &str = "mdi mdi-arrow-up-thin";

/// Icon class for a descending sort indicator.
pub const ICON_SORT_DOWN: &str = "mdi mdi-arrow-down-thin";
