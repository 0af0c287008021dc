//! Shared fixtures for unit tests.

use crate::grid::TableGrid;
use crate::matcher::{RegexMatcher, SearchQuery};
use crate::state::{SearchController, SearchResult};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound for anything a test waits on.
pub const TIMEOUT: Duration = Duration::from_secs(5);

pub fn grid(rows: &[&[&str]]) -> Arc<TableGrid> {
    Arc::new(TableGrid::from_rows(rows.iter().map(|row| row.iter().copied())))
}

/// 3×3 grid with "foo bar foo" in the middle cell and fillers elsewhere.
pub fn three_by_three() -> Arc<TableGrid> {
    grid(&[
        &["alpha", "", "bar"],
        &["", "foo bar foo", "baz"],
        &["qux", "quux", ""],
    ])
}

pub fn query(text: &str) -> SearchQuery {
    SearchQuery::new(text).expect("valid query")
}

/// Controller over `grid` with a fresh result and the regex matcher.
pub fn controller_for(grid: Arc<TableGrid>) -> SearchController {
    SearchController::new(
        grid,
        Arc::new(SearchResult::new()),
        Arc::new(RegexMatcher::new()),
    )
}

/// Poll `condition` until it holds or [`TIMEOUT`] passes.
pub fn wait_until(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}
