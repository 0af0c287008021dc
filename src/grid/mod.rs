//! Grid collaborators.
//!
//! The search engine consumes two things from the surrounding table:
//! - [`DataGrid`]: row-major access to cells and their presentable text, read
//!   from the worker context
//! - [`GridView`]: cursor, geometry and repaint requests, used from the UI
//!   context only

mod headless;
mod table;

pub use headless::{HeadlessView, ViewEvent};
pub use table::TableGrid;

use crate::model::{CellRef, GridCell};

/// Tabular data model scanned by the search.
pub trait DataGrid: Send + Sync {
    /// Number of rows currently in the grid.
    fn row_count(&self) -> usize;

    /// Cells of `row` in column order, or `None` if the row no longer exists.
    ///
    /// The text is what the user sees in the cell; both matching and
    /// highlighting work on it.
    fn row_cells(&self, row: usize) -> Option<Vec<GridCell>>;

    /// Counter bumped on every structural change (rows added or removed).
    ///
    /// A scan compares it against the value it started with to detect that
    /// the grid changed underneath it.
    fn modification_count(&self) -> u64;
}

/// Screen-space rectangle of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl CellRect {
    /// Rectangle with its top-left corner at `x`, `y`.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Grow the rectangle by `horizontal` on the left and right and by
    /// `vertical` on the top and bottom.
    pub fn grow(self, horizontal: i32, vertical: i32) -> Self {
        Self {
            x: self.x - horizontal,
            y: self.y - vertical,
            width: self.width + 2 * horizontal,
            height: self.height + 2 * vertical,
        }
    }
}

/// UI-side view of the grid.
pub trait GridView {
    /// Selected (row, column), `None` for an axis with no selection.
    fn cursor(&self) -> (Option<usize>, Option<usize>);

    /// Screen rectangle occupied by `cell`.
    fn cell_rect(&self, cell: CellRef) -> CellRect;

    /// Redraw `rect`.
    fn repaint(&mut self, rect: CellRect);

    /// Redraw the whole grid.
    fn repaint_all(&mut self);

    /// Scroll so that as much of `rect` as possible is visible.
    fn scroll_rect_to_visible(&mut self, rect: CellRect);

    /// Drop the grid's own cell selection.
    fn clear_selection(&mut self);

    /// Abandon any in-place edit before the highlighted cells change.
    fn cancel_edit_actions(&mut self) {}
}
