//! Grid view without a screen.
//!
//! Lays cells out on a fixed-size lattice and records every UI request it
//! receives. Used by the command-line binary and by tests.

use crate::grid::{CellRect, GridView};
use crate::model::CellRef;

/// Default cell width in pixels.
pub const DEFAULT_CELL_WIDTH: i32 = 80;
/// Default cell height in pixels.
pub const DEFAULT_CELL_HEIGHT: i32 = 20;

/// A UI request recorded by [`HeadlessView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// `repaint` of one rectangle.
    Repaint(CellRect),
    /// `repaint_all`.
    RepaintAll,
    /// `scroll_rect_to_visible`.
    ScrollTo(CellRect),
    /// `clear_selection`.
    ClearSelection,
    /// `cancel_edit_actions`.
    CancelEdit,
}

/// [`GridView`] that records requests instead of drawing.
#[derive(Debug, Clone)]
pub struct HeadlessView {
    cursor: (Option<usize>, Option<usize>),
    cell_width: i32,
    cell_height: i32,
    events: Vec<ViewEvent>,
}

impl Default for HeadlessView {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessView {
    /// View with no cursor and the default cell size.
    pub fn new() -> Self {
        Self {
            cursor: (None, None),
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            events: Vec::new(),
        }
    }

    /// Start with the cursor at `row`, `column`.
    pub fn with_cursor(mut self, row: Option<usize>, column: Option<usize>) -> Self {
        self.cursor = (row, column);
        self
    }

    /// Lay cells out as `width` × `height` pixel boxes.
    pub fn with_cell_size(mut self, width: i32, height: i32) -> Self {
        self.cell_width = width;
        self.cell_height = height;
        self
    }

    /// Move the cursor.
    pub fn set_cursor(&mut self, row: Option<usize>, column: Option<usize>) {
        self.cursor = (row, column);
    }

    /// Requests received so far, oldest first.
    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the log empty.
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    /// Rectangles the view was last asked to scroll into view, oldest first.
    pub fn scroll_targets(&self) -> impl Iterator<Item = CellRect> + '_ {
        self.events.iter().filter_map(|event| match event {
            ViewEvent::ScrollTo(rect) => Some(*rect),
            _ => None,
        })
    }
}

fn pixels(index: usize, size: i32) -> i32 {
    i32::try_from(index)
        .unwrap_or(i32::MAX)
        .saturating_mul(size)
}

impl GridView for HeadlessView {
    fn cursor(&self) -> (Option<usize>, Option<usize>) {
        self.cursor
    }

    fn cell_rect(&self, cell: CellRef) -> CellRect {
        CellRect::new(
            pixels(cell.column_index(), self.cell_width),
            pixels(cell.row_index(), self.cell_height),
            self.cell_width,
            self.cell_height,
        )
    }

    fn repaint(&mut self, rect: CellRect) {
        self.events.push(ViewEvent::Repaint(rect));
    }

    fn repaint_all(&mut self) {
        self.events.push(ViewEvent::RepaintAll);
    }

    fn scroll_rect_to_visible(&mut self, rect: CellRect) {
        self.events.push(ViewEvent::ScrollTo(rect));
    }

    fn clear_selection(&mut self) {
        self.cursor = (None, None);
        self.events.push(ViewEvent::ClearSelection);
    }

    fn cancel_edit_actions(&mut self) {
        self.events.push(ViewEvent::CancelEdit);
    }
}
