//! Grid cell handles.

use serde::Serialize;
use std::fmt;

/// Handle identifying one grid cell.
///
/// Two handles are equal when they point at the same row and column. The
/// search result uses this equality as the grouping key for matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellRef {
    row: usize,
    column: usize,
}

impl CellRef {
    /// Handle for the cell at `row`, `column` (both 0-based).
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// 0-based row.
    pub const fn row_index(&self) -> usize {
        self.row
    }

    /// 0-based column.
    pub const fn column_index(&self) -> usize {
        self.column
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A cell together with its presentable text, as yielded by a grid row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    /// Position of the cell.
    pub cell: CellRef,
    /// Text as displayed in the cell.
    pub text: String,
}

impl GridCell {
    /// Pair `cell` with its text.
    pub fn new(cell: CellRef, text: impl Into<String>) -> Self {
        Self {
            cell,
            text: text.into(),
        }
    }
}
