//! A single query occurrence inside a grid cell.

use crate::model::CellRef;
use serde::Serialize;

/// One occurrence of the query inside a cell's presentable text.
///
/// Offsets are byte offsets into the text the scan saw, `start_offset` inclusive
/// and `end_offset` exclusive. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SearchMatch {
    cell: CellRef,
    start_offset: usize,
    end_offset: usize,
}

impl SearchMatch {
    /// Record a match of `start_offset..end_offset` in `cell`.
    pub fn new(cell: CellRef, start_offset: usize, end_offset: usize) -> Self {
        debug_assert!(start_offset <= end_offset, "match offsets out of order");
        Self {
            cell,
            start_offset,
            end_offset,
        }
    }

    /// Cell the match was found in.
    pub fn cell(&self) -> CellRef {
        self.cell
    }

    /// Byte offset of the first matched byte.
    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    /// Byte offset one past the last matched byte.
    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    /// Row of the matched cell.
    pub fn row_index(&self) -> usize {
        self.cell.row_index()
    }

    /// Column of the matched cell.
    pub fn column_index(&self) -> usize {
        self.cell.column_index()
    }
}
