//! Reading orders and cursor directions for match navigation.

/// Which grid axis is primary when ordering matches.
///
/// - `Horizontal`: row-major reading order (row first, then column)
/// - `Vertical`: column-major reading order (column first, then row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPolicy {
    /// Row-major order.
    #[default]
    Horizontal,
    /// Column-major order.
    Vertical,
}

/// Cursor movement direction between matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationDirection {
    /// Towards later matches.
    #[default]
    Forward,
    /// Towards earlier matches.
    Backward,
}

/// Grid position used as a navigation anchor.
///
/// Signed and unbounded so that anchors may sit one step before the first
/// row/column or at the far end of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub row: i64,
    pub column: i64,
}

impl Anchor {
    /// Anchor used by forward navigation with nothing selected.
    pub const START: Anchor = Anchor { row: 0, column: 0 };
    /// Anchor used by backward navigation with nothing selected.
    pub const END: Anchor = Anchor {
        row: i64::MAX,
        column: i64::MAX,
    };

    pub fn at(row: usize, column: usize) -> Self {
        Self {
            row: coordinate(row),
            column: coordinate(column),
        }
    }
}

fn coordinate(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

impl ScrollPolicy {
    /// Move `anchor` one step along this policy's stepping axis.
    ///
    /// Vertical scrolling steps the row, horizontal scrolling steps the column.
    pub(crate) fn step(self, anchor: Anchor, delta: i64) -> Anchor {
        match self {
            ScrollPolicy::Vertical => Anchor {
                row: anchor.row.saturating_add(delta),
                ..anchor
            },
            ScrollPolicy::Horizontal => Anchor {
                column: anchor.column.saturating_add(delta),
                ..anchor
            },
        }
    }

    /// Sort key of `(row, column)` in this reading order.
    pub(crate) fn reading_key(self, row: usize, column: usize) -> (usize, usize) {
        match self {
            ScrollPolicy::Horizontal => (row, column),
            ScrollPolicy::Vertical => (column, row),
        }
    }

    /// True if `(row, column)` is at or after `from` in this reading order.
    pub(crate) fn is_at_or_after(self, row: usize, column: usize, from: Anchor) -> bool {
        let (row, column) = (coordinate(row), coordinate(column));
        match self {
            ScrollPolicy::Horizontal => {
                row > from.row || (row == from.row && column >= from.column)
            }
            ScrollPolicy::Vertical => {
                column > from.column || (column == from.column && row >= from.row)
            }
        }
    }

    /// True if `(row, column)` is at or before `from` in this reading order.
    pub(crate) fn is_at_or_before(self, row: usize, column: usize, from: Anchor) -> bool {
        let (row, column) = (coordinate(row), coordinate(column));
        match self {
            ScrollPolicy::Horizontal => {
                row < from.row || (row == from.row && column <= from.column)
            }
            ScrollPolicy::Vertical => {
                column < from.column || (column == from.column && row <= from.row)
            }
        }
    }
}
