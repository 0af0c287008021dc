//! In-memory grid of text cells.

use crate::grid::DataGrid;
use crate::model::{CellRef, GridCell};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Row-major table of strings.
///
/// Rows may have different lengths. Value edits leave the modification count
/// alone; inserting or removing rows bumps it.
#[derive(Debug, Default)]
pub struct TableGrid {
    rows: RwLock<Vec<Vec<String>>>,
    modifications: AtomicU64,
}

impl TableGrid {
    /// Grid over `rows`, each a list of cell values.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: RwLock::new(rows),
            modifications: AtomicU64::new(0),
        }
    }

    /// Build a grid from any nested iterable of string-like values.
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.read().iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Raw value of `cell`, line breaks included.
    pub fn cell_text(&self, cell: CellRef) -> Option<String> {
        self.rows
            .read()
            .get(cell.row_index())
            .and_then(|row| row.get(cell.column_index()))
            .cloned()
    }

    /// Replace the value of an existing cell. Returns false if it does not exist.
    pub fn set_cell(&self, cell: CellRef, text: impl Into<String>) -> bool {
        let mut rows = self.rows.write();
        match rows
            .get_mut(cell.row_index())
            .and_then(|row| row.get_mut(cell.column_index()))
        {
            Some(value) => {
                *value = text.into();
                true
            }
            None => false,
        }
    }

    /// Append a row.
    pub fn push_row(&self, row: Vec<String>) {
        let mut rows = self.rows.write();
        rows.push(row);
        self.modifications.fetch_add(1, Ordering::AcqRel);
    }

    /// Insert a row before `index` (clamped to the end of the table).
    pub fn insert_row(&self, index: usize, row: Vec<String>) {
        let mut rows = self.rows.write();
        let index = index.min(rows.len());
        rows.insert(index, row);
        self.modifications.fetch_add(1, Ordering::AcqRel);
    }

    /// Remove the row at `index`, returning its values.
    pub fn remove_row(&self, index: usize) -> Option<Vec<String>> {
        let mut rows = self.rows.write();
        if index >= rows.len() {
            return None;
        }
        let removed = rows.remove(index);
        self.modifications.fetch_add(1, Ordering::AcqRel);
        Some(removed)
    }
}

/// Single-line form of a cell value: line breaks show as spaces.
///
/// Byte lengths are preserved, so offsets into it are valid in the raw value.
fn presentable(text: &str) -> String {
    text.replace('\n', " ")
}

impl DataGrid for TableGrid {
    fn row_count(&self) -> usize {
        self.rows.read().len()
    }

    fn row_cells(&self, row: usize) -> Option<Vec<GridCell>> {
        let rows = self.rows.read();
        let cells = rows.get(row)?;
        Some(
            cells
                .iter()
                .enumerate()
                .map(|(column, text)| GridCell::new(CellRef::new(row, column), presentable(text)))
                .collect(),
        )
    }

    fn modification_count(&self) -> u64 {
        self.modifications.load(Ordering::Acquire)
    }
}
