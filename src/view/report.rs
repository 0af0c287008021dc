//! Printable summary of a search result.
//!
//! Used by the binary to show what a scan found: one line per matched cell
//! with marked text, followed by the selection after each cursor move.

use crate::grid::DataGrid;
use crate::model::{CellRef, SearchMatch};
use crate::state::SearchResult;
use crate::view::highlight::{highlight_cell, render_marked};
use serde::Serialize;
use std::io::{self, Write};

/// One matched cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellReport {
    /// The matched cell.
    pub cell: CellRef,
    /// Cell text with matches marked.
    pub marked: String,
    /// `(start, end)` byte offsets of the cell's matches.
    pub offsets: Vec<(usize, usize)>,
}

/// Everything the binary prints about a finished scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    /// Query text as entered.
    pub query: String,
    /// Generation of the scan that produced the result.
    pub generation: u64,
    /// Number of published matches.
    pub match_count: usize,
    /// Whether the scan stopped at the match limit.
    pub truncated: bool,
    /// Selection made when the scan completed.
    pub selected: Option<SearchMatch>,
    /// Matched cells in reading order.
    pub cells: Vec<CellReport>,
    /// Selection after each cursor move, in order.
    pub moves: Vec<Option<SearchMatch>>,
}

impl SearchReport {
    /// Snapshot `result` against the text currently in `grid`.
    pub fn build(query: &str, result: &SearchResult, grid: &dyn DataGrid) -> Self {
        let matches = result.matches();
        let mut cells: Vec<CellReport> = Vec::new();
        let mut row_cache: Option<(usize, Vec<String>)> = None;

        for m in matches.iter() {
            if cells.last().is_some_and(|last| last.cell == m.cell()) {
                continue;
            }
            let row = m.row_index();
            if row_cache.as_ref().map(|(cached, _)| *cached) != Some(row) {
                let texts = grid
                    .row_cells(row)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|cell| cell.text)
                    .collect();
                row_cache = Some((row, texts));
            }
            let text = row_cache
                .as_ref()
                .and_then(|(_, texts)| texts.get(m.column_index()))
                .map(String::as_str)
                .unwrap_or_default();

            cells.push(CellReport {
                cell: m.cell(),
                marked: render_marked(&highlight_cell(result, m.cell(), text)),
                offsets: result
                    .matches_for_cell(m.cell())
                    .map(|cell_matches| {
                        cell_matches
                            .map(|m| (m.start_offset(), m.end_offset()))
                            .collect()
                    })
                    .unwrap_or_default(),
            });
        }

        Self {
            query: query.to_string(),
            generation: result.generation(),
            match_count: matches.len(),
            truncated: result.is_truncated(),
            selected: result.selected(),
            cells,
            moves: Vec::new(),
        }
    }

    /// Append the selection reached by one cursor move.
    pub fn record_move(&mut self, selection: Option<SearchMatch>) {
        self.moves.push(selection);
    }

    /// Write the report as human-readable text.
    pub fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        let noun = if self.match_count == 1 { "match" } else { "matches" };
        write!(out, "{} {} for \"{}\"", self.match_count, noun, self.query)?;
        if self.truncated {
            write!(out, " (limit reached)")?;
        }
        writeln!(out)?;

        for cell in &self.cells {
            writeln!(out, "{}: {}", cell.cell, cell.marked)?;
        }

        if let Some(selected) = self.selected {
            writeln!(out, "selected {}", describe(selected))?;
        }
        for (step, selection) in self.moves.iter().enumerate() {
            match selection {
                Some(m) => writeln!(out, "move {}: {}", step + 1, describe(*m))?,
                None => writeln!(out, "move {}: no match", step + 1)?,
            }
        }
        Ok(())
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, out: &mut impl Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }
}

fn describe(m: SearchMatch) -> String {
    format!("{} at {}..{}", m.cell(), m.start_offset(), m.end_offset())
}
