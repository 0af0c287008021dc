//! Per-cell match highlighting.
//!
//! Splits a cell's presentable text into styled segments. Match offsets are
//! clamped to the text, so a cell whose text changed since the scan still
//! renders without panicking.

use crate::model::CellRef;
use crate::state::SearchResult;

/// How a segment should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStyle {
    /// Text outside any match.
    Plain,
    /// Match in a cell without the selection.
    Match,
    /// Match in the cell that holds the current selection.
    SelectedMatch,
}

/// A run of cell text with a single style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Slice of the cell text.
    pub text: &'a str,
    /// How to draw `text`.
    pub style: SegmentStyle,
}

impl<'a> Segment<'a> {
    fn new(text: &'a str, style: SegmentStyle) -> Self {
        Self { text, style }
    }
}

/// Largest char boundary of `text` not after `offset`.
fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Split `text` (the presentable value of `cell`) into plain and match segments.
///
/// Every match of the cell is styled `SelectedMatch` when the selection lies
/// in this cell, `Match` otherwise. Empty segments are omitted.
pub fn highlight_cell<'a>(result: &SearchResult, cell: CellRef, text: &'a str) -> Vec<Segment<'a>> {
    let Some(matches) = result.matches_for_cell(cell) else {
        return if text.is_empty() {
            Vec::new()
        } else {
            vec![Segment::new(text, SegmentStyle::Plain)]
        };
    };

    let match_style = if result.selected().is_some_and(|m| m.cell() == cell) {
        SegmentStyle::SelectedMatch
    } else {
        SegmentStyle::Match
    };

    let mut segments = Vec::new();
    let mut last_end = 0;
    for m in matches {
        let start = floor_boundary(text, m.start_offset()).max(last_end);
        let end = floor_boundary(text, m.end_offset()).max(start);
        if start > last_end {
            segments.push(Segment::new(&text[last_end..start], SegmentStyle::Plain));
        }
        if end > start {
            segments.push(Segment::new(&text[start..end], match_style));
        }
        last_end = end;
    }
    if last_end < text.len() {
        segments.push(Segment::new(&text[last_end..], SegmentStyle::Plain));
    }
    segments
}

/// Render segments as plain text, marking matches with `[..]` and selected
/// matches with `>>..<<`.
pub fn render_marked(segments: &[Segment<'_>]) -> String {
    let mut rendered = String::new();
    for segment in segments {
        match segment.style {
            SegmentStyle::Plain => rendered.push_str(segment.text),
            SegmentStyle::Match => {
                rendered.push('[');
                rendered.push_str(segment.text);
                rendered.push(']');
            }
            SegmentStyle::SelectedMatch => {
                rendered.push_str(">>");
                rendered.push_str(segment.text);
                rendered.push_str("<<");
            }
        }
    }
    rendered
}

#[cfg(test)]
#[path = "highlight_tests.rs"]
mod tests;
