//! Presentation of search results (pure).
//!
//! - [`highlight`]: styled segments for one cell, for any renderer
//! - [`report`]: the binary's text and JSON output

pub mod highlight;
pub mod report;

pub use highlight::{highlight_cell, render_marked, Segment, SegmentStyle};
pub use report::{CellReport, SearchReport};
