//! Domain model types (pure).
//!
//! Plain values shared by the search state, the grid collaborators and the views.

pub mod cell;
pub mod error;
pub mod navigation;
pub mod search_match;

// Re-export for convenience
pub use cell::{CellRef, GridCell};
pub use error::{AppError, InputError, QueryError, ScanAbort, ScheduleError};
pub use navigation::{NavigationDirection, ScrollPolicy};
pub use search_match::SearchMatch;
