//! Search state and its orchestration.
//!
//! - [`SearchResult`]: the generation-tagged match set and selection
//! - [`ScanToken`]: a scan's handle on its generation
//! - [`ScanScheduler`]: single-slot worker scheduling
//! - [`SearchController`]: scans on the worker context, selection on the UI context

pub mod controller;
pub mod scheduler;
pub mod search_result;
pub mod token;

// Re-export for convenience
pub use controller::{ScanCompletion, SearchController};
pub use scheduler::{JobHandle, ScanScheduler};
pub use search_result::{CellMatches, SearchResult, SearchResultListener};
pub use token::{FinishGuard, ScanToken};
