//! gridfind
//!
//! Incremental search over the cells of a table. A scan runs on a worker
//! thread and publishes a generation-tagged result; the UI side picks it up,
//! selects an initial match and walks the cursor between matches.
//!
//! - [`state`]: the search result, its scans and the controller that drives them
//! - [`grid`]: the table and view collaborators, plus in-memory implementations
//! - [`matcher`]: the find primitive and its regex-backed adapter
//! - [`view`]: highlight segments and printable reports
//! - [`config`], [`logging`], [`source`]: the binary's ambient stack

pub mod config;
pub mod grid;
pub mod logging;
pub mod matcher;
pub mod model;
pub mod source;
pub mod state;
pub mod view;

#[cfg(test)]
mod test_harness;
