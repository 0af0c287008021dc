//! Error types for gridfind.
//!
//! Errors are grouped by concern and composed with `thiserror`:
//!
//! - [`AppError`] - Top-level error returned by the binary
//!   - [`InputError`] - Reading a grid from a file or reader
//!   - [`QueryError`] - Turning a query into a usable pattern
//!   - [`ScheduleError`] - Starting a background scan
//!   - [`crate::config::ConfigError`] / [`crate::logging::LoggingError`]
//! - [`ScanAbort`] - Internal cancellation signal of a background scan
//!
//! # Scan aborts
//!
//! `ScanAbort` never reaches a user. A scan that observes one stops
//! immediately, skips publication and leaves the previous state to the newer
//! scan. The only visible effect is that the result does not update.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to load the grid.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// Query could not be compiled.
    #[error("Invalid query: {0}")]
    Query(#[from] QueryError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Background scan could not be started.
    #[error("Search error: {0}")]
    Schedule(#[from] ScheduleError),

    /// The scan stopped without publishing a result.
    #[error("Search was aborted before it completed")]
    ScanAborted,

    /// Writing the report failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors encountered when reading a grid from a file or reader.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified grid file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use gridfind::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.tsv")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.tsv"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was attempted.
        path: PathBuf,
    },

    /// A line of the input is not valid UTF-8.
    #[error("Line {line} is not valid UTF-8")]
    InvalidUtf8 {
        /// 1-based line number.
        line: usize,
    },

    /// The input produced no rows.
    #[error("No rows in input")]
    EmptyInput,

    /// Generic I/O failure while reading.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while preparing a query for matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Query text is empty or whitespace-only.
    #[error("Query must not be empty")]
    Empty,

    /// Query (or its literal escape) did not compile to a pattern.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern handed to the regex engine.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
}

/// Failure to hand a scan to the worker context.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The worker thread could not be spawned.
    #[error("Failed to start scan worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Reasons a background scan stops without publishing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScanAbort {
    /// A newer scan started on the same result.
    #[error("Scan generation {expected} is stale (current generation is {current})")]
    StaleGeneration {
        /// Generation the scan was started with.
        expected: u64,
        /// Generation the result holds now.
        current: u64,
    },

    /// The grid changed structurally while being scanned.
    #[error("Grid changed structurally while scanning row {row}")]
    StructuralConflict {
        /// Row the scan was about to read.
        row: usize,
    },
}
