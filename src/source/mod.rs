//! Grid input sources.
//!
//! A grid is read from delimited text: one row per line, cells separated by a
//! single delimiter character (tab by default). Input comes from a file or,
//! when the path is `-`, from stdin.

use crate::grid::{DataGrid, TableGrid};
use crate::model::error::InputError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Cell delimiter used when none is configured.
pub const DEFAULT_DELIMITER: char = '\t';

/// Where grid text is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A delimited text file.
    File(PathBuf),
    /// Standard input, selected with `-`.
    Stdin,
}

impl InputSource {
    /// Interpret a command-line path argument. `-` selects stdin.
    pub fn from_arg(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.as_os_str() == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(path)
        }
    }

    /// Read the whole source into a grid.
    ///
    /// # Errors
    ///
    /// See [`load_grid`] and [`parse_grid`].
    pub fn load(&self, delimiter: char) -> Result<TableGrid, InputError> {
        match self {
            InputSource::File(path) => load_grid(path, delimiter),
            InputSource::Stdin => parse_grid(io::stdin().lock(), delimiter),
        }
    }
}

/// Load a delimited text file as a grid.
///
/// # Errors
///
/// Returns `InputError::FileNotFound` if `path` does not exist, and otherwise
/// whatever [`parse_grid`] returns.
pub fn load_grid(path: impl AsRef<Path>, delimiter: char) -> Result<TableGrid, InputError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(InputError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path)?;
    let grid = parse_grid(BufReader::new(file), delimiter)?;
    debug!(path = %path.display(), rows = grid.row_count(), "grid loaded");
    Ok(grid)
}

/// Parse delimited text into a grid.
///
/// Line endings (`\n` or `\r\n`) are stripped. A blank line is a row with a
/// single empty cell; rows may have different lengths.
///
/// # Errors
///
/// - `InputError::InvalidUtf8` naming the first line that does not decode
/// - `InputError::EmptyInput` if the reader yields no lines
/// - `InputError::Io` on read failure
pub fn parse_grid<R: BufRead>(mut reader: R, delimiter: char) -> Result<TableGrid, InputError> {
    let mut rows = Vec::new();
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        let line_number = rows.len() + 1;
        let line = std::str::from_utf8(&buffer).map_err(|_| InputError::InvalidUtf8 {
            line: line_number,
        })?;
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        rows.push(line.split(delimiter).map(str::to_string).collect());
    }

    if rows.is_empty() {
        return Err(InputError::EmptyInput);
    }
    Ok(TableGrid::new(rows))
}
