//! Error types for signal file access.

use lib_types::SignalError;
use thiserror::Error;

/// Errors that can occur while reading or writing signal files.
#[derive(Debug, Error)]
pub enum FormatError {
    /// No path was given.
    #[error("Empty file path")]
    EmptyPath,

    /// I/O error reading or writing the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// One of the three header lines is missing or malformed.
    #[error("Invalid header at line {line}: {message}")]
    Header { line: usize, message: String },

    /// A sample line is not a list of floats.
    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A sample line has the wrong number of columns for its domain.
    #[error("Line {line}: expected {expected} columns, got {actual}")]
    ColumnCount {
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// Fewer sample lines than the header declares.
    #[error("Header declares {expected} samples, file holds {actual}")]
    SampleCount { expected: usize, actual: usize },

    /// Parsed data does not form a valid signal.
    #[error("Invalid signal data: {0}")]
    Signal(#[from] SignalError),
}

impl FormatError {
    /// Create a header error at a specific line.
    pub fn header(line: usize, message: impl Into<String>) -> Self {
        Self::Header {
            line,
            message: message.into(),
        }
    }

    /// Create a syntax error at a specific line.
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}

/// Result type for file operations.
pub type FormatResult<T> = Result<T, FormatError>;
