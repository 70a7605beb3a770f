//! # lib-sigfile
//!
//! Reader and writer for the plain-text signal file format.
//!
//! ```text
//! 0            <- domain code (0 = time, 1 = frequency)
//! 0            <- periodic flag
//! 3            <- sample count N
//! 0 1.0        <- N sample lines, 2 columns (time) or 3 (frequency)
//! 1 2.0
//! 2 3.0
//! ```
//!
//! The parser is built with `nom`, one line at a time so that every error
//! carries the line it was found on.

pub mod error;
pub mod format;

pub use error::{FormatError, FormatResult};
pub use format::{
    format_value, parse_signal, read_signal, save_rows, save_signal, write_rows, write_signal,
};

use lib_types::{Signal, TimeSignal};
use std::path::Path;

/// File access for signal containers.
///
/// Bring this trait into scope to call `Signal::read(path)` and
/// `signal.save(path)`.
pub trait SignalFile: Sized {
    /// Read a signal file.
    fn read(path: impl AsRef<Path>) -> FormatResult<Self>;

    /// Write the signal in the same layout [`SignalFile::read`] accepts.
    fn save(&self, path: impl AsRef<Path>) -> FormatResult<()>;
}

impl SignalFile for Signal {
    fn read(path: impl AsRef<Path>) -> FormatResult<Self> {
        read_signal(path.as_ref())
    }

    fn save(&self, path: impl AsRef<Path>) -> FormatResult<()> {
        save_signal(self, path.as_ref())
    }
}

impl SignalFile for TimeSignal {
    /// Read a file that must hold a time-domain signal.
    fn read(path: impl AsRef<Path>) -> FormatResult<Self> {
        match read_signal(path.as_ref())? {
            Signal::Time(s) => Ok(s),
            other => Err(FormatError::Signal(lib_types::SignalError::DomainMismatch {
                expected: lib_types::Domain::Time,
                actual: other.domain(),
            })),
        }
    }

    fn save(&self, path: impl AsRef<Path>) -> FormatResult<()> {
        save_signal(&Signal::Time(self.clone()), path.as_ref())
    }
}
