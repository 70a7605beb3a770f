//! Error types for DSP operations.

use lib_types::SignalError;
use thiserror::Error;

/// Errors that can occur during DSP operations.
#[derive(Debug, Error)]
pub enum DspError {
    /// Operand signals have the wrong domain or incompatible shapes.
    #[error(transparent)]
    Signal(#[from] SignalError),

    /// No catalog window reaches the requested stopband attenuation.
    #[error("No window found for stopband attenuation {attenuation} dB (strongest window gives {strongest} dB)")]
    NoWindow { attenuation: f64, strongest: f64 },

    /// Filter class needs a cutoff that was not supplied.
    #[error("{class} filter requires {name}")]
    MissingCutoff {
        class: &'static str,
        name: &'static str,
    },

    /// Parameter outside its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Smoothing window longer than the signal.
    #[error("Window size {window} exceeds sample count {samples}")]
    WindowTooLarge { window: usize, samples: usize },

    /// Resampling factor must be at least 1.
    #[error("Invalid {name} factor: {value} (must be at least 1)")]
    InvalidFactor { name: &'static str, value: usize },

    /// Numerical instability detected.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

/// Result type for DSP operations.
pub type DspResult<T> = Result<T, DspError>;
