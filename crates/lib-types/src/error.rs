//! Error types for signal construction and comparison.

use crate::signal::Domain;
use thiserror::Error;

/// Errors raised when signals are built or combined with incompatible shapes.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SignalError {
    /// Operation requires a different signal domain.
    #[error("Signal domain mismatch: expected {expected}, got {actual}")]
    DomainMismatch { expected: Domain, actual: Domain },

    /// Two signals disagree on sample count.
    #[error("Sample count mismatch: expected {expected}, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    /// Two signals disagree on periodicity.
    #[error("Periodicity mismatch: signals must be in the same periodicity")]
    PeriodicityMismatch,

    /// One axis is not as long as the others.
    #[error("Axis '{axis}' has {actual} samples, expected {expected}")]
    AxisLengthMismatch {
        axis: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Signals must hold at least one sample.
    #[error("Signal must contain at least one sample")]
    Empty,

    /// Axis name not known for this domain.
    #[error("Unknown axis '{name}' for {domain} signal")]
    UnknownAxis { name: String, domain: Domain },
}

/// Result type for signal operations.
pub type SignalResult<T> = Result<T, SignalError>;
