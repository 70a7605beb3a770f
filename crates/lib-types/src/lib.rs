//! # lib-types
//!
//! Core signal data model for the DSP toolkit.
//!
//! This crate provides the containers every other crate in the workspace
//! operates on:
//! - [`Signal`]: a domain-tagged sum type over the two variants
//! - [`TimeSignal`]: `(time, amp)` axes
//! - [`FrequencySignal`]: `(freq, amp, pshift)` axes, optionally backed by raw
//!   DFT harmonics
//!
//! Signals are immutable values. Every operation in `lib-dsp` takes a
//! reference and hands back a fresh container.

pub mod error;
pub mod signal;

pub use error::{SignalError, SignalResult};
pub use signal::*;

/// Re-export num_complex for convenience
pub use num_complex::Complex64;
