//! Window functions for FIR design.
//!
//! The catalog holds four windows ordered by the stopband attenuation they
//! guarantee. A filter picks the first one strong enough for its
//! requirement, and the window's transition width factor then fixes the
//! filter length:
//!
//! | Window      | Attenuation | Factor |
//! |-------------|-------------|--------|
//! | Rectangular | 21 dB       | 0.9    |
//! | Hanning     | 44 dB       | 3.1    |
//! | Hamming     | 53 dB       | 3.3    |
//! | Blackman    | 74 dB       | 5.5    |
//!
//! Responses are evaluated at a signed offset `n` from the filter centre, so
//! `n = 0` is the peak.

use crate::error::{DspError, DspResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Window function types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    /// No tapering.
    Rectangular,

    /// Raised cosine.
    Hanning,

    /// Raised cosine on a 0.08 pedestal.
    Hamming,

    /// Three-term cosine sum.
    Blackman,
}

impl WindowType {
    /// Window weight at centre offset `n` for a filter of `len` taps.
    pub fn response(self, n: f64, len: usize) -> f64 {
        let len = len as f64;
        match self {
            WindowType::Rectangular => 1.0,
            WindowType::Hanning => 0.5 + 0.5 * (2.0 * PI * n / len).cos(),
            WindowType::Hamming => 0.54 + 0.46 * (2.0 * PI * n / len).cos(),
            WindowType::Blackman => {
                0.42 + 0.5 * (2.0 * PI * n / (len - 1.0)).cos()
                    + 0.08 * (4.0 * PI * n / (len - 1.0)).cos()
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WindowType::Rectangular => "Rectangular",
            WindowType::Hanning => "Hanning",
            WindowType::Hamming => "Hamming",
            WindowType::Blackman => "Blackman",
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Window {
    pub kind: WindowType,
    /// Guaranteed stopband attenuation in dB.
    pub stopband_attenuation: f64,
    /// Transition width times filter length.
    pub transition_factor: f64,
}

impl Window {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    #[inline]
    pub fn response(&self, n: f64, len: usize) -> f64 {
        self.kind.response(n, len)
    }

    /// Filter length for a transition band normalized by the sampling
    /// frequency: `ceil(factor / transition_band)`, bumped to the next odd
    /// number when even.
    pub fn coefficient_count(&self, transition_band: f64) -> usize {
        let count = (self.transition_factor / transition_band).ceil() as usize;
        if count % 2 == 0 {
            count + 1
        } else {
            count
        }
    }
}

/// All windows, ascending by attenuation.
pub const WINDOWS: [Window; 4] = [
    Window {
        kind: WindowType::Rectangular,
        stopband_attenuation: 21.0,
        transition_factor: 0.9,
    },
    Window {
        kind: WindowType::Hanning,
        stopband_attenuation: 44.0,
        transition_factor: 3.1,
    },
    Window {
        kind: WindowType::Hamming,
        stopband_attenuation: 53.0,
        transition_factor: 3.3,
    },
    Window {
        kind: WindowType::Blackman,
        stopband_attenuation: 74.0,
        transition_factor: 5.5,
    },
];

/// Weakest window meeting `stopband_attenuation` dB.
pub fn select_window(stopband_attenuation: f64) -> DspResult<&'static Window> {
    WINDOWS
        .iter()
        .find(|w| w.stopband_attenuation >= stopband_attenuation)
        .ok_or(DspError::NoWindow {
            attenuation: stopband_attenuation,
            strongest: WINDOWS[WINDOWS.len() - 1].stopband_attenuation,
        })
}

/// Window weights for `length` taps, centred on the middle tap.
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    let centre = (length as f64 - 1.0) / 2.0;
    (0..length)
        .map(|i| window_type.response(i as f64 - centre, length))
        .collect()
}
