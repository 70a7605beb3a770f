//! Integer-factor sample rate conversion.
//!
//! ```text
//! upsample(L):       zero-stuff by L  ->  FIR
//! downsample(M):     FIR              ->  keep every M-th sample
//! resample(L, M):    upsample(L)      ->  downsample(M)
//! ```
//!
//! The FIR filter is supplied by the caller and is expected to be a low-pass
//! at the tighter of the two Nyquist limits. Results sit on consecutive time
//! indices starting at the first index of the filtered signal.

use crate::error::{DspError, DspResult};
use crate::fir::FirFilter;
use lib_types::TimeSignal;

/// Insert `factor - 1` zeros between consecutive samples.
///
/// `N` samples become `(N - 1)·factor + 1`, starting at the same index.
pub fn zero_stuff(signal: &TimeSignal, factor: usize) -> DspResult<TimeSignal> {
    check_factor("upsampling", factor)?;

    let n = signal.sample_count();
    let mut amplitude = vec![0.0; (n - 1) * factor + 1];
    for (i, &x) in signal.amplitude().iter().enumerate() {
        amplitude[i * factor] = x;
    }

    Ok(TimeSignal::from_amplitudes(
        signal.is_periodic(),
        signal.first_time(),
        amplitude,
    )?)
}

/// Keep samples `0, factor, 2·factor, ...`.
pub fn decimate(signal: &TimeSignal, factor: usize) -> DspResult<TimeSignal> {
    check_factor("downsampling", factor)?;

    let amplitude = signal.amplitude().iter().step_by(factor).copied().collect();
    Ok(TimeSignal::from_amplitudes(
        signal.is_periodic(),
        signal.first_time(),
        amplitude,
    )?)
}

/// Raise the sample rate by `factor`.
///
/// A factor of one skips the stuffing and only filters.
pub fn upsample(signal: &TimeSignal, factor: usize, filter: &FirFilter) -> DspResult<TimeSignal> {
    check_factor("upsampling", factor)?;

    if factor > 1 {
        filter.apply(&zero_stuff(signal, factor)?)
    } else {
        filter.apply(signal)
    }
}

/// Lower the sample rate by `factor`.
///
/// A factor of one skips the decimation and only filters.
pub fn downsample(signal: &TimeSignal, factor: usize, filter: &FirFilter) -> DspResult<TimeSignal> {
    check_factor("downsampling", factor)?;

    let filtered = filter.apply(signal)?;
    if factor > 1 {
        decimate(&filtered, factor)
    } else {
        Ok(filtered)
    }
}

/// Change the sample rate by `up / down`.
///
/// Runs [`upsample`] then [`downsample`], so the filter is applied once in
/// each stage.
pub fn resample(
    signal: &TimeSignal,
    up: usize,
    down: usize,
    filter: &FirFilter,
) -> DspResult<TimeSignal> {
    check_factor("upsampling", up)?;
    check_factor("downsampling", down)?;

    tracing::debug!(
        "Resampling {} samples by {}/{} with {} taps",
        signal.sample_count(),
        up,
        down,
        filter.coefficient_count()
    );

    downsample(&upsample(signal, up, filter)?, down, filter)
}

fn check_factor(name: &'static str, value: usize) -> DspResult<()> {
    if value == 0 {
        return Err(DspError::InvalidFactor { name, value });
    }
    Ok(())
}
