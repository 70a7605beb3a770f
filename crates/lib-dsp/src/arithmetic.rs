//! Pointwise arithmetic and time-axis operations on time signals.
//!
//! Every function returns a new signal and leaves its operands alone.
//! Binary operations first line both operands up with [`align`], so signals
//! that start or end at different indices are superimposed on a common time
//! axis.

use crate::align::align;
use crate::error::{DspError, DspResult};
use lib_types::{Signal, TimeSignal};

/// Pointwise sum of two time signals.
///
/// Fails unless both operands are in the time domain. The result is periodic
/// only if both operands are.
pub fn add(a: &Signal, b: &Signal) -> DspResult<TimeSignal> {
    combine(a.as_time()?, b.as_time()?, |x, y| x + y)
}

/// Pointwise absolute difference `|a - b|` of two time signals.
pub fn sub(a: &Signal, b: &Signal) -> DspResult<TimeSignal> {
    combine(a.as_time()?, b.as_time()?, |x, y| (x - y).abs())
}

fn combine(a: &TimeSignal, b: &TimeSignal, op: impl Fn(f64, f64) -> f64) -> DspResult<TimeSignal> {
    let (a, b) = align(a, b)?;
    let periodic = a.is_periodic() && b.is_periodic();

    let amplitude = a
        .amplitude()
        .iter()
        .zip(b.amplitude())
        .map(|(&x, &y)| op(x, y))
        .collect();

    let (_, time, _) = a.into_parts();
    Ok(TimeSignal::new(periodic, time, amplitude)?)
}

/// Multiply every amplitude by `factor`.
pub fn scale(signal: &TimeSignal, factor: f64) -> TimeSignal {
    signal.map_amplitude(|x| x * factor)
}

/// Square every amplitude.
pub fn square(signal: &TimeSignal) -> TimeSignal {
    signal.map_amplitude(|x| x * x)
}

/// Divide every amplitude by the peak absolute amplitude.
///
/// An all-zero signal is returned unchanged.
pub fn normalize(signal: &TimeSignal) -> TimeSignal {
    let peak = signal.amplitude().iter().map(|v| v.abs()).fold(0.0, f64::max);
    if peak > 0.0 {
        signal.map_amplitude(|x| x / peak)
    } else {
        tracing::warn!("Normalizing an all-zero signal; returning it unchanged");
        signal.clone()
    }
}

/// Running prefix sum of the amplitudes.
pub fn cumulative_sum(signal: &TimeSignal) -> TimeSignal {
    let mut out = signal.clone();
    let mut acc = 0.0;
    for x in out.amplitude_mut() {
        acc += *x;
        *x = acc;
    }
    out
}

/// Relabel the time axis: `t -> t - k`. Amplitudes are untouched.
///
/// A positive `k` advances the signal, a negative `k` delays it.
pub fn shift(signal: &TimeSignal, k: i64) -> TimeSignal {
    let offset = k as f64;
    let mut out = signal.clone();
    out.time_mut().iter_mut().for_each(|t| *t -= offset);
    out
}

/// Mirror the signal around `t = 0`.
///
/// The time axis becomes the negated indices in ascending order and the
/// amplitudes are reversed, so `fold(fold(a)) == a`.
pub fn fold(signal: &TimeSignal) -> TimeSignal {
    let mut out = signal.clone();

    let time = out.time_mut();
    time.iter_mut().for_each(|t| *t = -*t);
    time.sort_by(|a, b| a.total_cmp(b));

    out.amplitude_mut().reverse();
    out
}

/// First difference: `a - shift(a, -1)`.
pub fn first_derivative(signal: &TimeSignal) -> DspResult<TimeSignal> {
    combine(signal, &shift(signal, -1), |x, y| (x - y).abs())
}

/// Second difference: `shift(a, -1) + shift(a, 1) - 2a`.
pub fn second_derivative(signal: &TimeSignal) -> DspResult<TimeSignal> {
    let neighbours = combine(&shift(signal, -1), &shift(signal, 1), |x, y| x + y)?;
    combine(&neighbours, &scale(signal, 2.0), |x, y| (x - y).abs())
}

/// Moving average over `window_size` consecutive samples.
///
/// The output has `N - window_size + 1` samples, each stamped with the time
/// of the first sample in its window.
pub fn smooth(signal: &TimeSignal, window_size: usize) -> DspResult<TimeSignal> {
    if window_size == 0 {
        return Err(DspError::InvalidConfig(
            "smoothing window must hold at least one sample".into(),
        ));
    }
    if window_size > signal.sample_count() {
        return Err(DspError::WindowTooLarge {
            window: window_size,
            samples: signal.sample_count(),
        });
    }

    let amplitude: Vec<f64> = signal
        .amplitude()
        .windows(window_size)
        .map(|w| w.iter().sum::<f64>() / window_size as f64)
        .collect();
    let time = signal.time()[..amplitude.len()].to_vec();

    Ok(TimeSignal::new(signal.is_periodic(), time, amplitude)?)
}
