//! Length matching for signals on a shared time axis.
//!
//! Two time signals may start and end at different indices. Before they can
//! be combined sample by sample, each is extended so both cover the same
//! span:
//!
//! ```text
//! a:      [3 4 5 6]          (t = 2..5)
//! b:  [1 2 3]                (t = 0..2)
//!
//! a': [0 0 3 4 5 6]          left-padded by 2
//! b': [1 2 3 0 0 0]          right-padded by 3
//! ```
//!
//! Non-periodic signals are padded with zeros. Periodic signals are padded
//! with their own samples, wrapped around: left padding repeats the trailing
//! samples, right padding repeats the leading ones.
//!
//! The inputs are never touched. Callers get two fresh signals.

use lib_types::{SignalError, SignalResult, TimeSignal};

/// Extend `a` and `b` to the union of their time spans.
///
/// Fails with [`SignalError::SampleCountMismatch`] if the padded signals still
/// disagree in length, which happens when a time axis does not advance in
/// steps of one.
pub fn align(a: &TimeSignal, b: &TimeSignal) -> SignalResult<(TimeSignal, TimeSignal)> {
    let start = a.first_time().min(b.first_time());
    let end = a.last_time().max(b.last_time());

    let a = pad_to_span(a, start, end)?;
    let b = pad_to_span(b, start, end)?;

    if a.sample_count() != b.sample_count() {
        return Err(SignalError::SampleCountMismatch {
            expected: a.sample_count(),
            actual: b.sample_count(),
        });
    }

    Ok((a, b))
}

/// Pad `signal` on either side so it covers `start..=end`.
pub fn pad_to_span(signal: &TimeSignal, start: f64, end: f64) -> SignalResult<TimeSignal> {
    let left = (signal.first_time() - start).round().max(0.0) as usize;
    let right = (end - signal.last_time()).round().max(0.0) as usize;

    if left == 0 && right == 0 {
        return Ok(signal.clone());
    }

    tracing::debug!(
        "Padding {} signal: {} samples left, {} right",
        if signal.is_periodic() { "periodic" } else { "finite" },
        left,
        right
    );

    let n = signal.sample_count() as isize;
    let amp = signal.amplitude();
    let fill = |offset: isize| -> f64 {
        if signal.is_periodic() {
            amp[offset.rem_euclid(n) as usize]
        } else {
            0.0
        }
    };

    let len = signal.sample_count() + left + right;
    let mut time = Vec::with_capacity(len);
    let mut amplitude = Vec::with_capacity(len);

    for k in (1..=left).rev() {
        time.push(signal.first_time() - k as f64);
        amplitude.push(fill(-(k as isize)));
    }

    time.extend_from_slice(signal.time());
    amplitude.extend_from_slice(amp);

    for k in 1..=right {
        time.push(signal.last_time() + k as f64);
        amplitude.push(fill(n - 1 + k as isize));
    }

    TimeSignal::new(signal.is_periodic(), time, amplitude)
}
