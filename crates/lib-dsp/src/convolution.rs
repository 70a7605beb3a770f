//! Linear convolution and normalized cross-correlation.
//!
//! Both are direct O(N·M) summations over the amplitude axes.
//!
//! # Time axes
//!
//! Convolving `a` on `a0..` with `b` on `b0..` gives `len(a) + len(b) - 1`
//! samples starting at `a0 + b0`. Correlation output is indexed by lag,
//! `0..N`.

use crate::error::{DspError, DspResult};
use lib_types::TimeSignal;

/// Linear convolution of two time signals.
///
/// The result is never periodic.
pub fn convolve(a: &TimeSignal, b: &TimeSignal) -> DspResult<TimeSignal> {
    let amplitude = direct_convolve(a.amplitude(), b.amplitude());
    let start = a.first_time() + b.first_time();

    tracing::trace!(
        "Convolving {} x {} samples from t = {}",
        a.sample_count(),
        b.sample_count(),
        start
    );

    Ok(TimeSignal::from_amplitudes(false, start, amplitude)?)
}

/// Normalized cross-correlation `r[j] = Σ a[n]·b[n+j] / sqrt(Σa² · Σb²)`.
///
/// The shorter operand is zero-extended to the longer length `N`. When both
/// signals are periodic `b[n+j]` wraps around, otherwise lags past the end
/// read zero. Output lags run `0..N` and every value lies in `[-1, 1]`.
pub fn correlate(a: &TimeSignal, b: &TimeSignal) -> DspResult<TimeSignal> {
    let n = a.sample_count().max(b.sample_count());
    let periodic = a.is_periodic() && b.is_periodic();

    let x = zero_extend(a.amplitude(), n);
    let y = zero_extend(b.amplitude(), n);

    let energy = (x.iter().map(|v| v * v).sum::<f64>() * y.iter().map(|v| v * v).sum::<f64>()).sqrt();
    if energy == 0.0 {
        return Err(DspError::NumericalInstability(
            "cannot normalize correlation of a zero-energy signal".into(),
        ));
    }

    let amplitude = (0..n)
        .map(|lag| {
            let sum: f64 = (0..n)
                .map(|i| {
                    let j = i + lag;
                    let other = if periodic {
                        y[j % n]
                    } else if j < n {
                        y[j]
                    } else {
                        0.0
                    };
                    x[i] * other
                })
                .sum();
            sum / energy
        })
        .collect();

    Ok(TimeSignal::from_amplitudes(periodic, 0.0, amplitude)?)
}

/// Direct linear convolution of two sample buffers.
///
/// Output length is `signal.len() + kernel.len() - 1`, or zero when either
/// input is empty.
pub fn direct_convolve(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }

    let output_len = signal.len() + kernel.len() - 1;
    let mut output = vec![0.0; output_len];

    for (i, &s) in signal.iter().enumerate() {
        for (j, &k) in kernel.iter().enumerate() {
            output[i + j] += s * k;
        }
    }

    output
}

fn zero_extend(samples: &[f64], len: usize) -> Vec<f64> {
    let mut out = samples.to_vec();
    out.resize(len, 0.0);
    out
}
