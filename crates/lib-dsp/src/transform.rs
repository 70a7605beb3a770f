//! Direct Fourier and cosine transforms.
//!
//! All transforms here are the textbook O(N²) summations. They work for any
//! length, not just powers of two.
//!
//! # Conventions
//!
//! ```text
//! forward:  X[k] = Σ x[n] · e^(-j·2π·k·n/N)
//! inverse:  x[n] = (1/N) · Σ X[k] · e^(+j·2π·k·n/N)
//! ```
//!
//! A frequency signal produced by [`dft`] carries `freq[i] = ω·(i + 1)` with
//! `ω = 2π·fs/N`, amplitude `|X[i]|` and phase `atan2(Im, Re)`.

use crate::error::{DspError, DspResult};
use lib_types::{FrequencySignal, Signal, TimeSignal};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Sampling frequency used when none is supplied.
pub const DEFAULT_SAMPLING_FREQUENCY: f64 = 1.0;

/// Move a signal to the other domain.
///
/// Time signals go through [`dft`] at `sampling_frequency` (default
/// [`DEFAULT_SAMPLING_FREQUENCY`]). Frequency signals go through [`idft`] and
/// ignore the sampling frequency.
pub fn switch_domain(signal: &Signal, sampling_frequency: Option<f64>) -> DspResult<Signal> {
    match signal {
        Signal::Time(s) => {
            let fs = sampling_frequency.unwrap_or(DEFAULT_SAMPLING_FREQUENCY);
            Ok(dft(s, fs)?.into())
        }
        Signal::Frequency(s) => Ok(idft(s)?.into()),
    }
}

/// Direct DFT of a time signal.
pub fn dft(signal: &TimeSignal, sampling_frequency: f64) -> DspResult<FrequencySignal> {
    check_sampling_frequency(sampling_frequency)?;

    let input: Vec<Complex64> = signal
        .amplitude()
        .iter()
        .map(|&x| Complex64::new(x, 0.0))
        .collect();
    let harmonics = direct_dft(&input, false);

    let n = harmonics.len();
    let omega = 2.0 * PI / (n as f64 * (1.0 / sampling_frequency));
    let frequency = (1..=n).map(|i| omega * i as f64).collect();

    tracing::debug!("DFT of {} samples, fundamental {:.6} rad/s", n, omega);

    Ok(FrequencySignal::from_harmonics(
        signal.is_periodic(),
        frequency,
        harmonics,
    )?)
}

/// Direct inverse DFT of a frequency signal.
///
/// Uses the stored harmonics when present, otherwise rebuilds each one as
/// `amp · e^(jφ)`. The real part of the result becomes the amplitude axis and
/// the time axis runs `0..N`.
pub fn idft(signal: &FrequencySignal) -> DspResult<TimeSignal> {
    let samples = direct_dft(&signal.harmonics(), true);

    let residue = samples.iter().map(|c| c.im.abs()).fold(0.0, f64::max);
    if residue > 1e-6 {
        tracing::debug!(
            "Discarding imaginary residue up to {:.3e} from inverse DFT",
            residue
        );
    }

    let amplitude = samples.into_iter().map(|c| c.re).collect();
    Ok(TimeSignal::from_amplitudes(
        signal.is_periodic(),
        0.0,
        amplitude,
    )?)
}

/// Direct DFT over complex samples.
///
/// With `inverse` set the exponent sign flips and the result is divided by
/// `N`, so `direct_dft(&direct_dft(x, false), true)` returns `x`.
pub fn direct_dft(input: &[Complex64], inverse: bool) -> Vec<Complex64> {
    let n = input.len();
    if n == 0 {
        return Vec::new();
    }

    let sign = if inverse { 1.0 } else { -1.0 };
    let base = sign * 2.0 * PI / n as f64;

    (0..n)
        .map(|k| {
            let sum: Complex64 = input
                .iter()
                .enumerate()
                .map(|(j, &x)| {
                    // k·j mod N keeps the angle small for long inputs
                    let angle = base * ((k * j) % n) as f64;
                    x * Complex64::from_polar(1.0, angle)
                })
                .sum();

            if inverse {
                sum / n as f64
            } else {
                sum
            }
        })
        .collect()
}

/// Discrete cosine transform.
///
/// ```text
/// y[k] = sqrt(2/N) · Σ x[n] · cos(π/(4N) · (2n - 1) · (2k - 1))
/// ```
///
/// The frequency axis is `0.5·k·fs/N` and every phase shift is zero.
pub fn dct(signal: &TimeSignal, sampling_frequency: f64) -> DspResult<FrequencySignal> {
    check_sampling_frequency(sampling_frequency)?;

    let x = signal.amplitude();
    let n = x.len();
    let nf = n as f64;
    let gain = (2.0 / nf).sqrt();

    let coefficients: Vec<f64> = (0..n)
        .map(|k| {
            let kk = 2.0 * k as f64 - 1.0;
            let sum: f64 = x
                .iter()
                .enumerate()
                .map(|(i, &v)| v * (PI / (4.0 * nf) * (2.0 * i as f64 - 1.0) * kk).cos())
                .sum();
            gain * sum
        })
        .collect();

    let frequency = (0..n)
        .map(|k| 0.5 * k as f64 * sampling_frequency / nf)
        .collect();

    Ok(FrequencySignal::new(
        signal.is_periodic(),
        frequency,
        coefficients,
        vec![0.0; n],
    )?)
}

/// Remove the DC component.
///
/// Time signals have their mean subtracted. Frequency signals have harmonic
/// zero cleared and amplitude and phase derived again from the harmonics.
pub fn remove_dc(signal: &Signal) -> DspResult<Signal> {
    match signal {
        Signal::Time(s) => {
            let mean = s.amplitude().iter().sum::<f64>() / s.sample_count() as f64;
            Ok(s.map_amplitude(|x| x - mean).into())
        }
        Signal::Frequency(s) => {
            let mut harmonics = s.harmonics();
            harmonics[0] = Complex64::new(0.0, 0.0);
            Ok(FrequencySignal::from_harmonics(
                s.is_periodic(),
                s.frequency().to_vec(),
                harmonics,
            )?
            .into())
        }
    }
}

fn check_sampling_frequency(fs: f64) -> DspResult<()> {
    if !(fs.is_finite() && fs > 0.0) {
        return Err(DspError::InvalidConfig(format!(
            "sampling frequency must be positive, got {}",
            fs
        )));
    }
    Ok(())
}
