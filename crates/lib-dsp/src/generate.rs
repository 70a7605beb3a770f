//! Sampled sinusoid generator.

use crate::error::{DspError, DspResult};
use lib_types::TimeSignal;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Base function of a generated wave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveFunction {
    #[default]
    Sine,
    Cosine,
}

impl WaveFunction {
    #[inline]
    fn eval(self, x: f64) -> f64 {
        match self {
            WaveFunction::Sine => x.sin(),
            WaveFunction::Cosine => x.cos(),
        }
    }
}

/// One second of `A·f(2π·analog_freq/sampling_freq·n + phase_shift)`.
///
/// Produces `floor(sampling_freq)` samples on `n = 0, 1, ...`. Fails when the
/// sampling frequency is below the Nyquist rate `2·analog_freq` or yields no
/// samples.
pub fn generate_wave(
    function: WaveFunction,
    amplitude: f64,
    analog_freq: f64,
    sampling_freq: f64,
    phase_shift: f64,
) -> DspResult<TimeSignal> {
    let nyquist = 2.0 * analog_freq;
    if sampling_freq < nyquist {
        return Err(DspError::InvalidConfig(format!(
            "sampling frequency {} is below the Nyquist rate {}",
            sampling_freq, nyquist
        )));
    }
    if !(sampling_freq.is_finite() && sampling_freq >= 1.0) {
        return Err(DspError::InvalidConfig(format!(
            "sampling frequency {} yields no samples",
            sampling_freq
        )));
    }

    let count = sampling_freq.floor() as usize;
    let step = 2.0 * PI * analog_freq / sampling_freq;
    let samples = (0..count)
        .map(|n| amplitude * function.eval(step * n as f64 + phase_shift))
        .collect();

    Ok(TimeSignal::from_amplitudes(false, 0.0, samples)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_samples() {
        let wave = generate_wave(WaveFunction::Sine, 3.0, 1.0, 4.0, 0.0).unwrap();

        assert_eq!(wave.time(), &[0.0, 1.0, 2.0, 3.0]);
        let expected = [0.0, 3.0, 0.0, -3.0];
        for (a, e) in wave.amplitude().iter().zip(expected) {
            assert!((a - e).abs() < 1e-12);
        }
        assert!(!wave.is_periodic());
    }

    #[test]
    fn test_cosine_with_phase() {
        let wave = generate_wave(WaveFunction::Cosine, 1.0, 5.0, 100.0, PI / 2.0).unwrap();

        assert_eq!(wave.sample_count(), 100);
        // cos(x + π/2) = -sin(x)
        let x = 2.0 * PI * 5.0 / 100.0 * 7.0;
        assert!((wave.amplitude()[7] + x.sin()).abs() < 1e-12);
    }

    #[test]
    fn test_nyquist_rejected() {
        assert!(matches!(
            generate_wave(WaveFunction::Sine, 1.0, 10.0, 19.0, 0.0),
            Err(DspError::InvalidConfig(_))
        ));
        assert!(generate_wave(WaveFunction::Sine, 1.0, 10.0, 20.0, 0.0).is_ok());
        assert!(generate_wave(WaveFunction::Sine, 1.0, 0.0, 0.5, 0.0).is_err());
    }
}
