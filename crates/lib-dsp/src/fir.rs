//! Windowed-sinc FIR filter design.
//!
//! A filter is derived in one pass from a [`FirSpec`]:
//!
//! 1. Cutoffs and transition band are divided by the sampling frequency.
//! 2. The weakest catalog window meeting the stopband attenuation is chosen
//!    (see [`select_window`]).
//! 3. The window's transition factor fixes an odd tap count `N = 2m + 1`.
//! 4. Each cutoff moves half a transition band outward from the passband.
//! 5. Taps are `hD(n) · w(n)` for `n = -m..=m`. Both factors are even in
//!    `n`, so only `0..=m` is evaluated and then mirrored.
//!
//! # Ideal responses
//!
//! ```text
//! class       hD(0)            hD(n), n != 0
//! low pass    2·wc             sin(2π·wc·n) / (π·n)
//! high pass   -2·wc            sin(2π·wc·n) / (π·n)
//! band pass   2·(wc2 - wc1)    [sin(2π·wc2·n) - sin(2π·wc1·n)] / (π·n)
//! band stop   -2·(wc2 - wc1)   [sin(2π·wc1·n) - sin(2π·wc2·n)] / (π·n)
//! ```

use crate::convolution::convolve;
use crate::error::{DspError, DspResult};
use crate::window::{select_window, Window};
use lib_types::TimeSignal;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Filter class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterClass {
    LowPass,
    HighPass,
    BandPass,
    BandStop,
}

impl FilterClass {
    pub fn name(self) -> &'static str {
        match self {
            FilterClass::LowPass => "low-pass",
            FilterClass::HighPass => "high-pass",
            FilterClass::BandPass => "band-pass",
            FilterClass::BandStop => "band-stop",
        }
    }

    /// Whether the class is specified by a low and a high cutoff.
    pub fn is_band(self) -> bool {
        matches!(self, FilterClass::BandPass | FilterClass::BandStop)
    }
}

impl fmt::Display for FilterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Design parameters, all frequencies in Hz.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FirSpec {
    pub class: FilterClass,
    pub sampling_frequency: f64,
    /// Minimum stopband attenuation in dB.
    pub stopband_attenuation: f64,
    pub transition_band: f64,
    /// Low-pass and high-pass cutoff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff: Option<f64>,
    /// Band-pass and band-stop lower edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_cutoff: Option<f64>,
    /// Band-pass and band-stop upper edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_cutoff: Option<f64>,
}

impl FirSpec {
    /// Low-pass or high-pass parameters.
    pub fn single(
        class: FilterClass,
        sampling_frequency: f64,
        stopband_attenuation: f64,
        transition_band: f64,
        cutoff: f64,
    ) -> Self {
        Self {
            class,
            sampling_frequency,
            stopband_attenuation,
            transition_band,
            cutoff: Some(cutoff),
            low_cutoff: None,
            high_cutoff: None,
        }
    }

    /// Band-pass or band-stop parameters.
    pub fn band(
        class: FilterClass,
        sampling_frequency: f64,
        stopband_attenuation: f64,
        transition_band: f64,
        low_cutoff: f64,
        high_cutoff: f64,
    ) -> Self {
        Self {
            class,
            sampling_frequency,
            stopband_attenuation,
            transition_band,
            cutoff: None,
            low_cutoff: Some(low_cutoff),
            high_cutoff: Some(high_cutoff),
        }
    }

    pub fn low_pass(fs: f64, attenuation: f64, transition_band: f64, cutoff: f64) -> Self {
        Self::single(FilterClass::LowPass, fs, attenuation, transition_band, cutoff)
    }

    pub fn high_pass(fs: f64, attenuation: f64, transition_band: f64, cutoff: f64) -> Self {
        Self::single(FilterClass::HighPass, fs, attenuation, transition_band, cutoff)
    }

    pub fn band_pass(fs: f64, attenuation: f64, transition_band: f64, low: f64, high: f64) -> Self {
        Self::band(FilterClass::BandPass, fs, attenuation, transition_band, low, high)
    }

    pub fn band_stop(fs: f64, attenuation: f64, transition_band: f64, low: f64, high: f64) -> Self {
        Self::band(FilterClass::BandStop, fs, attenuation, transition_band, low, high)
    }

    /// Check ranges and that the class has the cutoffs it needs.
    pub fn validate(&self) -> DspResult<()> {
        if !(self.sampling_frequency.is_finite() && self.sampling_frequency > 0.0) {
            return Err(DspError::InvalidConfig(format!(
                "sampling frequency must be positive, got {}",
                self.sampling_frequency
            )));
        }
        if !(self.transition_band.is_finite() && self.transition_band > 0.0) {
            return Err(DspError::InvalidConfig(format!(
                "transition band must be positive, got {}",
                self.transition_band
            )));
        }
        if !self.stopband_attenuation.is_finite() {
            return Err(DspError::InvalidConfig(
                "stopband attenuation must be finite".into(),
            ));
        }

        if self.class.is_band() {
            let (low, high) = self.band_edges()?;
            if low >= high {
                return Err(DspError::InvalidConfig(format!(
                    "low cutoff {} must be below high cutoff {}",
                    low, high
                )));
            }
        } else {
            self.single_cutoff()?;
        }
        Ok(())
    }

    fn single_cutoff(&self) -> DspResult<f64> {
        self.cutoff.ok_or(DspError::MissingCutoff {
            class: self.class.name(),
            name: "cutoff",
        })
    }

    fn band_edges(&self) -> DspResult<(f64, f64)> {
        let low = self.low_cutoff.ok_or(DspError::MissingCutoff {
            class: self.class.name(),
            name: "low_cutoff",
        })?;
        let high = self.high_cutoff.ok_or(DspError::MissingCutoff {
            class: self.class.name(),
            name: "high_cutoff",
        })?;
        Ok((low, high))
    }
}

/// Adjusted cutoffs, normalized by the sampling frequency.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum Cutoffs {
    LowPass { wc: f64 },
    HighPass { wc: f64 },
    BandPass { wc1: f64, wc2: f64 },
    BandStop { wc1: f64, wc2: f64 },
}

impl Cutoffs {
    fn adjusted(spec: &FirSpec, half_band: f64) -> DspResult<Self> {
        let fs = spec.sampling_frequency;
        let cutoffs = match spec.class {
            FilterClass::LowPass => Cutoffs::LowPass {
                wc: spec.single_cutoff()? / fs + half_band,
            },
            FilterClass::HighPass => Cutoffs::HighPass {
                wc: spec.single_cutoff()? / fs - half_band,
            },
            FilterClass::BandPass => {
                let (low, high) = spec.band_edges()?;
                Cutoffs::BandPass {
                    wc1: low / fs - half_band,
                    wc2: high / fs + half_band,
                }
            }
            FilterClass::BandStop => {
                let (low, high) = spec.band_edges()?;
                Cutoffs::BandStop {
                    wc1: low / fs + half_band,
                    wc2: high / fs - half_band,
                }
            }
        };
        Ok(cutoffs)
    }

    /// Ideal impulse response at tap offset `n`.
    fn ideal_response(self, n: i64) -> f64 {
        let sinc = |wc: f64| {
            let n = n as f64;
            (2.0 * PI * wc * n).sin() / (PI * n)
        };

        match self {
            Cutoffs::LowPass { wc } if n == 0 => 2.0 * wc,
            Cutoffs::LowPass { wc } => sinc(wc),
            Cutoffs::HighPass { wc } if n == 0 => -2.0 * wc,
            Cutoffs::HighPass { wc } => sinc(wc),
            Cutoffs::BandPass { wc1, wc2 } if n == 0 => 2.0 * (wc2 - wc1),
            Cutoffs::BandPass { wc1, wc2 } => sinc(wc2) - sinc(wc1),
            Cutoffs::BandStop { wc1, wc2 } if n == 0 => -2.0 * (wc2 - wc1),
            Cutoffs::BandStop { wc1, wc2 } => sinc(wc1) - sinc(wc2),
        }
    }
}

/// Designed FIR filter.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FirFilter {
    spec: FirSpec,
    window: Window,
    coefficient_count: usize,
    cutoffs: Cutoffs,
    coefficients: Vec<f64>,
}

impl FirFilter {
    /// Design a filter. Fails on missing cutoffs, out-of-range parameters or
    /// an attenuation no window reaches.
    pub fn new(spec: FirSpec) -> DspResult<Self> {
        spec.validate()?;

        let transition_band = spec.transition_band / spec.sampling_frequency;
        let window = *select_window(spec.stopband_attenuation)?;
        let coefficient_count = window.coefficient_count(transition_band);
        let cutoffs = Cutoffs::adjusted(&spec, transition_band / 2.0)?;

        tracing::debug!(
            "Designing {} filter: {} window, {} taps, cutoffs {:?}",
            spec.class,
            window.name(),
            coefficient_count,
            cutoffs
        );

        let m = (coefficient_count - 1) / 2;
        let half: Vec<f64> = (0..=m)
            .map(|n| {
                cutoffs.ideal_response(n as i64) * window.response(n as f64, coefficient_count)
            })
            .collect();

        let mut coefficients = Vec::with_capacity(coefficient_count);
        coefficients.extend(half[1..].iter().rev());
        coefficients.extend_from_slice(&half);

        Ok(Self {
            spec,
            window,
            coefficient_count,
            cutoffs,
            coefficients,
        })
    }

    pub fn spec(&self) -> &FirSpec {
        &self.spec
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    #[inline]
    pub fn coefficient_count(&self) -> usize {
        self.coefficient_count
    }

    pub fn cutoffs(&self) -> Cutoffs {
        self.cutoffs
    }

    /// Taps for `n = -m..=m`.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Taps as a non-periodic time signal on `-m..=m`.
    pub fn to_signal(&self) -> DspResult<TimeSignal> {
        let m = ((self.coefficient_count - 1) / 2) as f64;
        Ok(TimeSignal::from_amplitudes(
            false,
            -m,
            self.coefficients.clone(),
        )?)
    }

    /// Filter `signal` by convolving it with the taps.
    pub fn apply(&self, signal: &TimeSignal) -> DspResult<TimeSignal> {
        convolve(signal, &self.to_signal()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowType;

    fn assert_symmetric(taps: &[f64]) {
        let n = taps.len();
        for i in 0..n {
            assert!(
                (taps[i] - taps[n - 1 - i]).abs() < 1e-15,
                "tap {} differs from its mirror",
                i
            );
        }
    }

    #[test]
    fn test_low_pass_design() {
        let filter = FirFilter::new(FirSpec::low_pass(8000.0, 50.0, 500.0, 1500.0)).unwrap();

        assert_eq!(filter.window().kind, WindowType::Hamming);
        assert_eq!(filter.coefficient_count(), 53);
        assert_eq!(filter.coefficients().len(), 53);
        assert_eq!(filter.coefficient_count() % 2, 1);
        assert_symmetric(filter.coefficients());

        // wc = 1500/8000 + 0.0625/2
        let wc = 0.21875;
        assert_eq!(filter.cutoffs(), Cutoffs::LowPass { wc });
        assert!((filter.coefficients()[26] - 2.0 * wc).abs() < 1e-12);
    }

    #[test]
    fn test_low_pass_tap_values() {
        let filter = FirFilter::new(FirSpec::low_pass(8000.0, 50.0, 500.0, 1500.0)).unwrap();
        let wc = 0.21875;
        let n = 1.0;
        let expected = (2.0 * PI * wc * n).sin() / (PI * n)
            * (0.54 + 0.46 * (2.0 * PI * n / 53.0).cos());

        assert!((filter.coefficients()[27] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_high_pass_design() {
        let filter = FirFilter::new(FirSpec::high_pass(8000.0, 70.0, 500.0, 1500.0)).unwrap();

        assert_eq!(filter.window().kind, WindowType::Blackman);
        // 5.5 / 0.0625 = 88 -> 89
        assert_eq!(filter.coefficient_count(), 89);
        assert_symmetric(filter.coefficients());

        let wc = 1500.0 / 8000.0 - 0.03125;
        assert!((filter.coefficients()[44] + 2.0 * wc).abs() < 1e-12);
    }

    #[test]
    fn test_high_pass_tap_values() {
        let filter = FirFilter::new(FirSpec::high_pass(8000.0, 70.0, 500.0, 1500.0)).unwrap();
        let wc = 1500.0 / 8000.0 - 0.03125;
        let window = 0.42 + 0.5 * (2.0 * PI / 88.0).cos() + 0.08 * (4.0 * PI / 88.0).cos();
        let expected = (2.0 * PI * wc).sin() / PI * window;

        let taps = filter.coefficients();
        assert!(expected > 0.0);
        assert!((taps[45] - expected).abs() < 1e-12);
        assert!((taps[43] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_band_designs() {
        let pass = FirFilter::new(FirSpec::band_pass(1000.0, 60.0, 50.0, 150.0, 250.0)).unwrap();
        let stop = FirFilter::new(FirSpec::band_stop(1000.0, 60.0, 50.0, 150.0, 250.0)).unwrap();

        assert_eq!(
            pass.cutoffs(),
            Cutoffs::BandPass {
                wc1: 0.15 - 0.025,
                wc2: 0.25 + 0.025
            }
        );
        assert_eq!(
            stop.cutoffs(),
            Cutoffs::BandStop {
                wc1: 0.15 + 0.025,
                wc2: 0.25 - 0.025
            }
        );

        let m = (pass.coefficient_count() - 1) / 2;
        assert!((pass.coefficients()[m] - 2.0 * (0.275 - 0.125)).abs() < 1e-12);
        assert!((stop.coefficients()[m] + 2.0 * (0.225 - 0.175)).abs() < 1e-12);
        assert_symmetric(pass.coefficients());
        assert_symmetric(stop.coefficients());
    }

    #[test]
    fn test_missing_cutoffs() {
        let mut spec = FirSpec::low_pass(8000.0, 50.0, 500.0, 1500.0);
        spec.cutoff = None;
        assert!(matches!(
            FirFilter::new(spec),
            Err(DspError::MissingCutoff { name: "cutoff", .. })
        ));

        let mut spec = FirSpec::band_pass(1000.0, 50.0, 50.0, 100.0, 200.0);
        spec.high_cutoff = None;
        assert!(matches!(
            FirFilter::new(spec),
            Err(DspError::MissingCutoff { name: "high_cutoff", .. })
        ));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            FirFilter::new(FirSpec::low_pass(8000.0, 90.0, 500.0, 1500.0)),
            Err(DspError::NoWindow { .. })
        ));
        assert!(matches!(
            FirFilter::new(FirSpec::low_pass(0.0, 50.0, 500.0, 1500.0)),
            Err(DspError::InvalidConfig(_))
        ));
        assert!(matches!(
            FirFilter::new(FirSpec::low_pass(8000.0, 50.0, 0.0, 1500.0)),
            Err(DspError::InvalidConfig(_))
        ));
        assert!(matches!(
            FirFilter::new(FirSpec::band_stop(1000.0, 50.0, 50.0, 300.0, 200.0)),
            Err(DspError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_to_signal_axis() {
        let filter = FirFilter::new(FirSpec::low_pass(8000.0, 50.0, 500.0, 1500.0)).unwrap();
        let taps = filter.to_signal().unwrap();

        assert!(!taps.is_periodic());
        assert_eq!(taps.first_time(), -26.0);
        assert_eq!(taps.last_time(), 26.0);
        assert_eq!(taps.amplitude(), filter.coefficients());
    }

    #[test]
    fn test_apply_is_convolution() {
        let filter = FirFilter::new(FirSpec::low_pass(1000.0, 20.0, 200.0, 100.0)).unwrap();
        let impulse = TimeSignal::from_amplitudes(false, 0.0, vec![1.0]).unwrap();

        // An impulse at t = 0 reproduces the taps on their own axis.
        let out = filter.apply(&impulse).unwrap();
        assert_eq!(out, filter.to_signal().unwrap());
    }

    #[test]
    fn test_spec_from_toml() {
        let spec: FirSpec = toml::from_str(
            r#"
            class = "band_stop"
            sampling_frequency = 1000.0
            stopband_attenuation = 60.0
            transition_band = 50.0
            low_cutoff = 150.0
            high_cutoff = 250.0
            "#,
        )
        .unwrap();

        assert_eq!(spec, FirSpec::band_stop(1000.0, 60.0, 50.0, 150.0, 250.0));
    }

    #[test]
    fn test_spec_json_round_trip() {
        let spec = FirSpec::high_pass(8000.0, 70.0, 500.0, 1500.0);
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("\"high_pass\""));
        assert!(!json.contains("low_cutoff"));
        assert_eq!(serde_json::from_str::<FirSpec>(&json).unwrap(), spec);
    }
}
