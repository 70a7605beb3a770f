//! Domain-tagged signal containers.
//!
//! A signal lives in exactly one [`Domain`] for its whole life. The domain
//! decides which axes it carries:
//!
//! ```text
//! Time:       (time, amp)
//! Frequency:  (freq, amp, pshift)
//! ```
//!
//! Every axis has exactly `sample_count` entries. The constructors check this
//! and refuse empty signals, so code holding a `TimeSignal` or
//! `FrequencySignal` can index the first and last sample freely.
//!
//! Consecutive time indices are one unit apart. Operations that line two
//! signals up on a shared time axis (see `lib_dsp::align`) rely on that.

use crate::error::{SignalError, SignalResult};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

/// Absolute tolerance used by [`Signal::compare`].
pub const COMPARE_TOLERANCE: f64 = 1e-5;

/// Signal domain, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Time,
    Frequency,
}

impl Domain {
    /// Numeric tag used on the first line of a signal file.
    pub fn code(self) -> u8 {
        match self {
            Domain::Time => 0,
            Domain::Frequency => 1,
        }
    }

    /// Inverse of [`Domain::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Domain::Time),
            1 => Some(Domain::Frequency),
            _ => None,
        }
    }

    /// Number of data columns per sample line.
    pub fn column_count(self) -> usize {
        match self {
            Domain::Time => 2,
            Domain::Frequency => 3,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Time => write!(f, "time"),
            Domain::Frequency => write!(f, "frequency"),
        }
    }
}

/// Named data axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// `"time"`, time variant only.
    Time,
    /// `"freq"`, frequency variant only.
    Frequency,
    /// `"amp"`, both variants.
    Amplitude,
    /// `"pshift"`, frequency variant only.
    PhaseShift,
}

impl Axis {
    /// Short name used for indexing.
    pub fn name(self) -> &'static str {
        match self {
            Axis::Time => "time",
            Axis::Frequency => "freq",
            Axis::Amplitude => "amp",
            Axis::PhaseShift => "pshift",
        }
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time" => Ok(Axis::Time),
            "freq" => Ok(Axis::Frequency),
            "amp" => Ok(Axis::Amplitude),
            "pshift" => Ok(Axis::PhaseShift),
            other => Err(format!("unknown axis name: {}", other)),
        }
    }
}

fn check_axis(axis: &'static str, expected: usize, actual: usize) -> SignalResult<()> {
    if expected != actual {
        return Err(SignalError::AxisLengthMismatch {
            axis,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Time-domain signal: `(time, amp)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSignal")]
pub struct TimeSignal {
    periodic: bool,
    time: Vec<f64>,
    amplitude: Vec<f64>,
}

impl TimeSignal {
    /// Build a time signal from its two axes.
    pub fn new(periodic: bool, time: Vec<f64>, amplitude: Vec<f64>) -> SignalResult<Self> {
        if time.is_empty() {
            return Err(SignalError::Empty);
        }
        check_axis("amp", time.len(), amplitude.len())?;
        Ok(Self {
            periodic,
            time,
            amplitude,
        })
    }

    /// Build a time signal whose indices run `start, start + 1, ...`.
    pub fn from_amplitudes(periodic: bool, start: f64, amplitude: Vec<f64>) -> SignalResult<Self> {
        let time = (0..amplitude.len()).map(|i| start + i as f64).collect();
        Self::new(periodic, time, amplitude)
    }

    /// Whether the signal repeats outside its stored samples.
    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    #[inline]
    pub fn sample_count(&self) -> usize {
        self.time.len()
    }

    #[inline]
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    #[inline]
    pub fn amplitude(&self) -> &[f64] {
        &self.amplitude
    }

    /// First time index.
    #[inline]
    pub fn first_time(&self) -> f64 {
        self.time[0]
    }

    /// Last time index.
    #[inline]
    pub fn last_time(&self) -> f64 {
        self.time[self.time.len() - 1]
    }

    /// Look up an axis by name. `None` for frequency-only axes.
    pub fn axis(&self, axis: Axis) -> Option<&[f64]> {
        match axis {
            Axis::Time => Some(&self.time),
            Axis::Amplitude => Some(&self.amplitude),
            Axis::Frequency | Axis::PhaseShift => None,
        }
    }

    /// Copy with a replacement amplitude axis on the same time axis.
    pub fn with_amplitude(&self, amplitude: Vec<f64>) -> SignalResult<Self> {
        Self::new(self.periodic, self.time.clone(), amplitude)
    }

    /// Copy with every amplitude passed through `f`.
    pub fn map_amplitude(&self, f: impl Fn(f64) -> f64) -> Self {
        let mut out = self.clone();
        out.amplitude.iter_mut().for_each(|x| *x = f(*x));
        out
    }

    /// Mutable view of the time axis. Length is fixed.
    #[inline]
    pub fn time_mut(&mut self) -> &mut [f64] {
        &mut self.time
    }

    /// Mutable view of the amplitude axis. Length is fixed.
    #[inline]
    pub fn amplitude_mut(&mut self) -> &mut [f64] {
        &mut self.amplitude
    }

    /// Split into `(periodic, time, amplitude)`.
    pub fn into_parts(self) -> (bool, Vec<f64>, Vec<f64>) {
        (self.periodic, self.time, self.amplitude)
    }
}

/// Named-axis indexing: `signal["time"]`, `signal["amp"]`.
///
/// # Panics
///
/// Panics on any other name, like slice indexing out of bounds.
impl<'a> Index<&'a str> for TimeSignal {
    type Output = [f64];

    fn index(&self, name: &'a str) -> &[f64] {
        name.parse::<Axis>()
            .ok()
            .and_then(|axis| self.axis(axis))
            .unwrap_or_else(|| panic!("time signal has no axis named '{}'", name))
    }
}

/// Frequency-domain signal: `(freq, amp, pshift)`.
///
/// When produced by a DFT the raw harmonics are kept alongside the derived
/// polar form so that an inverse transform or DC removal can work on the
/// exact coefficients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrequencySignal")]
pub struct FrequencySignal {
    periodic: bool,
    frequency: Vec<f64>,
    amplitude: Vec<f64>,
    phase_shift: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    harmonics: Option<Vec<Complex64>>,
}

impl FrequencySignal {
    /// Build a frequency signal from its three axes.
    pub fn new(
        periodic: bool,
        frequency: Vec<f64>,
        amplitude: Vec<f64>,
        phase_shift: Vec<f64>,
    ) -> SignalResult<Self> {
        if frequency.is_empty() {
            return Err(SignalError::Empty);
        }
        check_axis("amp", frequency.len(), amplitude.len())?;
        check_axis("pshift", frequency.len(), phase_shift.len())?;
        Ok(Self {
            periodic,
            frequency,
            amplitude,
            phase_shift,
            harmonics: None,
        })
    }

    /// Build from raw complex harmonics.
    ///
    /// Amplitude is the magnitude and phase shift is `atan2(im, re)` of each
    /// harmonic.
    pub fn from_harmonics(
        periodic: bool,
        frequency: Vec<f64>,
        harmonics: Vec<Complex64>,
    ) -> SignalResult<Self> {
        if frequency.is_empty() {
            return Err(SignalError::Empty);
        }
        check_axis("harmonics", frequency.len(), harmonics.len())?;

        let amplitude = harmonics.iter().map(|h| h.norm()).collect();
        let phase_shift = harmonics.iter().map(|h| h.im.atan2(h.re)).collect();

        Ok(Self {
            periodic,
            frequency,
            amplitude,
            phase_shift,
            harmonics: Some(harmonics),
        })
    }

    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    #[inline]
    pub fn sample_count(&self) -> usize {
        self.frequency.len()
    }

    #[inline]
    pub fn frequency(&self) -> &[f64] {
        &self.frequency
    }

    #[inline]
    pub fn amplitude(&self) -> &[f64] {
        &self.amplitude
    }

    #[inline]
    pub fn phase_shift(&self) -> &[f64] {
        &self.phase_shift
    }

    /// Raw harmonics, if this signal was built from them.
    pub fn stored_harmonics(&self) -> Option<&[Complex64]> {
        self.harmonics.as_deref()
    }

    /// Complex harmonics: the stored ones, or `amp · e^{jφ}` per bin.
    pub fn harmonics(&self) -> Vec<Complex64> {
        match &self.harmonics {
            Some(h) => h.clone(),
            None => self
                .amplitude
                .iter()
                .zip(&self.phase_shift)
                .map(|(&amp, &phase)| Complex64::from_polar(amp, phase))
                .collect(),
        }
    }

    /// Look up an axis by name. `None` for the time axis.
    pub fn axis(&self, axis: Axis) -> Option<&[f64]> {
        match axis {
            Axis::Frequency => Some(&self.frequency),
            Axis::Amplitude => Some(&self.amplitude),
            Axis::PhaseShift => Some(&self.phase_shift),
            Axis::Time => None,
        }
    }
}

/// Named-axis indexing: `signal["freq"]`, `signal["amp"]`, `signal["pshift"]`.
///
/// # Panics
///
/// Panics on any other name.
impl<'a> Index<&'a str> for FrequencySignal {
    type Output = [f64];

    fn index(&self, name: &'a str) -> &[f64] {
        name.parse::<Axis>()
            .ok()
            .and_then(|axis| self.axis(axis))
            .unwrap_or_else(|| panic!("frequency signal has no axis named '{}'", name))
    }
}

/// Deserialized form of [`TimeSignal`], checked by [`TimeSignal::new`].
#[derive(Deserialize)]
struct RawTimeSignal {
    periodic: bool,
    time: Vec<f64>,
    amplitude: Vec<f64>,
}

impl TryFrom<RawTimeSignal> for TimeSignal {
    type Error = SignalError;

    fn try_from(raw: RawTimeSignal) -> SignalResult<Self> {
        TimeSignal::new(raw.periodic, raw.time, raw.amplitude)
    }
}

/// Deserialized form of [`FrequencySignal`], checked by [`FrequencySignal::new`].
#[derive(Deserialize)]
struct RawFrequencySignal {
    periodic: bool,
    frequency: Vec<f64>,
    amplitude: Vec<f64>,
    phase_shift: Vec<f64>,
    #[serde(default)]
    harmonics: Option<Vec<Complex64>>,
}

impl TryFrom<RawFrequencySignal> for FrequencySignal {
    type Error = SignalError;

    fn try_from(raw: RawFrequencySignal) -> SignalResult<Self> {
        let mut signal =
            FrequencySignal::new(raw.periodic, raw.frequency, raw.amplitude, raw.phase_shift)?;
        if let Some(harmonics) = raw.harmonics {
            check_axis("harmonics", signal.frequency.len(), harmonics.len())?;
            signal.harmonics = Some(harmonics);
        }
        Ok(signal)
    }
}

/// A signal in either domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "lowercase")]
pub enum Signal {
    Time(TimeSignal),
    Frequency(FrequencySignal),
}

impl Signal {
    pub fn domain(&self) -> Domain {
        match self {
            Signal::Time(_) => Domain::Time,
            Signal::Frequency(_) => Domain::Frequency,
        }
    }

    pub fn is_periodic(&self) -> bool {
        match self {
            Signal::Time(s) => s.is_periodic(),
            Signal::Frequency(s) => s.is_periodic(),
        }
    }

    pub fn sample_count(&self) -> usize {
        match self {
            Signal::Time(s) => s.sample_count(),
            Signal::Frequency(s) => s.sample_count(),
        }
    }

    pub fn amplitude(&self) -> &[f64] {
        match self {
            Signal::Time(s) => s.amplitude(),
            Signal::Frequency(s) => s.amplitude(),
        }
    }

    pub fn axis(&self, axis: Axis) -> Option<&[f64]> {
        match self {
            Signal::Time(s) => s.axis(axis),
            Signal::Frequency(s) => s.axis(axis),
        }
    }

    /// Look up an axis by its short name, failing for names this domain lacks.
    pub fn axis_by_name(&self, name: &str) -> SignalResult<&[f64]> {
        name.parse::<Axis>()
            .ok()
            .and_then(|axis| self.axis(axis))
            .ok_or_else(|| SignalError::UnknownAxis {
                name: name.to_string(),
                domain: self.domain(),
            })
    }

    /// Data columns in file order.
    pub fn columns(&self) -> Vec<&[f64]> {
        match self {
            Signal::Time(s) => vec![s.time(), s.amplitude()],
            Signal::Frequency(s) => vec![s.frequency(), s.amplitude(), s.phase_shift()],
        }
    }

    /// Borrow as a time signal, or fail with a domain mismatch.
    pub fn as_time(&self) -> SignalResult<&TimeSignal> {
        match self {
            Signal::Time(s) => Ok(s),
            Signal::Frequency(_) => Err(SignalError::DomainMismatch {
                expected: Domain::Time,
                actual: Domain::Frequency,
            }),
        }
    }

    /// Borrow as a frequency signal, or fail with a domain mismatch.
    pub fn as_frequency(&self) -> SignalResult<&FrequencySignal> {
        match self {
            Signal::Frequency(s) => Ok(s),
            Signal::Time(_) => Err(SignalError::DomainMismatch {
                expected: Domain::Frequency,
                actual: Domain::Time,
            }),
        }
    }

    /// Structural equality.
    ///
    /// Fails when domain, sample count or periodicity differ. Otherwise
    /// returns whether every amplitude sample agrees within
    /// [`COMPARE_TOLERANCE`].
    pub fn compare(&self, other: &Signal) -> SignalResult<bool> {
        if self.domain() != other.domain() {
            return Err(SignalError::DomainMismatch {
                expected: self.domain(),
                actual: other.domain(),
            });
        }
        if self.sample_count() != other.sample_count() {
            return Err(SignalError::SampleCountMismatch {
                expected: self.sample_count(),
                actual: other.sample_count(),
            });
        }
        if self.is_periodic() != other.is_periodic() {
            return Err(SignalError::PeriodicityMismatch);
        }

        Ok(self
            .amplitude()
            .iter()
            .zip(other.amplitude())
            .all(|(a, b)| (a - b).abs() < COMPARE_TOLERANCE))
    }
}

impl From<TimeSignal> for Signal {
    fn from(signal: TimeSignal) -> Self {
        Signal::Time(signal)
    }
}

impl From<FrequencySignal> for Signal {
    fn from(signal: FrequencySignal) -> Self {
        Signal::Frequency(signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> TimeSignal {
        TimeSignal::new(false, vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).unwrap()
    }

    #[test]
    fn test_domain_codes() {
        assert_eq!(Domain::Time.code(), 0);
        assert_eq!(Domain::Frequency.code(), 1);
        assert_eq!(Domain::from_code(1), Some(Domain::Frequency));
        assert_eq!(Domain::from_code(2), None);
        assert_eq!(Domain::Frequency.column_count(), 3);
    }

    #[test]
    fn test_axis_length_checked() {
        let err = TimeSignal::new(false, vec![0.0, 1.0], vec![1.0]).unwrap_err();
        assert_eq!(
            err,
            SignalError::AxisLengthMismatch {
                axis: "amp",
                expected: 2,
                actual: 1
            }
        );

        assert_eq!(
            TimeSignal::new(false, vec![], vec![]).unwrap_err(),
            SignalError::Empty
        );
    }

    #[test]
    fn test_named_indexing() {
        let s = ramp();
        assert_eq!(&s["time"], &[0.0, 1.0, 2.0]);
        assert_eq!(&s["amp"], &[1.0, 2.0, 3.0]);
        assert_eq!(s.axis(Axis::PhaseShift), None);

        let f = FrequencySignal::new(true, vec![1.0], vec![2.0], vec![0.5]).unwrap();
        assert_eq!(&f["pshift"], &[0.5]);

        let wrapped = Signal::from(f);
        assert!(wrapped.axis_by_name("time").is_err());
    }

    #[test]
    #[should_panic(expected = "no axis named")]
    fn test_index_unknown_axis_panics() {
        let s = ramp();
        let _ = &s["pshift"];
    }

    #[test]
    fn test_from_harmonics_polar_form() {
        let harmonics = vec![Complex64::new(3.0, 4.0), Complex64::new(0.0, -2.0)];
        let f = FrequencySignal::from_harmonics(false, vec![1.0, 2.0], harmonics).unwrap();

        assert!((f.amplitude()[0] - 5.0).abs() < 1e-12);
        assert!((f.phase_shift()[1] + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(f.stored_harmonics().is_some());
    }

    #[test]
    fn test_harmonics_rebuilt_from_polar() {
        let f = FrequencySignal::new(
            false,
            vec![1.0, 2.0],
            vec![2.0, 1.0],
            vec![0.0, std::f64::consts::PI],
        )
        .unwrap();

        let h = f.harmonics();
        assert!((h[0].re - 2.0).abs() < 1e-12);
        assert!((h[1].re + 1.0).abs() < 1e-12);
        assert!(h[1].im.abs() < 1e-12);
    }

    #[test]
    fn test_compare_reflexive() {
        let s = Signal::from(ramp());
        assert_eq!(s.compare(&s), Ok(true));
    }

    #[test]
    fn test_compare_tolerance() {
        let a = Signal::from(ramp());
        let near = Signal::from(ramp().map_amplitude(|x| x + 5e-6));
        let far = Signal::from(ramp().map_amplitude(|x| x + 1e-3));

        assert_eq!(a.compare(&near), Ok(true));
        assert_eq!(a.compare(&far), Ok(false));
    }

    #[test]
    fn test_compare_structural_errors() {
        let a = Signal::from(ramp());

        let periodic = TimeSignal::new(true, vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(
            a.compare(&Signal::from(periodic)),
            Err(SignalError::PeriodicityMismatch)
        );

        let shorter = TimeSignal::new(false, vec![0.0], vec![1.0]).unwrap();
        assert!(matches!(
            a.compare(&Signal::from(shorter)),
            Err(SignalError::SampleCountMismatch { expected: 3, actual: 1 })
        ));

        let freq = FrequencySignal::new(false, vec![0.0; 3], vec![1.0; 3], vec![0.0; 3]).unwrap();
        assert!(matches!(
            a.compare(&Signal::from(freq)),
            Err(SignalError::DomainMismatch { .. })
        ));
    }

    #[test]
    fn test_as_time_domain_mismatch() {
        let f = Signal::from(FrequencySignal::new(false, vec![1.0], vec![1.0], vec![0.0]).unwrap());
        assert_eq!(
            f.as_time().unwrap_err(),
            SignalError::DomainMismatch {
                expected: Domain::Time,
                actual: Domain::Frequency
            }
        );
    }

    #[test]
    fn test_serde_tagged_by_domain() {
        let s = Signal::from(ramp());
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"domain\":\"time\""));

        let back: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_deserialize_validates_axes() {
        let empty = r#"{"domain":"time","periodic":false,"time":[],"amplitude":[]}"#;
        let err = serde_json::from_str::<Signal>(empty).unwrap_err();
        assert!(err.to_string().contains("at least one sample"));

        let ragged = r#"{"periodic":true,"time":[0.0,1.0],"amplitude":[1.0]}"#;
        assert!(serde_json::from_str::<TimeSignal>(ragged).is_err());

        let harmonics = r#"{"periodic":false,"frequency":[1.0],"amplitude":[1.0],
            "phase_shift":[0.0],"harmonics":[[1.0,0.0],[0.0,1.0]]}"#;
        assert!(serde_json::from_str::<FrequencySignal>(harmonics).is_err());
    }
}
