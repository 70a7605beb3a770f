//! Uniform amplitude quantization.
//!
//! The amplitude range `[min, max]` of a signal is split into `L` equal
//! levels. Level `i` covers `[b[i], b[i+1])` and is represented by its
//! midpoint. The top level is closed, so the maximum sample always lands in
//! level `L - 1`.
//!
//! ```text
//! b[0]=min      b[1]        b[2]   ...   b[L]=max
//!   |  level 0   |  level 1  |     ...    |
//! ```

use crate::error::{DspError, DspResult};
use lib_types::TimeSignal;
use serde::Serialize;

/// Largest bit depth accepted by [`quantize_by_bits`]. Level counts are
/// capped at `2^MAX_BIT_COUNT` to keep the level tables allocatable.
pub const MAX_BIT_COUNT: u32 = 24;

/// Level layout over an amplitude range.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuantizationLevels {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// `L + 1` ascending boundaries.
    pub boundaries: Vec<f64>,
    /// `L` level midpoints.
    pub midpoints: Vec<f64>,
}

impl QuantizationLevels {
    /// Split the amplitude range of `samples` into `level_count` levels.
    pub fn over(samples: &[f64], level_count: usize) -> Self {
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let step = (max - min) / level_count as f64;

        let boundaries: Vec<f64> = (0..=level_count).map(|i| min + step * i as f64).collect();
        let midpoints = boundaries.windows(2).map(|b| (b[0] + b[1]) / 2.0).collect();

        Self {
            min,
            max,
            step,
            boundaries,
            midpoints,
        }
    }

    #[inline]
    pub fn level_count(&self) -> usize {
        self.midpoints.len()
    }

    /// Zero-based level holding `x`.
    ///
    /// First `i` with `b[i] <= x < b[i+1]` among the lower levels, otherwise
    /// the top level.
    pub fn find_level(&self, x: f64) -> usize {
        let top = self.level_count() - 1;
        (0..top)
            .find(|&i| self.boundaries[i] <= x && x < self.boundaries[i + 1])
            .unwrap_or(top)
    }
}

/// Result of [`quantize_by_bits`], one entry per sample.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BitQuantization {
    pub bit_count: u32,
    pub levels: QuantizationLevels,
    /// Zero-padded binary level index.
    pub codes: Vec<String>,
    pub midpoints: Vec<f64>,
}

impl BitQuantization {
    /// Quantized samples on the time axis of `source`.
    pub fn quantized_signal(&self, source: &TimeSignal) -> DspResult<TimeSignal> {
        Ok(source.with_amplitude(self.midpoints.clone())?)
    }
}

/// Result of [`quantize_by_levels`], one entry per sample.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelQuantization {
    pub bit_count: u32,
    pub levels: QuantizationLevels,
    /// One-based level number.
    pub level_numbers: Vec<usize>,
    pub codes: Vec<String>,
    pub midpoints: Vec<f64>,
    /// `midpoint - sample`.
    pub errors: Vec<f64>,
}

impl LevelQuantization {
    /// Quantized samples on the time axis of `source`.
    pub fn quantized_signal(&self, source: &TimeSignal) -> DspResult<TimeSignal> {
        Ok(source.with_amplitude(self.midpoints.clone())?)
    }

    /// Mean squared quantization error.
    pub fn mean_squared_error(&self) -> f64 {
        self.errors.iter().map(|e| e * e).sum::<f64>() / self.errors.len() as f64
    }
}

/// Quantize with `2^bit_count` levels.
pub fn quantize_by_bits(signal: &TimeSignal, bit_count: u32) -> DspResult<BitQuantization> {
    if bit_count == 0 || bit_count > MAX_BIT_COUNT {
        return Err(DspError::InvalidConfig(format!(
            "bit count must be between 1 and {}, got {}",
            MAX_BIT_COUNT, bit_count
        )));
    }

    let levels = QuantizationLevels::over(signal.amplitude(), 1usize << bit_count);
    log_levels(&levels);

    let (codes, midpoints) = signal
        .amplitude()
        .iter()
        .map(|&x| {
            let level = levels.find_level(x);
            (binary_code(level, bit_count), levels.midpoints[level])
        })
        .unzip();

    Ok(BitQuantization {
        bit_count,
        levels,
        codes,
        midpoints,
    })
}

/// Quantize with `level_count` levels, encoded in `ceil(log2(level_count))` bits.
pub fn quantize_by_levels(signal: &TimeSignal, level_count: usize) -> DspResult<LevelQuantization> {
    if level_count < 2 || level_count > 1usize << MAX_BIT_COUNT {
        return Err(DspError::InvalidConfig(format!(
            "level count must be between 2 and {}, got {}",
            1usize << MAX_BIT_COUNT,
            level_count
        )));
    }

    let bit_count = bits_for_levels(level_count);
    let levels = QuantizationLevels::over(signal.amplitude(), level_count);
    log_levels(&levels);

    let count = signal.sample_count();
    let mut level_numbers = Vec::with_capacity(count);
    let mut codes = Vec::with_capacity(count);
    let mut midpoints = Vec::with_capacity(count);
    let mut errors = Vec::with_capacity(count);

    for &x in signal.amplitude() {
        let level = levels.find_level(x);
        let midpoint = levels.midpoints[level];

        level_numbers.push(level + 1);
        codes.push(binary_code(level, bit_count));
        midpoints.push(midpoint);
        errors.push(midpoint - x);
    }

    Ok(LevelQuantization {
        bit_count,
        levels,
        level_numbers,
        codes,
        midpoints,
        errors,
    })
}

/// `ceil(log2(level_count))` for `level_count >= 2`.
fn bits_for_levels(level_count: usize) -> u32 {
    usize::BITS - (level_count - 1).leading_zeros()
}

fn binary_code(level: usize, width: u32) -> String {
    format!("{:0width$b}", level, width = width as usize)
}

fn log_levels(levels: &QuantizationLevels) {
    if levels.step == 0.0 {
        tracing::warn!("Constant signal: every sample maps to the top level");
    }
    tracing::debug!(
        "Quantizing [{}, {}] into {} levels of width {}",
        levels.min,
        levels.max,
        levels.level_count(),
        levels.step
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(amp: &[f64]) -> TimeSignal {
        TimeSignal::from_amplitudes(false, 0.0, amp.to_vec()).unwrap()
    }

    #[test]
    fn test_one_bit_boundaries_and_codes() {
        let q = quantize_by_bits(&ts(&[-1.0, 0.0, 0.9]), 1).unwrap();

        let expected = [-1.0, -0.05, 0.9];
        for (b, e) in q.levels.boundaries.iter().zip(expected) {
            assert!((b - e).abs() < 1e-12, "{} vs {}", b, e);
        }
        assert_eq!(q.codes, vec!["0", "1", "1"]);
        assert!((q.midpoints[0] + 0.525).abs() < 1e-12);
        assert!((q.midpoints[2] - 0.425).abs() < 1e-12);
    }

    #[test]
    fn test_maximum_lands_in_top_level() {
        let samples = [0.0, 0.25, 0.5, 0.75, 1.0];
        let q = quantize_by_bits(&ts(&samples), 2).unwrap();

        assert_eq!(q.levels.find_level(1.0), 3);
        assert_eq!(q.codes, vec!["00", "01", "10", "11", "11"]);
    }

    #[test]
    fn test_levels_properties() {
        let samples = [0.1, -2.3, 4.4, 3.3, 0.0, -1.1, 2.2, 4.39];
        let q = quantize_by_levels(&ts(&samples), 5).unwrap();

        assert_eq!(q.bit_count, 3);
        for i in 0..samples.len() {
            assert!((1..=5).contains(&q.level_numbers[i]));
            assert_eq!(q.codes[i].len(), 3);
            assert!(q.errors[i].abs() <= q.levels.step / 2.0 + 1e-12);
            assert!((q.errors[i] - (q.midpoints[i] - samples[i])).abs() < 1e-12);
        }
    }

    #[test]
    fn test_levels_one_based_and_code_matches() {
        let q = quantize_by_levels(&ts(&[0.0, 1.0, 2.0, 3.0]), 4).unwrap();

        assert_eq!(q.level_numbers, vec![1, 2, 3, 4]);
        assert_eq!(q.codes, vec!["00", "01", "10", "11"]);
    }

    #[test]
    fn test_bits_for_levels() {
        assert_eq!(bits_for_levels(2), 1);
        assert_eq!(bits_for_levels(3), 2);
        assert_eq!(bits_for_levels(4), 2);
        assert_eq!(bits_for_levels(5), 3);
        assert_eq!(bits_for_levels(1024), 10);
    }

    #[test]
    fn test_invalid_arguments() {
        let s = ts(&[1.0, 2.0]);
        assert!(matches!(quantize_by_bits(&s, 0), Err(DspError::InvalidConfig(_))));
        assert!(matches!(quantize_by_bits(&s, 40), Err(DspError::InvalidConfig(_))));
        assert!(matches!(quantize_by_levels(&s, 1), Err(DspError::InvalidConfig(_))));
    }

    #[test]
    fn test_bit_depth_cap() {
        let s = ts(&[1.0, 2.0]);
        assert!(quantize_by_bits(&s, MAX_BIT_COUNT - 8).is_ok());
        assert!(matches!(
            quantize_by_bits(&s, MAX_BIT_COUNT + 1),
            Err(DspError::InvalidConfig(_))
        ));
        assert!(matches!(quantize_by_bits(&s, 31), Err(DspError::InvalidConfig(_))));
        assert!(matches!(
            quantize_by_levels(&s, (1usize << MAX_BIT_COUNT) + 1),
            Err(DspError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_quantized_signal_keeps_time_axis() {
        let s = TimeSignal::from_amplitudes(true, 5.0, vec![0.0, 1.0]).unwrap();
        let q = quantize_by_bits(&s, 1).unwrap();

        let out = q.quantized_signal(&s).unwrap();
        assert_eq!(out.time(), s.time());
        assert_eq!(out.amplitude(), &[0.25, 0.75]);
        assert!(out.is_periodic());
    }

    #[test]
    fn test_constant_signal() {
        let q = quantize_by_levels(&ts(&[2.0, 2.0]), 4).unwrap();
        assert_eq!(q.level_numbers, vec![4, 4]);
        assert!(q.errors.iter().all(|e| e.abs() < 1e-12));
        assert_eq!(q.mean_squared_error(), 0.0);
    }
}
