//! # lib-dsp
//!
//! Classical DSP operations on [`lib_types`] signals.
//!
//! - **Arithmetic**: add, subtract, scale, square, normalize, running sum,
//!   shift, fold, differences and moving-average smoothing
//! - **Transforms**: direct DFT/IDFT, DCT and DC removal
//! - **Quantization**: uniform quantizers by bit depth or level count
//! - **FIR design**: windowed-sinc low/high/band-pass/band-stop filters
//! - **Convolution**: linear convolution and normalized cross-correlation
//! - **Resampling**: integer up/down sampling through a FIR filter
//!
//! Every operation takes its operands by reference and returns a new
//! signal.

pub mod align;
pub mod arithmetic;
pub mod convolution;
pub mod error;
pub mod fir;
pub mod generate;
pub mod quantize;
pub mod resample;
pub mod transform;
pub mod window;

pub use error::{DspError, DspResult};
pub use fir::{Cutoffs, FilterClass, FirFilter, FirSpec};
pub use generate::{generate_wave, WaveFunction};
pub use quantize::{quantize_by_bits, quantize_by_levels, BitQuantization, LevelQuantization};
pub use window::{select_window, Window, WindowType, WINDOWS};
