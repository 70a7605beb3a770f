//! FIR filter configuration loading.
//!
//! Filter parameters come from an optional TOML or JSON file with a
//! `[filter]` table, overlaid by command-line flags.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use lib_dsp::{FilterClass, FirSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterFile {
    #[serde(default)]
    pub filter: FilterSection,
}

/// `[filter]` table. Every field may be left for the command line.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    pub class: Option<FilterClass>,
    pub sampling_frequency: Option<f64>,
    pub stopband_attenuation: Option<f64>,
    pub transition_band: Option<f64>,
    pub cutoff: Option<f64>,
    pub low_cutoff: Option<f64>,
    pub high_cutoff: Option<f64>,
}

/// Filter class as spelled on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FilterClassArg {
    LowPass,
    HighPass,
    BandPass,
    BandStop,
}

impl From<FilterClassArg> for FilterClass {
    fn from(class: FilterClassArg) -> Self {
        match class {
            FilterClassArg::LowPass => FilterClass::LowPass,
            FilterClassArg::HighPass => FilterClass::HighPass,
            FilterClassArg::BandPass => FilterClass::BandPass,
            FilterClassArg::BandStop => FilterClass::BandStop,
        }
    }
}

/// Filter flags shared by `fir`, `filter` and `resample`.
#[derive(Clone, Debug, Default, Args)]
pub struct FilterArgs {
    /// TOML or JSON file with a [filter] table
    #[arg(long = "filter-config")]
    pub config: Option<PathBuf>,

    /// Filter class
    #[arg(long, value_enum)]
    pub class: Option<FilterClassArg>,

    /// Sampling frequency (Hz)
    #[arg(long)]
    pub fs: Option<f64>,

    /// Minimum stopband attenuation (dB)
    #[arg(long)]
    pub attenuation: Option<f64>,

    /// Transition band width (Hz)
    #[arg(long)]
    pub transition: Option<f64>,

    /// Cutoff for low-pass and high-pass filters (Hz)
    #[arg(long)]
    pub cutoff: Option<f64>,

    /// Lower edge for band filters (Hz)
    #[arg(long)]
    pub low_cutoff: Option<f64>,

    /// Upper edge for band filters (Hz)
    #[arg(long)]
    pub high_cutoff: Option<f64>,
}

impl FilterArgs {
    /// Merge the config file (if any) with the flags into a filter spec.
    pub fn resolve(&self) -> Result<FirSpec> {
        let file = match &self.config {
            Some(path) => load_config(path)?,
            None => FilterFile::default(),
        };
        self.overlay(file.filter)
    }

    fn overlay(&self, base: FilterSection) -> Result<FirSpec> {
        let class = self
            .class
            .map(FilterClass::from)
            .or(base.class)
            .context("Filter class is required (--class or filter.class)")?;

        let spec = FirSpec {
            class,
            sampling_frequency: self
                .fs
                .or(base.sampling_frequency)
                .context("Sampling frequency is required (--fs or filter.sampling_frequency)")?,
            stopband_attenuation: self
                .attenuation
                .or(base.stopband_attenuation)
                .context(
                    "Stopband attenuation is required (--attenuation or filter.stopband_attenuation)",
                )?,
            transition_band: self
                .transition
                .or(base.transition_band)
                .context("Transition band is required (--transition or filter.transition_band)")?,
            cutoff: self.cutoff.or(base.cutoff),
            low_cutoff: self.low_cutoff.or(base.low_cutoff),
            high_cutoff: self.high_cutoff.or(base.high_cutoff),
        };

        if class.is_band() && spec.cutoff.is_some() {
            tracing::warn!("Ignoring single cutoff for {} filter", class);
        } else if !class.is_band() && (spec.low_cutoff.is_some() || spec.high_cutoff.is_some()) {
            tracing::warn!("Ignoring band edges for {} filter", class);
        }

        spec.validate()
            .with_context(|| format!("Invalid {} filter parameters", class))?;
        Ok(spec)
    }
}

/// Load a filter configuration file, TOML unless the extension is `json`.
pub fn load_config(path: &Path) -> Result<FilterFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: FilterFile = if path.extension().map_or(false, |e| e == "json") {
        serde_json::from_str(&content)
            .with_context(|| "Failed to parse config as JSON")?
    } else {
        toml::from_str(&content)
            .with_context(|| "Failed to parse config as TOML")?
    };

    tracing::info!("Loaded filter configuration from {:?}", path);
    Ok(config)
}
