//! dsp: command-line front-end for the signal toolkit.
//!
//! Every subcommand reads its operands from signal files, runs one
//! operation and either saves the result (`--output`) or prints it.

mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::FilterArgs;
use lib_dsp::{arithmetic, convolution, resample, transform, FirFilter, WaveFunction};
use lib_sigfile::{format_value, SignalFile};
use lib_types::{Signal, TimeSignal};
use output::Table;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "dsp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format for printed results
    #[arg(short, long, default_value = "text", global = true)]
    format: OutputFormat,

    /// Save the result to this signal file instead of printing it
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum WaveArg {
    #[default]
    Sine,
    Cosine,
}

impl From<WaveArg> for WaveFunction {
    fn from(wave: WaveArg) -> Self {
        match wave {
            WaveArg::Sine => WaveFunction::Sine,
            WaveArg::Cosine => WaveFunction::Cosine,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print a signal file
    Show {
        input: PathBuf,
    },

    /// Add two time signals sample by sample
    Add {
        a: PathBuf,
        b: PathBuf,
    },

    /// Absolute difference of two time signals
    Sub {
        a: PathBuf,
        b: PathBuf,
    },

    /// Multiply amplitudes by a constant
    Scale {
        input: PathBuf,

        #[arg(short = 'k', long, allow_negative_numbers = true)]
        factor: f64,
    },

    /// Square every amplitude
    Square {
        input: PathBuf,
    },

    /// Divide amplitudes by the peak magnitude
    Normalize {
        input: PathBuf,
    },

    /// Running sum of the amplitudes
    Cumsum {
        input: PathBuf,
    },

    /// Relabel the time axis: t -> t - k
    Shift {
        input: PathBuf,

        #[arg(short, long, allow_negative_numbers = true)]
        k: i64,
    },

    /// Mirror a signal around t = 0
    Fold {
        input: PathBuf,
    },

    /// First or second difference
    Derivative {
        input: PathBuf,

        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
        order: u8,
    },

    /// DFT of a time signal, or IDFT of a frequency signal
    Dft {
        input: PathBuf,

        /// Sampling frequency (Hz), time signals only
        #[arg(long)]
        fs: Option<f64>,
    },

    /// Discrete cosine transform
    Dct {
        input: PathBuf,

        /// Sampling frequency (Hz)
        #[arg(long, default_value_t = transform::DEFAULT_SAMPLING_FREQUENCY)]
        fs: f64,
    },

    /// Moving average
    Smooth {
        input: PathBuf,

        /// Window length in samples
        #[arg(short, long)]
        window: usize,
    },

    /// Remove the DC component
    RemoveDc {
        input: PathBuf,
    },

    /// Linear convolution
    Convolve {
        a: PathBuf,
        b: PathBuf,
    },

    /// Normalized cross-correlation
    Correlate {
        a: PathBuf,
        b: PathBuf,
    },

    /// Uniform quantization
    Quantize {
        input: PathBuf,

        /// Bit depth (2^bits levels)
        #[arg(long, conflicts_with = "levels", required_unless_present = "levels")]
        bits: Option<u32>,

        /// Number of levels
        #[arg(long)]
        levels: Option<usize>,
    },

    /// Design a FIR filter and print its taps
    Fir {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Run a signal through a FIR filter
    Filter {
        input: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Change the sample rate by up/down through a FIR filter
    Resample {
        input: PathBuf,

        /// Upsampling factor
        #[arg(long, default_value_t = 1)]
        up: usize,

        /// Downsampling factor
        #[arg(long, default_value_t = 1)]
        down: usize,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Generate one second of a sampled sinusoid
    Generate {
        #[arg(long, value_enum, default_value = "sine")]
        wave: WaveArg,

        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        amplitude: f64,

        /// Analog frequency (Hz)
        #[arg(long)]
        frequency: f64,

        /// Sampling frequency (Hz)
        #[arg(long)]
        fs: f64,

        /// Phase shift (rad)
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        phase: f64,
    },

    /// Compare amplitudes of two signals within 1e-5
    Compare {
        a: PathBuf,
        b: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let output = cli.output.as_deref();
    let format = cli.format;

    let result: Signal = match &cli.command {
        Commands::Show { input } => read_signal(input)?,
        Commands::Add { a, b } => arithmetic::add(&read_signal(a)?, &read_signal(b)?)?.into(),
        Commands::Sub { a, b } => arithmetic::sub(&read_signal(a)?, &read_signal(b)?)?.into(),
        Commands::Scale { input, factor } => arithmetic::scale(&read_time(input)?, *factor).into(),
        Commands::Square { input } => arithmetic::square(&read_time(input)?).into(),
        Commands::Normalize { input } => arithmetic::normalize(&read_time(input)?).into(),
        Commands::Cumsum { input } => arithmetic::cumulative_sum(&read_time(input)?).into(),
        Commands::Shift { input, k } => arithmetic::shift(&read_time(input)?, *k).into(),
        Commands::Fold { input } => arithmetic::fold(&read_time(input)?).into(),
        Commands::Derivative { input, order } => {
            let signal = read_time(input)?;
            let derivative = match *order {
                1 => arithmetic::first_derivative(&signal)?,
                _ => arithmetic::second_derivative(&signal)?,
            };
            derivative.into()
        }
        Commands::Dft { input, fs } => transform::switch_domain(&read_signal(input)?, *fs)?,
        Commands::Dct { input, fs } => transform::dct(&read_time(input)?, *fs)?.into(),
        Commands::Smooth { input, window } => arithmetic::smooth(&read_time(input)?, *window)?.into(),
        Commands::RemoveDc { input } => transform::remove_dc(&read_signal(input)?)?,
        Commands::Convolve { a, b } => convolution::convolve(&read_time(a)?, &read_time(b)?)?.into(),
        Commands::Correlate { a, b } => {
            convolution::correlate(&read_time(a)?, &read_time(b)?)?.into()
        }
        Commands::Quantize {
            input,
            bits,
            levels,
        } => return quantize(&read_time(input)?, *bits, *levels, output, format),
        Commands::Fir { filter } => return design_filter(filter, output, format),
        Commands::Filter { input, filter } => {
            let filter = build_filter(filter)?;
            filter.apply(&read_time(input)?)?.into()
        }
        Commands::Resample {
            input,
            up,
            down,
            filter,
        } => {
            let filter = build_filter(filter)?;
            resample::resample(&read_time(input)?, *up, *down, &filter)?.into()
        }
        Commands::Generate {
            wave,
            amplitude,
            frequency,
            fs,
            phase,
        } => lib_dsp::generate_wave((*wave).into(), *amplitude, *frequency, *fs, *phase)?.into(),
        Commands::Compare { a, b } => {
            let equal = read_signal(a)?
                .compare(&read_signal(b)?)
                .context("Signals are not comparable")?;
            let stdout = std::io::stdout();
            return output::print_verdict(&mut stdout.lock(), "equal", equal, format);
        }
    };

    output::emit_signal(&result, output, format)
}

fn read_signal(path: &Path) -> Result<Signal> {
    tracing::info!("Reading signal from {:?}", path);
    Signal::read(path).with_context(|| format!("Failed to read signal file: {:?}", path))
}

fn read_time(path: &Path) -> Result<TimeSignal> {
    tracing::info!("Reading time signal from {:?}", path);
    TimeSignal::read(path).with_context(|| format!("Expected a time-domain signal in {:?}", path))
}

fn build_filter(args: &FilterArgs) -> Result<FirFilter> {
    let spec = args.resolve()?;
    let filter = FirFilter::new(spec).context("Failed to design FIR filter")?;

    tracing::info!(
        "{} filter: {} window, {} taps",
        filter.spec().class,
        filter.window().name(),
        filter.coefficient_count()
    );
    Ok(filter)
}

fn design_filter(args: &FilterArgs, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    let filter = build_filter(args)?;
    let taps: Signal = filter.to_signal()?.into();

    match (output, format) {
        (None, OutputFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(&filter)?);
            Ok(())
        }
        _ => output::emit_signal(&taps, output, format),
    }
}

fn quantize(
    signal: &TimeSignal,
    bits: Option<u32>,
    levels: Option<usize>,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let periodic = signal.is_periodic();

    match (bits, levels) {
        (Some(bits), _) => {
            let q = lib_dsp::quantize_by_bits(signal, bits)?;
            let table = Table {
                columns: vec!["code", "midpoint"],
                rows: q
                    .codes
                    .iter()
                    .zip(&q.midpoints)
                    .map(|(code, &mid)| vec![code.clone(), format_value(mid)])
                    .collect(),
                periodic,
            };
            output::emit_table(&table, &q, output, format)
        }
        (None, Some(levels)) => {
            let q = lib_dsp::quantize_by_levels(signal, levels)?;
            tracing::info!("Mean squared quantization error: {}", q.mean_squared_error());

            let rows = (0..q.codes.len())
                .map(|i| {
                    vec![
                        q.level_numbers[i].to_string(),
                        q.codes[i].clone(),
                        format_value(q.midpoints[i]),
                        format_value(q.errors[i]),
                    ]
                })
                .collect();
            let table = Table {
                columns: vec!["level", "code", "midpoint", "error"],
                rows,
                periodic,
            };
            output::emit_table(&table, &q, output, format)
        }
        (None, None) => anyhow::bail!("Either --bits or --levels is required"),
    }
}
