//! Result output formatting and writing.

use crate::OutputFormat;
use anyhow::{Context, Result};
use lib_sigfile::{format_value, SignalFile};
use lib_types::{Domain, Signal};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Column data that is not itself a signal, e.g. quantization results.
pub struct Table {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    /// Periodic flag written to the header in text form.
    pub periodic: bool,
}

/// Save `signal` to `output` in file layout, or print it in `format`.
pub fn emit_signal(signal: &Signal, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    match output {
        Some(path) => {
            signal
                .save(path)
                .with_context(|| format!("Failed to write signal file: {:?}", path))?;
            tracing::info!(
                "Wrote {} {} samples to {:?}",
                signal.sample_count(),
                signal.domain(),
                path
            );
            Ok(())
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            render_signal(&mut out, signal, format)
        }
    }
}

/// Render a signal in `format`.
pub fn render_signal<W: Write>(w: &mut W, signal: &Signal, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            write!(w, "{}", lib_sigfile::write_signal(signal))?;
        }
        OutputFormat::Json => {
            writeln!(w, "{}", serde_json::to_string_pretty(signal)?)?;
        }
        OutputFormat::Csv => {
            let names: &[&str] = match signal.domain() {
                Domain::Time => &["time", "amp"],
                Domain::Frequency => &["freq", "amp", "pshift"],
            };
            writeln!(w, "{}", names.join(","))?;

            let columns = signal.columns();
            for i in 0..signal.sample_count() {
                let row: Vec<String> = columns.iter().map(|c| format_value(c[i])).collect();
                writeln!(w, "{}", row.join(","))?;
            }
        }
    }
    Ok(())
}

/// Save a table in file layout, or print it in `format`.
///
/// `json` is what the JSON format prints, usually the full result the table
/// was built from.
pub fn emit_table<T: Serialize>(
    table: &Table,
    json: &T,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    match output {
        Some(path) => {
            lib_sigfile::save_rows(path, Domain::Time, table.periodic, &table.rows)
                .with_context(|| format!("Failed to write results: {:?}", path))?;
            tracing::info!("Wrote {} rows to {:?}", table.rows.len(), path);
            Ok(())
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            render_table(&mut out, table, json, format)
        }
    }
}

/// Render a table in `format`.
pub fn render_table<W: Write, T: Serialize>(
    w: &mut W,
    table: &Table,
    json: &T,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            write!(
                w,
                "{}",
                lib_sigfile::write_rows(Domain::Time, table.periodic, &table.rows)
            )?;
        }
        OutputFormat::Json => {
            writeln!(w, "{}", serde_json::to_string_pretty(json)?)?;
        }
        OutputFormat::Csv => {
            writeln!(w, "{}", table.columns.join(","))?;
            for row in &table.rows {
                writeln!(w, "{}", row.join(","))?;
            }
        }
    }
    Ok(())
}

/// Print a single verdict, e.g. the result of `compare`.
pub fn print_verdict<W: Write>(w: &mut W, name: &str, value: bool, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(w, "{}", value)?,
        OutputFormat::Json => writeln!(w, "{}", serde_json::json!({ name: value }))?,
        OutputFormat::Csv => {
            writeln!(w, "{}", name)?;
            writeln!(w, "{}", value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_types::{FrequencySignal, TimeSignal};

    fn time_signal() -> Signal {
        TimeSignal::from_amplitudes(false, 0.0, vec![1.0, 4.0, 9.0])
            .unwrap()
            .into()
    }

    fn render(signal: &Signal, format: OutputFormat) -> String {
        let mut buf = Vec::new();
        render_signal(&mut buf, signal, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_is_file_layout() {
        assert_eq!(
            render(&time_signal(), OutputFormat::Text),
            "0\n0\n3\n0.0 1.0\n1.0 4.0\n2.0 9.0\n"
        );
    }

    #[test]
    fn test_csv_columns() {
        let freq: Signal = FrequencySignal::new(true, vec![0.5], vec![2.0], vec![-1.0])
            .unwrap()
            .into();
        assert_eq!(render(&freq, OutputFormat::Csv), "freq,amp,pshift\n0.5,2.0,-1.0\n");
        assert!(render(&time_signal(), OutputFormat::Csv).starts_with("time,amp\n0.0,1.0\n"));
    }

    #[test]
    fn test_json_tagged_by_domain() {
        let json: serde_json::Value =
            serde_json::from_str(&render(&time_signal(), OutputFormat::Json)).unwrap();

        assert_eq!(json["domain"], "time");
        assert_eq!(json["amplitude"][2], 9.0);
    }

    #[test]
    fn test_table_text_and_csv() {
        let table = Table {
            columns: vec!["code", "midpoint"],
            rows: vec![
                vec!["0".into(), "-0.525".into()],
                vec!["1".into(), "0.425".into()],
            ],
            periodic: false,
        };

        let mut text = Vec::new();
        render_table(&mut text, &table, &(), OutputFormat::Text).unwrap();
        assert_eq!(String::from_utf8(text).unwrap(), "0\n0\n2\n0 -0.525\n1 0.425\n");

        let mut csv = Vec::new();
        render_table(&mut csv, &table, &(), OutputFormat::Csv).unwrap();
        assert_eq!(String::from_utf8(csv).unwrap(), "code,midpoint\n0,-0.525\n1,0.425\n");
    }

    #[test]
    fn test_verdict() {
        let mut buf = Vec::new();
        print_verdict(&mut buf, "equal", true, OutputFormat::Json).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\"equal\":true}\n");
    }
}
