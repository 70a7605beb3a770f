//! Signal file parser and writer.
//!
//! Layout: three header lines (domain code, periodic flag, sample count)
//! followed by one whitespace-separated line per sample. Blank lines between
//! samples are skipped.

use crate::error::{FormatError, FormatResult};
use lib_types::{Domain, FrequencySignal, Signal, TimeSignal};
use nom::{
    character::complete::{digit1, space0, space1},
    combinator::{all_consuming, map_res},
    multi::separated_list1,
    number::complete::double,
    sequence::delimited,
    IResult, Parser,
};
use std::path::Path;

/// Parse a signal from file content.
pub fn parse_signal(content: &str) -> FormatResult<Signal> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')));

    let code = next_header(&mut lines, 1, "domain code")?;
    let domain = u8::try_from(code)
        .ok()
        .and_then(Domain::from_code)
        .ok_or_else(|| FormatError::header(1, format!("unknown domain code {}", code)))?;

    let periodic = match next_header(&mut lines, 2, "periodic flag")? {
        0 => false,
        1 => true,
        other => {
            return Err(FormatError::header(
                2,
                format!("periodic flag must be 0 or 1, got {}", other),
            ))
        }
    };

    let sample_count = usize::try_from(next_header(&mut lines, 3, "sample count")?)
        .map_err(|_| FormatError::header(3, "sample count out of range"))?;
    if sample_count == 0 {
        return Err(FormatError::header(3, "sample count must be positive"));
    }

    let expected = domain.column_count();
    // The header count is untrusted, so columns grow with the rows actually read.
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); expected];
    let mut read = 0;

    for (line_no, line) in lines.by_ref() {
        if line.trim().is_empty() {
            continue;
        }

        let (_, values) = sample_values(line).map_err(|e| {
            FormatError::syntax(line_no, format!("expected space-separated floats ({:?})", e))
        })?;
        if values.len() != expected {
            return Err(FormatError::ColumnCount {
                line: line_no,
                expected,
                actual: values.len(),
            });
        }

        for (column, value) in columns.iter_mut().zip(values) {
            column.push(value);
        }

        read += 1;
        if read == sample_count {
            break;
        }
    }

    if read < sample_count {
        return Err(FormatError::SampleCount {
            expected: sample_count,
            actual: read,
        });
    }

    if lines.any(|(_, line)| !line.trim().is_empty()) {
        tracing::warn!(
            "Ignoring content after the {} declared samples",
            sample_count
        );
    }

    let mut columns = columns.into_iter();
    let mut take = || columns.next().unwrap_or_default();

    let signal = match domain {
        Domain::Time => Signal::Time(TimeSignal::new(periodic, take(), take())?),
        Domain::Frequency => {
            Signal::Frequency(FrequencySignal::new(periodic, take(), take(), take())?)
        }
    };

    Ok(signal)
}

/// Read and parse a signal file.
pub fn read_signal(path: &Path) -> FormatResult<Signal> {
    if path.as_os_str().is_empty() {
        return Err(FormatError::EmptyPath);
    }

    let content = std::fs::read_to_string(path)?;
    let signal = parse_signal(&content)?;

    tracing::debug!(
        "Read {} {} samples from {:?}",
        signal.sample_count(),
        signal.domain(),
        path
    );

    Ok(signal)
}

/// Render a float the way sample lines carry it.
///
/// Shortest round-trip form that always keeps a decimal point (`1.0`,
/// `-0.05`, `1e-7`).
pub fn format_value(value: f64) -> String {
    format!("{:?}", value)
}

/// Render a header plus arbitrary rows of pre-formatted columns.
///
/// The sample count written is the number of rows.
pub fn write_rows<R, S>(domain: Domain, periodic: bool, rows: impl IntoIterator<Item = R>) -> String
where
    R: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let body: Vec<String> = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.as_ref().to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    let mut out = format!(
        "{}\n{}\n{}\n",
        domain.code(),
        if periodic { 1 } else { 0 },
        body.len()
    );
    for line in body {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Render a signal in file layout.
pub fn write_signal(signal: &Signal) -> String {
    let columns = signal.columns();
    let rows = (0..signal.sample_count()).map(|i| {
        columns
            .iter()
            .map(|column| format_value(column[i]))
            .collect::<Vec<_>>()
    });
    write_rows(signal.domain(), signal.is_periodic(), rows)
}

/// Write a signal file.
pub fn save_signal(signal: &Signal, path: &Path) -> FormatResult<()> {
    if path.as_os_str().is_empty() {
        return Err(FormatError::EmptyPath);
    }

    std::fs::write(path, write_signal(signal))?;
    tracing::debug!("Wrote {} samples to {:?}", signal.sample_count(), path);
    Ok(())
}

/// Write a header plus arbitrary rows, e.g. quantization results.
pub fn save_rows<R, S>(
    path: &Path,
    domain: Domain,
    periodic: bool,
    rows: impl IntoIterator<Item = R>,
) -> FormatResult<()>
where
    R: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if path.as_os_str().is_empty() {
        return Err(FormatError::EmptyPath);
    }

    std::fs::write(path, write_rows(domain, periodic, rows))?;
    Ok(())
}

// ============================================================================
// Nom Parsers
// ============================================================================

fn next_header<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    line_no: usize,
    what: &str,
) -> FormatResult<u64> {
    let (_, line) = lines
        .next()
        .ok_or_else(|| FormatError::header(line_no, format!("missing {}", what)))?;

    header_value(line)
        .map(|(_, value)| value)
        .map_err(|_| FormatError::header(line_no, format!("{} must be a non-negative integer", what)))
}

fn header_value(input: &str) -> IResult<&str, u64> {
    all_consuming(delimited(
        space0,
        map_res(digit1, |digits: &str| digits.parse::<u64>()),
        space0,
    ))
    .parse(input)
}

fn sample_values(input: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(delimited(space0, separated_list1(space1, double), space0)).parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TIME: &str = "0\n0\n3\n0 1.0\n1 2.0\n2 3.0\n";

    #[test]
    fn test_parse_time_signal() {
        let signal = parse_signal(SAMPLE_TIME).unwrap();
        let time = signal.as_time().unwrap();

        assert!(!time.is_periodic());
        assert_eq!(time.sample_count(), 3);
        assert_eq!(time.time(), &[0.0, 1.0, 2.0]);
        assert_eq!(time.amplitude(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_parse_frequency_signal() {
        let content = "1\n1\n2\n 0.5  2.0 -1.5707963\r\n1.0 1e-3 0\n";
        let signal = parse_signal(content).unwrap();
        let freq = signal.as_frequency().unwrap();

        assert!(freq.is_periodic());
        assert_eq!(freq.frequency(), &[0.5, 1.0]);
        assert_eq!(freq.amplitude(), &[2.0, 1e-3]);
        assert!((freq.phase_shift()[0] + 1.5707963).abs() < 1e-12);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let signal = parse_signal("0\n1\n2\n\n0 4\n\n1 5\n").unwrap();
        assert_eq!(signal.amplitude(), &[4.0, 5.0]);
        assert!(signal.is_periodic());
    }

    #[test]
    fn test_column_count_error() {
        let err = parse_signal("0\n0\n2\n0 1.0\n1 2.0 3.0\n").unwrap_err();
        assert!(matches!(
            err,
            FormatError::ColumnCount { line: 5, expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = parse_signal("0\n0\n2\n0 1.0\n1 abc\n").unwrap_err();
        assert!(matches!(err, FormatError::Syntax { line: 5, .. }));
    }

    #[test]
    fn test_header_errors() {
        assert!(matches!(
            parse_signal("2\n0\n1\n0 1\n").unwrap_err(),
            FormatError::Header { line: 1, .. }
        ));
        assert!(matches!(
            parse_signal("0\n3\n1\n0 1\n").unwrap_err(),
            FormatError::Header { line: 2, .. }
        ));
        assert!(matches!(
            parse_signal("0\n0\nx\n").unwrap_err(),
            FormatError::Header { line: 3, .. }
        ));
        assert!(matches!(
            parse_signal("0\n0\n").unwrap_err(),
            FormatError::Header { line: 3, .. }
        ));
        assert!(matches!(
            parse_signal("0\n0\n0\n").unwrap_err(),
            FormatError::Header { line: 3, .. }
        ));
    }

    #[test]
    fn test_missing_samples() {
        let err = parse_signal("0\n0\n3\n0 1.0\n").unwrap_err();
        assert!(matches!(
            err,
            FormatError::SampleCount { expected: 3, actual: 1 }
        ));
    }

    #[test]
    fn test_oversized_sample_count() {
        let err = parse_signal("0\n0\n18446744073709551615\n0 1.0\n").unwrap_err();
        assert!(matches!(err, FormatError::SampleCount { actual: 1, .. }));

        let err = parse_signal("1\n0\n1000000000000\n0.5 1.0 0.0\n").unwrap_err();
        assert!(matches!(err, FormatError::SampleCount { actual: 1, .. }));
    }

    #[test]
    fn test_write_header_exact() {
        let signal = parse_signal(SAMPLE_TIME).unwrap();
        assert_eq!(write_signal(&signal), "0\n0\n3\n0.0 1.0\n1.0 2.0\n2.0 3.0\n");
    }

    #[test]
    fn test_write_rows_counts_rows() {
        let out = write_rows(Domain::Time, true, vec![vec!["01", "0.5"], vec!["10", "1.5"]]);
        assert_eq!(out, "0\n1\n2\n01 0.5\n10 1.5\n");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1.0), "1.0");
        assert_eq!(format_value(-0.05), "-0.05");
        assert_eq!(format_value(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_save_and_read_file() {
        use crate::SignalFile;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signal.txt");

        let signal = parse_signal("1\n0\n2\n0.0 1.5 0.25\n3.14 2.0 -0.75\n").unwrap();
        signal.save(&path).unwrap();

        let back = Signal::read(&path).unwrap();
        assert_eq!(back, signal);
        assert_eq!(back.compare(&signal), Ok(true));
    }

    #[test]
    fn test_read_errors() {
        use crate::SignalFile;

        assert!(matches!(
            Signal::read("").unwrap_err(),
            FormatError::EmptyPath
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Signal::read(dir.path().join("missing.txt")).unwrap_err(),
            FormatError::Io(_)
        ));

        let path = dir.path().join("freq.txt");
        std::fs::write(&path, "1\n0\n1\n1.0 2.0 3.0\n").unwrap();
        assert!(matches!(
            TimeSignal::read(&path).unwrap_err(),
            FormatError::Signal(_)
        ));
    }
}
