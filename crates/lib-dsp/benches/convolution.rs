//! Convolution and correlation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lib_dsp::convolution::{correlate, direct_convolve};
use lib_dsp::{FirFilter, FirSpec};
use lib_types::TimeSignal;

fn bench_convolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolution");

    // Kernel length matches a 50 dB low-pass with a 500 Hz band at 8 kHz.
    let kernel: Vec<f64> = (0..53).map(|i| (-i as f64 * 0.1).exp()).collect();

    for signal_len in [256, 1024, 4096].iter() {
        let signal: Vec<f64> = (0..*signal_len).map(|i| (i as f64 * 0.01).sin()).collect();

        group.bench_with_input(
            BenchmarkId::new("direct", signal_len),
            &(&signal, &kernel),
            |b, (s, k)| {
                b.iter(|| direct_convolve(black_box(s), black_box(k)));
            },
        );
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("fir");

    group.bench_function("design", |b| {
        b.iter(|| FirFilter::new(black_box(FirSpec::low_pass(8000.0, 70.0, 50.0, 1500.0))));
    });

    let filter = FirFilter::new(FirSpec::low_pass(8000.0, 50.0, 500.0, 1500.0)).unwrap();
    let signal =
        TimeSignal::from_amplitudes(false, 0.0, (0..1024).map(|i| (i as f64 * 0.3).sin()).collect())
            .unwrap();

    group.bench_function("apply_1024", |b| {
        b.iter(|| filter.apply(black_box(&signal)));
    });

    group.bench_function("correlate_1024", |b| {
        b.iter(|| correlate(black_box(&signal), black_box(&signal)));
    });

    group.finish();
}

criterion_group!(benches, bench_convolution, bench_filter);
criterion_main!(benches);
