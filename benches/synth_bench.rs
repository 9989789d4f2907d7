//! Benchmarks for waveform synthesis.
//!
//! Run with: cargo bench
//!
//! Synthesis happens on every UI refresh, so a full redraw of five enabled
//! waveforms over the longest window must stay comfortably interactive.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use wavescope::dsp::envelope::{compute_max, compute_rms};
use wavescope::dsp::oscillator::{generate, WaveKind};
use wavescope::SAMPLE_RATE;

/// Window lengths from the shortest to the longest the UI allows.
const TIME_SPANS: &[f64] = &[0.1, 1.0, 10.0];

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/generate");
    for &span in TIME_SPANS {
        for kind in WaveKind::ALL {
            group.bench_with_input(
                BenchmarkId::new(kind.name(), span),
                &span,
                |b, &duration| {
                    b.iter(|| {
                        generate(
                            black_box(kind),
                            black_box(7.0),
                            black_box(5.0),
                            black_box(0.5),
                            black_box(50.0),
                            black_box(duration),
                            black_box(SAMPLE_RATE),
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_envelopes(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    for &span in TIME_SPANS {
        let signals: Vec<_> = (1..=5)
            .map(|i| {
                generate(
                    WaveKind::Sine,
                    i as f64,
                    5.0,
                    0.0,
                    50.0,
                    span,
                    SAMPLE_RATE,
                )
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("max", span), &signals, |b, signals| {
            b.iter(|| compute_max(black_box(signals)))
        });
        group.bench_with_input(BenchmarkId::new("rms", span), &signals, |b, signals| {
            b.iter(|| compute_rms(black_box(signals)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_envelopes);
criterion_main!(benches);
