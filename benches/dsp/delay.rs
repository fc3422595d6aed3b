//! Benchmarks for the feedback delay line.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use squelch::dsp::delay::{step_delay_samples, DelayLine};

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");
    let delay_samples = step_delay_samples(0.75, 0.125, 48_000.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut line = DelayLine::new();

        group.bench_with_input(BenchmarkId::new("step_echo", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let input = if i == 0 { 1.0 } else { 0.0 };
                    *sample = line.next_sample(input, black_box(delay_samples), 0.35);
                }
            })
        });
    }

    group.finish();
}
