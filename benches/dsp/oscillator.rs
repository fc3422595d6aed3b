//! Benchmarks for the wavetable oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use squelch::dsp::oscillator::{Oscillator, Wavetables};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let tables = Wavetables::default();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, index) in [("saw", 0), ("square", 1)] {
            let mut osc = Oscillator::new();
            let table = tables.get(index);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = osc.next_sample(table, black_box(110.0), 48_000.0);
                    }
                })
            });
        }
    }

    group.finish();
}
