//! Benchmarks for the amplitude envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use squelch::dsp::envelope::Envelope;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Pluck shape as the voice uses it, retriggered each block
        let mut env = Envelope::adsr(0.02, 0.25, 0.0, 0.02);
        group.bench_with_input(BenchmarkId::new("pluck", size), &size, |b, _| {
            b.iter(|| {
                env.note_on();
                for sample in buffer.iter_mut() {
                    *sample = env.next_sample(black_box(48_000.0));
                }
            })
        });
    }

    group.finish();
}
