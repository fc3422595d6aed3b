//! Benchmarks for waveshaping drive.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use squelch::dsp::distortion::{drive_gain, saturate_buffer};

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.05).sin())
            .collect();
        let mut buffer = input.clone();

        for (name, amount) in [("light", 0.1), ("heavy", 1.0)] {
            let gain = drive_gain(amount);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    saturate_buffer(black_box(&mut buffer), black_box(gain));
                })
            });
        }
    }

    group.finish();
}
