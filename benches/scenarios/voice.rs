//! Benchmarks for the full bass voice chain.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use squelch::dsp::Wavetables;
use squelch::synth::{Articulation, BassVoice, VoiceConfig};

use crate::BLOCK_SIZES;

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voice");
    let tables = Arc::new(Wavetables::default());

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Clean: no drive, no delay
        let mut clean = BassVoice::new(Arc::clone(&tables), 48_000.0, VoiceConfig::default());
        clean.note_on(36, 100);
        group.bench_with_input(BenchmarkId::new("clean", size), &size, |b, _| {
            b.iter(|| clean.render_block(black_box(&mut buffer)))
        });

        // Everything on, sliding accented notes
        let mut full = BassVoice::new(Arc::clone(&tables), 48_000.0, VoiceConfig::default());
        full.set_drive(0.8);
        full.set_drive_mix(0.6);
        full.set_delay_mix(0.3);
        full.set_resonance(3.5);
        let mut note = 36;
        group.bench_with_input(BenchmarkId::new("full_chain", size), &size, |b, _| {
            b.iter(|| {
                note = if note >= 48 { 36 } else { note + 1 };
                full.trigger(note, Articulation { accent: true, slide: true });
                full.render_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
