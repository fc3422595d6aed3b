//! Benchmarks for one pass of the control loop: knobs, then sequencer.

use std::hint::black_box;
use std::sync::Arc;

use criterion::Criterion;
use squelch::dsp::Wavetables;
use squelch::params::{DisplayFormat, Param, ParamSet};
use squelch::sequencing::{ManualClock, SequencerConfig, StepPattern, StepSequencer};
use squelch::synth::{BassVoice, VoiceConfig, VoiceParam};

pub fn bench_control(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/control");
    let dec = DisplayFormat::Decimal { precision: 2 };

    let mut voice = BassVoice::new(Arc::new(Wavetables::default()), 48_000.0, VoiceConfig::default());
    let mut params = ParamSet::new(
        vec![
            Param::new("cutoff", 4000.0, 200.0, 6000.0, DisplayFormat::Integer { width: 4 })
                .bound_to(VoiceParam::Cutoff),
            Param::new("envmod", 0.5, 0.0, 1.0, dec).bound_to(VoiceParam::EnvDepth),
            Param::new("resQ", 1.0, 0.5, 4.0, dec).bound_to(VoiceParam::Resonance),
            Param::new("decay", 0.5, 0.0, 1.0, dec).bound_to(VoiceParam::Decay),
        ],
        2,
    )
    .expect("two knob-sets of two");

    let clock = ManualClock::new();
    let pattern = StepPattern::from_lanes(&[36, 36, 48, 36], &[127, 80, 80, 1]).expect("valid lanes");
    let mut sequencer =
        StepSequencer::new(clock.clone(), vec![pattern], SequencerConfig::default()).expect("one pattern");
    sequencer.start();

    let mut knob = 0.0f32;
    group.bench_function("poll", |b| {
        b.iter(|| {
            knob = (knob + 0.001) % 1.0;
            clock.advance(0.001);
            params.update_controls(black_box(&[knob, 1.0 - knob]));
            params.apply_active_set(&mut voice);
            sequencer.update(&mut voice);
        })
    });

    group.finish();
}
