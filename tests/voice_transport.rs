use std::sync::Arc;

use squelch::dsp::Wavetables;
use squelch::sequencing::{ManualClock, SequencerConfig, StepPattern, StepSequencer};
use squelch::synth::{BassVoice, VoiceConfig};

const SR: f32 = 48_000.0;

fn rig(notes: &[u8], velocities: &[u8]) -> (StepSequencer<ManualClock>, BassVoice, ManualClock) {
    let clock = ManualClock::new();
    let pattern = StepPattern::from_lanes(notes, velocities).unwrap();
    let seq = StepSequencer::new(clock.clone(), vec![pattern], SequencerConfig::default()).unwrap();
    let voice = BassVoice::new(Arc::new(Wavetables::default()), SR, VoiceConfig::default());
    (seq, voice, clock)
}

/// Poll every millisecond and render audio in between, like the host does.
fn play(
    seq: &mut StepSequencer<ManualClock>,
    voice: &mut BassVoice,
    clock: &ManualClock,
    from_ms: u32,
    to_ms: u32,
) -> Vec<f32> {
    let mut audio = Vec::new();
    let mut block = [0.0f32; 48];
    for ms in from_ms..to_ms {
        clock.set(ms as f64 / 1000.0);
        seq.update(voice);
        voice.render_block(&mut block);
        audio.extend_from_slice(&block);
    }
    audio
}

#[test]
fn sequencer_drives_monophonic_voice() {
    let (mut seq, mut voice, clock) = rig(&[36, 48, 0, 43], &[100, 100, 0, 127]);
    seq.start();
    let audio = play(&mut seq, &mut voice, &clock, 0, 1000);

    // Two bars at 0.125 s per step: 8 steps, 6 of them notes
    let stats = voice.stats();
    assert_eq!(stats.notes_started, 6);
    // Every gate closes before the next step, so nothing is stolen
    assert_eq!(stats.notes_released, 6);
    assert!(audio.iter().all(|s| s.is_finite()));
    assert!(audio.iter().any(|s| s.abs() > 0.01));
}

#[test]
fn full_gate_retrigger_releases_once_per_note() {
    let clock = ManualClock::new();
    let pattern = StepPattern::from_lanes(&[36, 38], &[100, 100]).unwrap();
    let config = SequencerConfig::default().with_gate_amount(1.0);
    let mut seq = StepSequencer::new(clock.clone(), vec![pattern], config).unwrap();
    let mut voice = BassVoice::new(Arc::new(Wavetables::default()), SR, VoiceConfig::default());

    seq.start();
    play(&mut seq, &mut voice, &clock, 0, 500);

    let stats = voice.stats();
    assert_eq!(stats.notes_started, 4);
    assert_eq!(stats.notes_released, 3);
    assert!(voice.is_sounding());
}

#[test]
fn decay_follows_tempo() {
    let (mut seq, mut voice, clock) = rig(&[36], &[100]);
    seq.set_bpm(60.0);
    seq.start();
    play(&mut seq, &mut voice, &clock, 0, 1);
    assert!((voice.secs_per_step() - 0.25).abs() < 1e-6);
}

#[test]
fn stop_silences_voice() {
    let (mut seq, mut voice, clock) = rig(&[36, 36, 36, 36], &[100; 4]);
    seq.start();
    play(&mut seq, &mut voice, &clock, 0, 50);
    assert!(voice.is_sounding());

    seq.stop(&mut voice);
    assert!(!voice.is_sounding());

    let tail = play(&mut seq, &mut voice, &clock, 50, 200);
    assert!(!voice.is_active());
    assert_eq!(voice.stats().notes_started, 1);
    assert!(tail[tail.len() - 48..].iter().all(|&s| s == 0.0));
}
