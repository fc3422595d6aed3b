//! Snapshot of the rig taken under the lock, drawn after it is released

use squelch::{synth::VoiceStats, KnobMode};

use crate::rig::Rig;

/// One parameter in the active knob-set
#[derive(Clone, Debug)]
pub struct KnobView {
    pub name: String,
    pub display: String,
    /// Where the value sits on the knob's 0..1 travel
    pub value_position: f32,
    /// Where the physical knob is
    pub knob_position: f32,
    pub tracking: bool,
}

#[derive(Clone, Debug)]
pub struct RigSnapshot {
    pub playing: bool,
    pub bpm: f32,
    pub steps_per_beat: u32,
    pub step: usize,
    pub pattern_len: usize,
    pub pattern_index: usize,
    pub pattern_notes: Vec<u8>,
    pub transpose: i32,
    pub current_note: Option<u8>,
    pub stats: VoiceStats,
    pub knobset: usize,
    pub knobset_count: usize,
    pub knob_mode: KnobMode,
    pub knobs: Vec<KnobView>,
    pub sample_rate: f32,
}

impl RigSnapshot {
    pub fn capture(rig: &Rig, knobs: &[f32], last_step: usize) -> Self {
        let sequencer = &rig.engine.sequencer;
        let voice = &rig.engine.voice;
        let params = &rig.params;

        let knobs = params
            .active_params()
            .iter()
            .enumerate()
            .map(|(i, param)| KnobView {
                name: param.name().to_string(),
                display: param.display(),
                value_position: param.normalized_position(),
                knob_position: knobs.get(i).copied().unwrap_or(0.0),
                tracking: params.is_tracking(i),
            })
            .collect();

        Self {
            playing: sequencer.is_playing(),
            bpm: sequencer.bpm(),
            steps_per_beat: sequencer.steps_per_beat(),
            step: last_step,
            pattern_len: sequencer.pattern().len(),
            pattern_index: sequencer.pattern_index(),
            pattern_notes: sequencer.pattern().steps().iter().map(|s| s.note).collect(),
            transpose: sequencer.transpose(),
            current_note: voice.current_note(),
            stats: voice.stats(),
            knobset: params.active_knobset(),
            knobset_count: params.knobset_count(),
            knob_mode: params.mode(),
            knobs,
            sample_rate: voice.sample_rate(),
        }
    }
}
