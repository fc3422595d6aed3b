/*
Bass Voice
==========

One oscillator, one note at a time.

    Oscillator ──→ LowPass ──→ LowPass ──→ × Envelope ──→ Drive ──→ Delay ──→ out
        ↑             ↑           ↑                         (dry/wet)  (dry/wet)
     note + transpose + glide bend
                      └─ cutoff = offset + scale × sweep ─┘

Every note retriggers three things together:

  • the filter sweep: a one-shot ramp from 1 to 0 over the decay time. The
    filter cutoff reads `offset + scale × sweep` where
        offset = (1 − depth) × cutoff
        scale  = cutoff − offset
    so the cutoff drops from `cutoff` to `offset`. Depth 0 is a static filter,
    depth 1 sweeps all the way down.
  • the amplitude envelope: near-instant attack, decay, no sustain.
  • the pitch glider: slides in from the last note, long for slide steps and
    near-instant otherwise.

The decay time follows the tempo: `secs_per_step × decay × decay_span_steps`,
floored to the minimum envelope time.

Accent
------

    cutoff  × (1 + amount), never above the nominal maximum
    depth   + amount × (1 − depth)
    peak    1.0 instead of 1 − amount / 2

Cutoff, depth and decay shape the sweep at trigger time, so moving them while
a note rings is heard from the next note. Resonance, drive, delay and
transpose are read while rendering and apply at once.

Filter coefficients are refreshed every CONTROL_BLOCK samples rather than per
sample; the ramp itself is still advanced per sample.
*/

use std::sync::Arc;

use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::VoiceConfig;
use super::glide::PitchGlider;
use super::message::{MessageReceiver, SynthMessage};
use super::NoteTarget;
use crate::dsp::delay::{step_delay_samples, DelayLine};
use crate::dsp::distortion::{drive_gain, saturate};
use crate::dsp::envelope::Envelope;
use crate::dsp::filter::{SVFilter, MIN_CUTOFF_HZ, MIN_Q};
use crate::dsp::mix::blend_dry_wet;
use crate::dsp::oscillator::{note_to_freq, Oscillator, Wavetables};
use crate::dsp::ramp::Ramp;
use crate::params::ParamTarget;

/// Samples between filter coefficient updates.
pub const CONTROL_BLOCK: usize = 32;

/// Accent and slide for one note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Articulation {
    pub accent: bool,
    pub slide: bool,
}

impl Articulation {
    pub fn from_velocity(velocity: u8, config: &VoiceConfig) -> Self {
        Self {
            accent: velocity >= config.accent_velocity,
            slide: velocity <= config.slide_velocity,
        }
    }
}

/// Note counters, mostly for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoiceStats {
    pub notes_started: u64,
    pub notes_released: u64,
}

/// Fields of a [`BassVoice`] a parameter can be bound to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceParam {
    Cutoff,
    Resonance,
    EnvDepth,
    Decay,
    Waveform,
    Drive,
    DriveMix,
    DelayMix,
    DelayTime,
    Transpose,
    Accent,
}

pub struct BassVoice {
    tables: Arc<Wavetables>,
    sample_rate: f32,
    config: VoiceConfig,

    cutoff: f32,
    resonance: f32,
    env_depth: f32,
    decay: f32,
    waveform: usize,
    drive: f32,
    drive_mix: f32,
    delay_mix: f32,
    delay_time: f32,
    transpose: i32,
    secs_per_step: f32,

    current_note: Option<u8>,
    pitch: f32,
    filter_offset: f32,
    filter_scale: f32,

    osc: Oscillator,
    filters: [SVFilter; 2],
    sweep: Ramp,
    envelope: Envelope,
    glider: PitchGlider,
    delay: DelayLine,

    stats: VoiceStats,
}

impl BassVoice {
    pub fn new(tables: Arc<Wavetables>, sample_rate: f32, config: VoiceConfig) -> Self {
        let config = config.sanitized();
        let cutoff = (config.max_cutoff * 0.5).max(MIN_CUTOFF_HZ);
        let resonance = 1.0;

        Self {
            tables,
            sample_rate,
            config,

            cutoff,
            resonance,
            env_depth: 0.5,
            decay: 0.5,
            waveform: 0,
            drive: 0.0,
            drive_mix: 0.0,
            delay_mix: 0.0,
            delay_time: 0.75,
            transpose: 0,
            secs_per_step: 0.125,

            current_note: None,
            pitch: 0.0,
            filter_offset: cutoff,
            filter_scale: 0.0,

            osc: Oscillator::new(),
            filters: [
                SVFilter::lowpass(cutoff, resonance),
                SVFilter::lowpass(cutoff, resonance),
            ],
            sweep: Ramp::new(1.0, 0.0, 1.0),
            envelope: Envelope::adsr(config.min_env_time, config.min_env_time, 0.0, config.release_time),
            glider: PitchGlider::new(config.glide_time),
            delay: DelayLine::new(),

            stats: VoiceStats::default(),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    pub fn current_note(&self) -> Option<u8> {
        self.current_note
    }

    pub fn is_sounding(&self) -> bool {
        self.current_note.is_some()
    }

    /// Still producing sound, including a release tail.
    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    pub fn stats(&self) -> VoiceStats {
        self.stats
    }

    /// Current glide offset in semitones.
    pub fn bend(&self) -> f32 {
        self.glider.bend()
    }

    /// Cutoff the filters are following right now.
    pub fn swept_cutoff(&self) -> f32 {
        self.filter_offset + self.filter_scale * self.sweep.value()
    }

    /// Start `note`, deriving accent and slide from `velocity`.
    pub fn note_on(&mut self, note: u8, velocity: u8) {
        let articulation = Articulation::from_velocity(velocity, &self.config);
        self.trigger(note, articulation);
    }

    /// Start `note` with explicit accent and slide.
    pub fn trigger(&mut self, note: u8, articulation: Articulation) {
        if let Some(previous) = self.current_note {
            self.note_off(previous);
        }

        let amount = self.config.accent_amount;
        let (cutoff, depth, peak) = if articulation.accent {
            (
                (self.cutoff * (1.0 + amount)).min(self.config.max_cutoff),
                self.env_depth + amount * (1.0 - self.env_depth),
                1.0,
            )
        } else {
            (self.cutoff, self.env_depth, 1.0 - 0.5 * amount)
        };

        let min_time = self.config.min_env_time;
        let decay_time =
            (self.secs_per_step * self.decay * self.config.decay_span_steps).max(min_time);

        self.filter_offset = (1.0 - depth) * cutoff;
        self.filter_scale = cutoff - self.filter_offset;
        self.sweep.set_endpoints(1.0, 0.0);
        self.sweep.set_duration(decay_time);
        self.sweep.retrigger();

        let glide_time = if articulation.slide {
            self.config.slide_time
        } else {
            self.config.glide_time
        };
        self.glider.set_glide_time(glide_time);
        self.glider.retarget(note as f32);
        self.pitch = note as f32;

        self.envelope.set_times(
            self.config.attack_time.max(min_time),
            decay_time,
            0.0,
            self.config.release_time,
        );
        self.envelope.set_peak(peak);
        self.envelope.note_on();

        self.current_note = Some(note);
        self.stats.notes_started += 1;

        debug!(
            note,
            accent = articulation.accent,
            slide = articulation.slide,
            decay = decay_time,
            "note on"
        );
    }

    /// Release `note` if it is the one sounding.
    pub fn note_off(&mut self, note: u8) {
        if self.current_note != Some(note) {
            return;
        }
        self.envelope.note_off(self.sample_rate);
        self.current_note = None;
        self.stats.notes_released += 1;
        debug!(note, "note off");
    }

    /// Panic stop: release the note and cut every tail at once.
    pub fn all_notes_off(&mut self) {
        if let Some(note) = self.current_note {
            self.note_off(note);
        }
        self.envelope.reset();
        self.osc.reset();
        self.delay.reset();
        for filter in &mut self.filters {
            filter.reset();
        }
        debug!("all notes off");
    }

    /// Apply every pending message in arrival order.
    pub fn drain_messages<R: MessageReceiver + ?Sized>(&mut self, rx: &mut R) {
        while let Some(message) = rx.pop() {
            match message {
                SynthMessage::NoteOn { note, velocity: 0 } => self.note_off(note),
                SynthMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
                SynthMessage::NoteOff { note } => self.note_off(note),
                SynthMessage::AllNotesOff => self.all_notes_off(),
            }
        }
    }

    /// Clamped between the filter floor and the configured maximum.
    pub fn set_cutoff(&mut self, hz: f32) {
        if !hz.is_nan() {
            self.cutoff = hz.max(MIN_CUTOFF_HZ).min(self.config.max_cutoff);
        }
    }

    pub fn set_resonance(&mut self, q: f32) {
        self.resonance = q.max(MIN_Q);
    }

    pub fn set_env_depth(&mut self, depth: f32) {
        self.env_depth = depth.clamp(0.0, 1.0);
    }

    pub fn set_decay(&mut self, decay: f32) {
        self.decay = decay.max(0.0);
    }

    /// Out-of-range indices select the last table.
    pub fn set_waveform(&mut self, index: usize) {
        self.waveform = index.min(self.tables.len() - 1);
    }

    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive.clamp(0.0, 1.0);
    }

    pub fn set_drive_mix(&mut self, mix: f32) {
        self.drive_mix = mix.clamp(0.0, 1.0);
    }

    pub fn set_delay_mix(&mut self, mix: f32) {
        self.delay_mix = mix.clamp(0.0, 1.0);
    }

    /// Delay time as a fraction of the step period.
    pub fn set_delay_time(&mut self, fraction: f32) {
        self.delay_time = fraction.max(0.0);
    }

    pub fn set_transpose(&mut self, semitones: i32) {
        self.transpose = semitones;
    }

    pub fn set_accent_amount(&mut self, amount: f32) {
        self.config.accent_amount = amount.clamp(0.0, 1.0);
    }

    pub fn set_secs_per_step(&mut self, secs: f32) {
        if secs > 0.0 {
            self.secs_per_step = secs;
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    pub fn env_depth(&self) -> f32 {
        self.env_depth
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn waveform(&self) -> usize {
        self.waveform
    }

    pub fn transpose(&self) -> i32 {
        self.transpose
    }

    pub fn secs_per_step(&self) -> f32 {
        self.secs_per_step
    }

    /// Render mono samples into `out`, overwriting it.
    pub fn render_block(&mut self, out: &mut [f32]) {
        let sr = self.sample_rate;
        let table = self.tables.get(self.waveform);
        let drive = drive_gain(self.drive);
        let delay_samples = step_delay_samples(self.delay_time, self.secs_per_step, sr);
        let feedback = self.config.delay_feedback;
        let transpose = self.transpose as f32;

        for chunk in out.chunks_mut(CONTROL_BLOCK) {
            let cutoff = self.filter_offset + self.filter_scale * self.sweep.value();
            for filter in &mut self.filters {
                filter.set_cutoff(cutoff);
                filter.set_q(self.resonance);
            }

            for sample in chunk.iter_mut() {
                let bend = self.glider.next_sample(sr);
                self.sweep.next_sample(sr);

                let level = self.envelope.next_sample(sr);
                let mut voice = 0.0;
                if level > 0.0 {
                    let freq = note_to_freq(self.pitch + transpose + bend);
                    let raw = self.osc.next_sample(table, freq, sr);
                    let [first, second] = &mut self.filters;
                    let filtered = second.next_sample(first.next_sample(raw, sr), sr);
                    voice = filtered * level;
                }

                let driven = blend_dry_wet(voice, saturate(voice, drive), self.drive_mix);
                let echo = self.delay.next_sample(driven, delay_samples, feedback);
                *sample = blend_dry_wet(driven, echo, self.delay_mix);
            }
        }
    }
}

impl NoteTarget for BassVoice {
    fn note_on(&mut self, note: u8, velocity: u8) {
        BassVoice::note_on(self, note, velocity);
    }

    fn note_off(&mut self, note: u8) {
        BassVoice::note_off(self, note);
    }

    fn set_step_period(&mut self, secs_per_step: f32) {
        self.set_secs_per_step(secs_per_step);
    }
}

impl ParamTarget for BassVoice {
    type Field = VoiceParam;

    fn set_field(&mut self, field: VoiceParam, value: f32) {
        match field {
            VoiceParam::Cutoff => self.set_cutoff(value),
            VoiceParam::Resonance => self.set_resonance(value),
            VoiceParam::EnvDepth => self.set_env_depth(value),
            VoiceParam::Decay => self.set_decay(value),
            VoiceParam::Waveform => self.set_waveform(value.round().max(0.0) as usize),
            VoiceParam::Drive => self.set_drive(value),
            VoiceParam::DriveMix => self.set_drive_mix(value),
            VoiceParam::DelayMix => self.set_delay_mix(value),
            VoiceParam::DelayTime => self.set_delay_time(value),
            VoiceParam::Transpose => self.set_transpose(value.round() as i32),
            VoiceParam::Accent => self.set_accent_amount(value),
        }
    }

    fn field(&self, field: VoiceParam) -> f32 {
        match field {
            VoiceParam::Cutoff => self.cutoff,
            VoiceParam::Resonance => self.resonance,
            VoiceParam::EnvDepth => self.env_depth,
            VoiceParam::Decay => self.decay,
            VoiceParam::Waveform => self.waveform as f32,
            VoiceParam::Drive => self.drive,
            VoiceParam::DriveMix => self.drive_mix,
            VoiceParam::DelayMix => self.delay_mix,
            VoiceParam::DelayTime => self.delay_time,
            VoiceParam::Transpose => self.transpose as f32,
            VoiceParam::Accent => self.config.accent_amount,
        }
    }
}
