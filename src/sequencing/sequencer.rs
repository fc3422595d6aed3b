/*
Step Sequencer
==============

Polled, not clocked: the host loop calls `update()` as often as it likes and
the sequencer compares the clock against two deadlines.

    time ─────────────────────────────────────────────────────────→
          step 0          step 1          step 2
          ├───────────────┼───────────────┼──────────
          note_on ──gate──┤ note_off
          │← secs_per_step × gate_amount →│

  next_step_at   when the next step is due. Each step adds exactly one step
                 period to it, so if a poll arrives late the next deadline
                 does not move and timing stays on the grid.

  gate_until     when the held note is released. Independent of the step
                 deadline, which is what lets notes be shorter than a step.

The step deadline keeps running while stopped, so a display driven by the
step callback keeps blinking in time. Notes are only played (and the step
index only advances) while playing.

    secs_per_step = 60 / bpm / steps_per_beat

Tempo changes recompute the period at once; the already scheduled deadline
is left alone, so the new tempo is heard from the step after the pending one.
*/

use std::fmt;

use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::clock::{Clock, MonotonicClock};
use super::pattern::StepPattern;
use crate::synth::NoteTarget;

/// What the per-step callback is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    /// Index of the step being played (before advancing).
    pub step: usize,
    pub steps_per_beat: u32,
    pub pattern_len: usize,
    pub playing: bool,
}

pub type StepCallback = Box<dyn FnMut(StepInfo) + Send>;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencerConfig {
    pub bpm: f32,
    pub steps_per_beat: u32,
    /// Fraction of the step period a note is held.
    pub gate_amount: f32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            steps_per_beat: 4,
            gate_amount: 0.75,
        }
    }
}

impl SequencerConfig {
    pub fn with_bpm(mut self, bpm: f32) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn with_steps_per_beat(mut self, steps_per_beat: u32) -> Self {
        self.steps_per_beat = steps_per_beat;
        self
    }

    pub fn with_gate_amount(mut self, gate_amount: f32) -> Self {
        self.gate_amount = gate_amount;
        self
    }
}

/// Errors that can occur when building a sequencer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerError {
    /// At least one pattern is required
    NoPatterns,
}

impl fmt::Display for SequencerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequencerError::NoPatterns => write!(f, "sequencer needs at least one pattern"),
        }
    }
}

impl std::error::Error for SequencerError {}

pub struct StepSequencer<C: Clock = MonotonicClock> {
    clock: C,
    patterns: Vec<StepPattern>,
    pattern_index: usize,
    step_index: usize,

    bpm: f32,
    steps_per_beat: u32,
    gate_amount: f32,
    secs_per_step: f64,
    transpose: i32,

    playing: bool,
    next_step_at: f64,
    gate_until: Option<f64>,
    active_note: Option<u8>,

    on_step: Option<StepCallback>,
}

impl<C: Clock> StepSequencer<C> {
    /// A stopped sequencer on the first pattern.
    pub fn new(
        clock: C,
        patterns: Vec<StepPattern>,
        config: SequencerConfig,
    ) -> Result<Self, SequencerError> {
        if patterns.is_empty() {
            return Err(SequencerError::NoPatterns);
        }

        let next_step_at = clock.now();
        let mut sequencer = Self {
            clock,
            patterns,
            pattern_index: 0,
            step_index: 0,
            bpm: 120.0,
            steps_per_beat: 4,
            gate_amount: 0.75,
            secs_per_step: 0.125,
            transpose: 0,
            playing: false,
            next_step_at,
            gate_until: None,
            active_note: None,
            on_step: None,
        };
        sequencer.set_bpm(config.bpm);
        sequencer.set_steps_per_beat(config.steps_per_beat);
        sequencer.set_gate_amount(config.gate_amount);
        Ok(sequencer)
    }

    /// Called once per step, whether playing or not.
    pub fn on_step(&mut self, callback: impl FnMut(StepInfo) + Send + 'static) {
        self.on_step = Some(Box::new(callback));
    }

    /// Play from step 0, starting now.
    pub fn start(&mut self) {
        self.playing = true;
        self.step_index = 0;
        self.next_step_at = self.clock.now();
        info!(bpm = self.bpm, pattern = self.pattern_index, "transport started");
    }

    /// Stop and release whatever note is still gated.
    pub fn stop<T: NoteTarget + ?Sized>(&mut self, target: &mut T) {
        self.playing = false;
        self.gate_until = None;
        if let Some(note) = self.active_note.take() {
            target.note_off(note);
        }
        info!(step = self.step_index, "transport stopped");
    }

    /// Poll the deadlines. Never blocks.
    pub fn update<T: NoteTarget + ?Sized>(&mut self, target: &mut T) {
        let now = self.clock.now();

        if let Some(gate) = self.gate_until {
            if now >= gate {
                self.gate_until = None;
                if let Some(note) = self.active_note.take() {
                    target.note_off(note);
                }
            }
        }

        if now < self.next_step_at {
            return;
        }

        let lateness = now - self.next_step_at;
        self.next_step_at += self.secs_per_step;

        let pattern = &self.patterns[self.pattern_index];
        let pattern_len = pattern.len();
        let step_index = self.step_index % pattern_len;

        if let Some(callback) = self.on_step.as_mut() {
            callback(StepInfo {
                step: step_index,
                steps_per_beat: self.steps_per_beat,
                pattern_len,
                playing: self.playing,
            });
        }

        if !self.playing {
            return;
        }

        let step = pattern.step(step_index);
        debug!(
            step = step_index,
            note = step.note,
            velocity = step.velocity,
            late_ms = lateness * 1000.0,
            "step"
        );

        if !step.is_rest() {
            let note = (step.note as i32 + self.transpose).clamp(1, 127) as u8;
            target.set_step_period(self.secs_per_step as f32);
            target.note_on(note, step.velocity);
            self.active_note = Some(note);
            self.gate_until = Some(now + self.secs_per_step * self.gate_amount as f64);
        }

        self.step_index = (step_index + 1) % pattern_len;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn active_note(&self) -> Option<u8> {
        self.active_note
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Non-positive or non-finite tempos are ignored.
    pub fn set_bpm(&mut self, bpm: f32) {
        if bpm.is_finite() && bpm > 0.0 {
            self.bpm = bpm;
            self.recompute_period();
        }
    }

    pub fn steps_per_beat(&self) -> u32 {
        self.steps_per_beat
    }

    pub fn set_steps_per_beat(&mut self, steps_per_beat: u32) {
        self.steps_per_beat = steps_per_beat.max(1);
        self.recompute_period();
    }

    pub fn gate_amount(&self) -> f32 {
        self.gate_amount
    }

    /// Clamped to 0.0..=1.0. Non-finite values are ignored.
    pub fn set_gate_amount(&mut self, gate_amount: f32) {
        if gate_amount.is_finite() {
            self.gate_amount = gate_amount.clamp(0.0, 1.0);
        }
    }

    pub fn secs_per_step(&self) -> f64 {
        self.secs_per_step
    }

    fn recompute_period(&mut self) {
        self.secs_per_step = 60.0 / self.bpm as f64 / self.steps_per_beat as f64;
    }

    pub fn transpose(&self) -> i32 {
        self.transpose
    }

    /// Semitone offset added to every played note.
    pub fn set_transpose(&mut self, semitones: i32) {
        self.transpose = semitones;
    }

    pub fn pattern_index(&self) -> usize {
        self.pattern_index
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn pattern(&self) -> &StepPattern {
        &self.patterns[self.pattern_index]
    }

    /// Select a pattern, wrapping out-of-range indices.
    pub fn set_pattern(&mut self, index: usize) {
        let index = index % self.patterns.len();
        if index != self.pattern_index {
            self.pattern_index = index;
            info!(pattern = index, "pattern selected");
        }
    }
}
