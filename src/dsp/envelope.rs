use crate::MIN_TIME;

/*
Amplitude Envelope
==================

Linear attack/decay/sustain/release generator scaled by a peak level.

    level
    peak ┐  ╱╲
         │ ╱  ╲
       S │╱    ╲________
         │              ╲
     0.0 └───────────────╲──→ time
          A   D    S      R

The bass voice runs it with sustain = 0, so every note is a pluck that dies
away within its decay time whether or not the gate is still held. The gate
only matters when it closes early: note_off starts the release from the
current level.

Peak level is how accent gets louder: an accented note attacks to 1.0, a
normal note to something lower.

Retriggering
------------

A monophonic voice retriggers the same envelope for every note. Snapping the
level back to zero on every note_on would click, so attack starts from the
current level and climbs from there.

    Idle ──note_on──→ Attack ──level=peak──→ Decay ──level=S·peak──→ Sustain
      ↑                  │                     │                      │
      └──level=0── Release ←──────note_off─────┴──────────────────────┘
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

pub struct Envelope {
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32, // fraction of peak
    release_time: f32,
    peak: f32,

    stage: EnvelopeStage,
    level: f32,

    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Envelope {
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            sustain_level: sustain.clamp(0.0, 1.0),
            release_time: release.max(MIN_TIME),
            peak: 1.0,

            stage: EnvelopeStage::Idle,
            level: 0.0,
            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        }
    }

    /// Reshape the envelope. Takes effect on the next stage transition.
    pub fn set_times(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.attack_time = attack.max(MIN_TIME);
        self.decay_time = decay.max(MIN_TIME);
        self.sustain_level = sustain.clamp(0.0, 1.0);
        self.release_time = release.max(MIN_TIME);
    }

    pub fn set_peak(&mut self, peak: f32) {
        self.peak = peak.clamp(0.0, 1.0);
    }

    pub fn note_on(&mut self) {
        // Keep the current level: retrigger climbs from wherever we are
        self.stage = EnvelopeStage::Attack;
        self.release_elapsed_samples = 0;
    }

    pub fn note_off(&mut self, sample_rate: f32) {
        if matches!(self.stage, EnvelopeStage::Idle | EnvelopeStage::Release) {
            return;
        }

        self.release_start_level = self.level;
        self.release_total_samples = (self.release_time * sample_rate).round().max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeStage::Release;
    }

    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }

            EnvelopeStage::Attack => {
                self.level += self.peak / (self.attack_time * sample_rate);
                if self.level >= self.peak {
                    self.level = self.peak;
                    self.stage = EnvelopeStage::Decay;
                }
            }

            EnvelopeStage::Decay => {
                let target = self.sustain_level * self.peak;
                let drop = (self.peak - target) / (self.decay_time * sample_rate);
                self.level -= drop;
                if self.level <= target {
                    self.level = target;
                    self.stage = if target <= 0.0 {
                        EnvelopeStage::Idle
                    } else {
                        EnvelopeStage::Sustain
                    };
                }
            }

            EnvelopeStage::Sustain => {
                self.level = self.sustain_level * self.peak;
            }

            EnvelopeStage::Release => {
                let progress =
                    self.release_elapsed_samples as f32 / self.release_total_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);
                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);

                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        self.level
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeStage::Idle)
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
        self.release_elapsed_samples = 0;
        self.release_start_level = 0.0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn decay_time(&self) -> f32 {
        self.decay_time
    }
}
