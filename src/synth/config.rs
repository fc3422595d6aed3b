#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed performance constants of a [`BassVoice`](super::BassVoice).
///
/// Live sound settings (cutoff, decay, drive...) are voice fields edited
/// through parameters; these are the rules that turn a note into a sound.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceConfig {
    /// Velocities at or above this are accented.
    pub accent_velocity: u8,
    /// Velocities at or below this slide.
    pub slide_velocity: u8,
    /// How hard accent pushes level, cutoff and depth (0.0..=1.0).
    pub accent_amount: f32,
    /// Nominal top of the cutoff range in Hz. Accent never exceeds it.
    pub max_cutoff: f32,
    /// Glide time for sliding notes, seconds.
    pub slide_time: f32,
    /// Glide time for ordinary notes, seconds.
    pub glide_time: f32,
    /// Requested attack, seconds. Floored to `min_env_time`.
    pub attack_time: f32,
    /// Shortest attack or decay the voice will produce, seconds.
    pub min_env_time: f32,
    pub release_time: f32,
    /// Steps covered by the decay at full decay setting.
    pub decay_span_steps: f32,
    pub delay_feedback: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            accent_velocity: 120,
            slide_velocity: 15,
            accent_amount: 0.5,
            max_cutoff: 8000.0,
            slide_time: 0.1,
            glide_time: 0.001,
            attack_time: 0.0,
            min_env_time: 0.02,
            release_time: 0.02,
            decay_span_steps: 4.0,
            delay_feedback: 0.35,
        }
    }
}

impl VoiceConfig {
    /// Pull every field back into a range the voice can run with. Non-finite
    /// values fall back to their defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let finite = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };

        Self {
            accent_amount: finite(self.accent_amount, defaults.accent_amount).clamp(0.0, 1.0),
            max_cutoff: finite(self.max_cutoff, defaults.max_cutoff)
                .max(crate::dsp::filter::MIN_CUTOFF_HZ),
            slide_time: finite(self.slide_time, defaults.slide_time).max(0.0),
            glide_time: finite(self.glide_time, defaults.glide_time).max(0.0),
            attack_time: finite(self.attack_time, defaults.attack_time).max(0.0),
            min_env_time: finite(self.min_env_time, defaults.min_env_time).max(0.0),
            release_time: finite(self.release_time, defaults.release_time).max(0.0),
            decay_span_steps: finite(self.decay_span_steps, defaults.decay_span_steps).max(0.0),
            delay_feedback: finite(self.delay_feedback, defaults.delay_feedback).clamp(0.0, 0.95),
            ..self
        }
    }

    pub fn with_accent_amount(mut self, amount: f32) -> Self {
        self.accent_amount = amount.clamp(0.0, 1.0);
        self
    }

    pub fn with_thresholds(mut self, accent_velocity: u8, slide_velocity: u8) -> Self {
        self.accent_velocity = accent_velocity;
        self.slide_velocity = slide_velocity;
        self
    }

    pub fn with_max_cutoff(mut self, hz: f32) -> Self {
        self.max_cutoff = hz.max(crate::dsp::filter::MIN_CUTOFF_HZ);
        self
    }

    pub fn with_glide_times(mut self, slide: f32, normal: f32) -> Self {
        self.slide_time = slide;
        self.glide_time = normal;
        self
    }

    pub fn with_envelope_times(mut self, attack: f32, min_env_time: f32, release: f32) -> Self {
        self.attack_time = attack;
        self.min_env_time = min_env_time;
        self.release_time = release;
        self
    }

    pub fn with_delay_feedback(mut self, feedback: f32) -> Self {
        self.delay_feedback = feedback.clamp(0.0, 0.95);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::filter::MIN_CUTOFF_HZ;

    #[test]
    fn sanitized_floors_and_replaces_bad_values() {
        let config = VoiceConfig {
            max_cutoff: 10.0,
            accent_amount: 3.0,
            slide_time: f32::NAN,
            delay_feedback: f32::INFINITY,
            release_time: -1.0,
            ..VoiceConfig::default()
        }
        .sanitized();

        assert_eq!(config.max_cutoff, MIN_CUTOFF_HZ);
        assert_eq!(config.accent_amount, 1.0);
        assert_eq!(config.slide_time, VoiceConfig::default().slide_time);
        assert_eq!(config.delay_feedback, VoiceConfig::default().delay_feedback);
        assert_eq!(config.release_time, 0.0);

        let nan_cutoff = VoiceConfig {
            max_cutoff: f32::NAN,
            ..VoiceConfig::default()
        };
        assert_eq!(nan_cutoff.sanitized().max_cutoff, 8000.0);
    }

    #[test]
    fn default_is_already_clean() {
        assert_eq!(VoiceConfig::default().sanitized(), VoiceConfig::default());
    }
}
