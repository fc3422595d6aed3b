// Purpose: the monophonic bass voice and the note contract it exposes
// Sits above dsp primitives; the sequencer and the host drive it through NoteTarget

pub mod config;
pub mod glide;
pub mod message;
pub mod voice;

pub use config::VoiceConfig;
pub use glide::PitchGlider;
pub use message::{MessageReceiver, SynthMessage};
pub use voice::{Articulation, BassVoice, VoiceParam, VoiceStats};

/// Anything that can play notes: the voice itself, or a test double.
pub trait NoteTarget {
    fn note_on(&mut self, note: u8, velocity: u8);

    fn note_off(&mut self, note: u8);

    /// Step period the notes are played at. Ignored by default.
    fn set_step_period(&mut self, _secs_per_step: f32) {}
}
