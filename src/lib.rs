pub mod dsp; // Oscillator, filter, envelope and effect primitives
pub mod params; // Knob-driven parameters
pub mod sequencing; // Step patterns and transport
pub mod synth; // The monophonic bass voice

pub use params::{KnobMode, Param, ParamSet, ParamTarget};
pub use sequencing::{StepPattern, StepSequencer};
pub use synth::{BassVoice, NoteTarget, VoiceConfig, VoiceParam};

/// Largest block the host asks the voice to render at once.
pub const MAX_BLOCK_SIZE: usize = 2048;
/// Shortest time span any generator accepts: one sample at 48 kHz.
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
