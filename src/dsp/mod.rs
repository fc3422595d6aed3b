//! Low-level DSP primitives used by the bass voice.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! so the voice can own them directly. They stay focused on signal math; the
//! voice decides when to retrigger and reconfigure them.

/// Circular feedback delay line.
pub mod delay;
/// Waveshaping drive.
pub mod distortion;
/// Attack/decay/sustain/release generator with adjustable peak.
pub mod envelope;
/// State-variable filter driven by cutoff and Q.
pub mod filter;
/// Dry/wet blending.
pub mod mix;
/// Wavetable oscillator and shared waveform tables.
pub mod oscillator;
/// One-shot ramp used for the filter sweep and glide.
pub mod ramp;

pub use envelope::EnvelopeStage;
pub use oscillator::{Waveform, Wavetables};
