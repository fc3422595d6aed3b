pub mod clock;
pub mod pattern;
pub mod sequencer;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use pattern::{PatternError, Step, StepPattern};
pub use sequencer::{SequencerConfig, SequencerError, StepCallback, StepInfo, StepSequencer};
