use crate::dsp::ramp::Ramp;
use crate::MIN_TIME;

/// Portamento as a pitch bend.
///
/// The oscillator keeps playing the new note; the glider supplies an offset
/// in semitones that starts at `previous - new` and decays to zero, so the
/// heard pitch slides from the old note into the new one.
pub struct PitchGlider {
    ramp: Ramp,
    source_note: Option<f32>,
}

impl PitchGlider {
    pub fn new(glide_time: f32) -> Self {
        Self {
            ramp: Ramp::with_duration(0.0, 0.0, glide_time),
            source_note: None,
        }
    }

    /// Slide into `note` from whatever note was targeted last.
    ///
    /// The first note after construction has nothing to slide from and
    /// starts with no bend.
    pub fn retarget(&mut self, note: f32) {
        let start = self.source_note.map_or(0.0, |previous| previous - note);
        self.source_note = Some(note);
        self.ramp.set_endpoints(start, 0.0);
        self.ramp.retrigger();
    }

    /// Zero or negative durations are floored to one sample at 48 kHz.
    pub fn set_glide_time(&mut self, seconds: f32) {
        self.ramp.set_duration(seconds.max(MIN_TIME));
    }

    pub fn glide_time(&self) -> f32 {
        self.ramp.duration()
    }

    /// Interval the current glide started from, in semitones.
    pub fn start_offset(&self) -> f32 {
        self.ramp.start()
    }

    pub fn source_note(&self) -> Option<f32> {
        self.source_note
    }

    /// Current bend without advancing.
    pub fn bend(&self) -> f32 {
        self.ramp.value()
    }

    pub fn is_gliding(&self) -> bool {
        !self.ramp.is_finished()
    }

    /// Advance by `seconds` and return the bend.
    pub fn advance(&mut self, seconds: f32) -> f32 {
        self.ramp.advance(seconds)
    }

    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        self.ramp.next_sample(sample_rate)
    }
}
