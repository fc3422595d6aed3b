//! One-shot ramp generator.

/*
One-Shot Ramp
=============

A ramp moves linearly from `start` to `end` once and then holds `end` until
it is retriggered. It is an LFO that runs a single half-cycle and stops:

    value
    start ┐╲
          │ ╲
          │  ╲
      end │   ╲_____________   (holds until retrigger)
          └──────────────────→ time
           0   1/rate

Two jobs in this crate:

  filter sweep   start = 1, end = 0, read through `offset + scale * value`.
                 Each note restarts the sweep so the cutoff falls from
                 `offset + scale` back to `offset`: the decaying acid squelch.

  glide          start = interval, end = 0. The ramp value is added to the
                 played pitch so the note slides in from the previous pitch.

Using a ramp as the filter "envelope" is intentional. The ADSR in
`envelope.rs` only shapes loudness; the filter gets its own one-shot so its
speed can follow the tempo independently, and its live value is readable at
any point through `value()`.

Time advances by `rate / sample_rate` of the full sweep per sample, so the
sweep takes `1 / rate` seconds regardless of sample rate.
*/

use crate::MIN_TIME;

pub struct Ramp {
    start: f32,
    end: f32,
    rate: f32,     // full sweeps per second
    position: f32, // 0.0 at start, 1.0 when finished
}

impl Ramp {
    /// A finished ramp sitting at `end`.
    pub fn new(start: f32, end: f32, rate: f32) -> Self {
        Self {
            start,
            end,
            rate: rate.clamp(0.0, 1.0 / MIN_TIME),
            position: 1.0,
        }
    }

    /// Ramp lasting `seconds`. Zero or negative durations are floored.
    pub fn with_duration(start: f32, end: f32, seconds: f32) -> Self {
        Self::new(start, end, 1.0 / seconds.max(MIN_TIME))
    }

    /// Restart the sweep from `start`.
    pub fn retrigger(&mut self) {
        self.position = 0.0;
    }

    pub fn set_endpoints(&mut self, start: f32, end: f32) {
        self.start = start;
        self.end = end;
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate.clamp(0.0, 1.0 / MIN_TIME);
    }

    pub fn set_duration(&mut self, seconds: f32) {
        self.set_rate(1.0 / seconds.max(MIN_TIME));
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn duration(&self) -> f32 {
        if self.rate > 0.0 {
            1.0 / self.rate
        } else {
            f32::INFINITY
        }
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    /// Current output without advancing.
    #[inline]
    pub fn value(&self) -> f32 {
        self.start + (self.end - self.start) * self.position
    }

    pub fn is_finished(&self) -> bool {
        self.position >= 1.0
    }

    /// Advance by `seconds` and return the new value.
    #[inline]
    pub fn advance(&mut self, seconds: f32) -> f32 {
        if self.position < 1.0 {
            self.position = (self.position + self.rate * seconds).min(1.0);
        }
        self.value()
    }

    /// Advance by one sample and return the new value.
    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        self.advance(1.0 / sample_rate)
    }
}
