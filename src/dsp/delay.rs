/// Longest delay the voice can produce: 2 s at 48 kHz.
pub const MAX_DELAY_SAMPLES: usize = 96_000;

/// Circular feedback delay line.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    pub fn new() -> Self {
        Self::with_capacity(MAX_DELAY_SAMPLES)
    }

    pub fn with_capacity(samples: usize) -> Self {
        Self {
            buffer: vec![0.0; samples.max(2)],
            write_pos: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Write `sample` plus fed-back echo and return the echo.
    #[inline]
    pub fn next_sample(&mut self, sample: f32, delay_samples: usize, feedback: f32) -> f32 {
        let len = self.buffer.len();
        let delay_samples = delay_samples.clamp(1, len - 1);

        let read_pos = (self.write_pos + len - delay_samples) % len;
        let delayed = self.buffer[read_pos];

        self.buffer[self.write_pos] = sample + delayed * feedback.clamp(0.0, 0.95);
        self.write_pos = (self.write_pos + 1) % len;

        delayed
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new()
    }
}

/// Delay length in samples for a fraction of the step period.
#[inline]
pub fn step_delay_samples(fraction: f32, secs_per_step: f32, sample_rate: f32) -> usize {
    (fraction.max(0.0) * secs_per_step.max(0.0) * sample_rate).round() as usize
}
