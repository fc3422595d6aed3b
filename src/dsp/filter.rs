use std::f32::consts::PI;

/*
Trapezoidal (TPT) state-variable filter, low-pass output only. The voice runs
two in series for a steeper slope. Resonance is expressed as Q, the way
biquad-style filters are usually driven:

    k = 1 / Q          damping
    Q = 0.707          flat (Butterworth) response
    Q > 1              resonant peak at the cutoff

Coefficients depend on cutoff and Q only, so they are recomputed lazily when
either changes rather than once per sample.
*/

pub const MIN_Q: f32 = 0.1;
pub const MIN_CUTOFF_HZ: f32 = 20.0;

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    cutoff_hz: f32,
    q: f32,

    // Cached coefficients, refreshed when cutoff/Q/sample rate change
    g: f32,
    k: f32,
    coeff_rate: f32,
    dirty: bool,
}

impl SVFilter {
    pub fn lowpass(cutoff_hz: f32, q: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz: cutoff_hz.max(MIN_CUTOFF_HZ),
            q: q.max(MIN_Q),
            g: 0.0,
            k: 0.0,
            coeff_rate: 0.0,
            dirty: true,
        }
    }

    #[inline]
    fn refresh(&mut self, sample_rate: f32) {
        if !self.dirty && self.coeff_rate == sample_rate {
            return;
        }
        // Keep the prewarped frequency below Nyquist or tan() blows up
        let cutoff = self.cutoff_hz.min(sample_rate * 0.49);
        self.g = (PI * cutoff / sample_rate).tan();
        self.k = 1.0 / self.q;
        self.coeff_rate = sample_rate;
        self.dirty = false;
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, sample_rate: f32) -> f32 {
        self.refresh(sample_rate);
        let (g, k) = (self.g, self.k);

        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, sample_rate);
        }
    }

    /// Clear the integrators, dropping any ringing.
    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        let cutoff = cutoff.max(MIN_CUTOFF_HZ);
        if cutoff != self.cutoff_hz {
            self.cutoff_hz = cutoff;
            self.dirty = true;
        }
    }

    pub fn set_q(&mut self, q: f32) {
        let q = q.max(MIN_Q);
        if q != self.q {
            self.q = q;
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (TAU * freq * n as f32 / SAMPLE_RATE).sin())
            .collect()
    }

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(256);
        buffer
            .get(skip..)
            .unwrap_or(buffer)
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut filter = SVFilter::lowpass(500.0, 0.707);
        let mut buffer = vec![1.0; 2048];
        filter.render(&mut buffer, SAMPLE_RATE);
        assert!(buffer[2047] > 0.99, "got {}", buffer[2047]);
    }

    #[test]
    fn lowpass_attenuates_above_cutoff() {
        let mut filter = SVFilter::lowpass(500.0, 0.707);
        let mut buffer = sine(5_000.0, 2048);
        filter.render(&mut buffer, SAMPLE_RATE);
        let peak = peak_after_transient(&buffer);
        assert!(peak < 0.05, "expected attenuation, got peak {peak}");
    }

    #[test]
    fn reset_silences_ringing() {
        let mut filter = SVFilter::lowpass(1_000.0, 4.0);
        let mut buffer = vec![1.0; 512];
        filter.render(&mut buffer, SAMPLE_RATE);

        filter.reset();
        let mut silence = vec![0.0; 64];
        filter.render(&mut silence, SAMPLE_RATE);
        assert!(silence.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn higher_q_boosts_the_cutoff_region() {
        let mut gentle = SVFilter::lowpass(1_000.0, 0.5);
        let mut buffer1 = sine(1_000.0, 4096);
        gentle.render(&mut buffer1, SAMPLE_RATE);

        let mut peaky = SVFilter::lowpass(1_000.0, 4.0);
        let mut buffer2 = sine(1_000.0, 4096);
        peaky.render(&mut buffer2, SAMPLE_RATE);

        assert!(peak_after_transient(&buffer2) > peak_after_transient(&buffer1) * 1.5);
    }

    #[test]
    fn setters_floor_invalid_values() {
        let mut filter = SVFilter::lowpass(1_000.0, 1.0);
        filter.set_cutoff(-5.0);
        filter.set_q(0.0);
        assert_eq!(filter.cutoff(), MIN_CUTOFF_HZ);
        assert_eq!(filter.q(), MIN_Q);

        let mut buffer = sine(440.0, 256);
        filter.render(&mut buffer, SAMPLE_RATE);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn cutoff_above_nyquist_stays_finite() {
        let mut filter = SVFilter::lowpass(40_000.0, 1.0);
        let mut buffer = sine(440.0, 512);
        filter.render(&mut buffer, SAMPLE_RATE);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
