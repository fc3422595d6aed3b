//! Wavetable oscillator.

/*
Wavetables
==========

The bass voice reads its waveform out of a small single-cycle table instead
of computing it analytically. Two tables ship by default, matching the
classic machine's waveform switch:

    index 0  SAW      ╲│╲│╲│     all harmonics, bright and buzzy
    index 1  SQUARE   ┌┐┌┐┌┐     odd harmonics, hollow and woody

Tables are built once per process and handed to each voice behind an `Arc`.
Nothing here is global: a host that wants different tables builds its own
`Wavetables` and passes it in.

Reading a table
---------------

    phase      position within one cycle, 0.0 ..< 1.0
    increment  frequency / sample_rate (cycles per sample)

    index = phase * table_len
    out   = lerp(table[floor(index)], table[floor(index) + 1], fract(index))

The read wraps at the end of the table so the cycle is seamless. Linear
interpolation is enough at bass frequencies, where the table is heavily
oversampled relative to the played pitch.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named waveform slots in the standard table set.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Saw,
    Square,
}

impl Waveform {
    pub fn index(self) -> usize {
        match self {
            Waveform::Saw => 0,
            Waveform::Square => 1,
        }
    }
}

/// A single-cycle waveform.
#[derive(Debug, Clone)]
pub struct WaveTable {
    samples: Vec<f32>,
}

impl WaveTable {
    pub fn new(samples: Vec<f32>) -> Self {
        // An empty table would make every read divide by zero
        let samples = if samples.is_empty() { vec![0.0] } else { samples };
        Self { samples }
    }

    /// Falling ramp from +1 to -1.
    pub fn saw(size: usize) -> Self {
        let size = size.max(2);
        let last = (size - 1) as f32;
        Self::new((0..size).map(|i| 1.0 - 2.0 * i as f32 / last).collect())
    }

    /// Half cycle at +1, half at -1.
    pub fn square(size: usize) -> Self {
        let size = size.max(2);
        Self::new(
            (0..size)
                .map(|i| if i < size / 2 { 1.0 } else { -1.0 })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Interpolated read at `phase` (0.0..1.0, wrapped).
    #[inline]
    pub fn read(&self, phase: f32) -> f32 {
        let len = self.samples.len();
        let position = phase.rem_euclid(1.0) * len as f32;
        let index = (position as usize).min(len - 1);
        let frac = position - index as f32;
        let a = self.samples[index];
        let b = self.samples[(index + 1) % len];
        a + (b - a) * frac
    }
}

/// The set of waveforms a voice can select from.
#[derive(Debug, Clone)]
pub struct Wavetables {
    tables: Vec<WaveTable>,
}

impl Wavetables {
    pub fn new(tables: Vec<WaveTable>) -> Self {
        let tables = if tables.is_empty() {
            vec![WaveTable::saw(2)]
        } else {
            tables
        };
        Self { tables }
    }

    /// Saw and square tables of `size` samples each.
    pub fn standard(size: usize) -> Self {
        Self::new(vec![WaveTable::saw(size), WaveTable::square(size)])
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Table for `index`, clamped to the last table.
    pub fn get(&self, index: usize) -> &WaveTable {
        &self.tables[index.min(self.tables.len() - 1)]
    }
}

impl Default for Wavetables {
    fn default() -> Self {
        Self::standard(128)
    }
}

/// Phase accumulator that reads a wavetable.
pub struct Oscillator {
    phase: f32,
}

impl Oscillator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Produce one sample at `frequency` Hz and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, table: &WaveTable, frequency: f32, sample_rate: f32) -> f32 {
        let out = table.read(self.phase);
        self.phase = (self.phase + frequency / sample_rate).rem_euclid(1.0);
        out
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a (possibly fractional) MIDI note number to Hz. A4 = 69 = 440 Hz.
#[inline]
pub fn note_to_freq(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saw_falls_from_top_to_bottom() {
        let table = WaveTable::saw(128);
        assert!((table.read(0.0) - 1.0).abs() < 1e-6);
        assert!(table.read(0.5) < 0.1 && table.read(0.5) > -0.1);
        assert!(table.read(0.99) < -0.9);
    }

    #[test]
    fn square_has_two_levels() {
        let table = WaveTable::square(128);
        assert!((table.read(0.25) - 1.0).abs() < 1e-6);
        assert!((table.read(0.75) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn read_wraps_phase() {
        let table = WaveTable::square(64);
        assert!((table.read(1.25) - table.read(0.25)).abs() < 1e-6);
        assert!((table.read(-0.75) - table.read(0.25)).abs() < 1e-6);
    }

    #[test]
    fn waveform_index_is_clamped() {
        let tables = Wavetables::standard(32);
        assert_eq!(tables.len(), 2);
        // Out of range selects the last table rather than panicking
        assert!((tables.get(7).read(0.75) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn oscillator_completes_one_cycle_per_period() {
        let tables = Wavetables::standard(128);
        let mut osc = Oscillator::new();
        let sample_rate = 1_000.0;
        let first = osc.next_sample(tables.get(0), 10.0, sample_rate);
        for _ in 0..99 {
            osc.next_sample(tables.get(0), 10.0, sample_rate);
        }
        // 100 samples at 10 Hz / 1 kHz is exactly one cycle
        let again = osc.next_sample(tables.get(0), 10.0, sample_rate);
        assert!((first - again).abs() < 1e-3, "first={first}, again={again}");
    }

    #[test]
    fn note_to_freq_reference_pitches() {
        assert!((note_to_freq(69.0) - 440.0).abs() < 1e-3);
        assert!((note_to_freq(57.0) - 220.0).abs() < 1e-3);
        assert!((note_to_freq(69.5) - 452.893).abs() < 1e-2);
    }
}
