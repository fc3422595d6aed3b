//! Waveshaping drive.
//!
//! Drive pushes the signal into a nonlinear transfer function so the peaks
//! round off and new harmonics appear. The voice uses the soft curve
//! `x / (1 + |x|)`, which saturates smoothly towards ±1.
//!
//! The user-facing drive amount runs 0.0..=1.0 and maps onto a pre-gain:
//!
//!   0.0  → ×1   barely touched
//!   0.5  → ×15  obvious grit
//!   1.0  → ×30  flattened, fuzzy
//!
//! A post-gain pulls the level back so turning drive up changes colour more
//! than loudness.

/// Pre-gain added at full drive on top of unity.
pub const MAX_EXTRA_GAIN: f32 = 29.0;

/// Map a 0..1 drive amount onto a pre-gain factor.
#[inline]
pub fn drive_gain(amount: f32) -> f32 {
    1.0 + MAX_EXTRA_GAIN * amount.clamp(0.0, 1.0)
}

/// Soft clipping using x / (1 + |x|).
#[inline]
pub fn soft_clip(sample: f32, gain: f32) -> f32 {
    let x = sample * gain;
    x / (1.0 + x.abs())
}

/// Soft clip with level compensation, so a full-scale input stays near full scale.
#[inline]
pub fn saturate(sample: f32, gain: f32) -> f32 {
    // soft_clip(1.0, g) = g / (1 + g)
    let makeup = (1.0 + gain) / gain;
    soft_clip(sample, gain) * makeup
}

pub fn saturate_buffer(buffer: &mut [f32], gain: f32) {
    for sample in buffer.iter_mut() {
        *sample = saturate(*sample, gain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_clip_at_unity() {
        // f(0.1) = 0.1 / 1.1
        assert!((soft_clip(0.1, 1.0) - 0.0909).abs() < 0.001);
    }

    #[test]
    fn soft_clip_never_exceeds_one() {
        for &x in &[-10.0f32, -1.0, 0.0, 1.0, 10.0] {
            assert!(soft_clip(x, drive_gain(1.0)).abs() < 1.0);
        }
    }

    #[test]
    fn drive_gain_range() {
        assert_eq!(drive_gain(0.0), 1.0);
        assert_eq!(drive_gain(1.0), 30.0);
        assert_eq!(drive_gain(4.0), 30.0);
        assert_eq!(drive_gain(-1.0), 1.0);
    }

    #[test]
    fn saturate_keeps_full_scale() {
        for &amount in &[0.0, 0.3, 1.0] {
            let gain = drive_gain(amount);
            assert!((saturate(1.0, gain) - 1.0).abs() < 1e-5);
            assert!((saturate(-1.0, gain) + 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn more_drive_flattens_quiet_parts_up() {
        let gentle = saturate(0.2, drive_gain(0.0));
        let hot = saturate(0.2, drive_gain(1.0));
        assert!(hot > gentle);
    }
}
