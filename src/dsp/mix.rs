//! Dry/wet blending for the voice's effect stages.
//!
//!   output = dry × (1 - mix) + wet × mix
//!
//! `mix` is clamped to 0.0..=1.0, so a parameter that overshoots can never
//! invert or amplify the signal.

/// Blend a single dry and wet sample.
#[inline]
pub fn blend_dry_wet(dry: f32, wet: f32, mix: f32) -> f32 {
    let mix = mix.clamp(0.0, 1.0);
    dry * (1.0 - mix) + wet * mix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend_dry_wet(1.0, 0.0, 0.0), 1.0);
        assert_eq!(blend_dry_wet(1.0, 0.0, 1.0), 0.0);
        assert_eq!(blend_dry_wet(1.0, 0.0, 0.5), 0.5);
    }

    #[test]
    fn blend_clamps_mix() {
        assert_eq!(blend_dry_wet(1.0, 0.0, 2.0), 0.0);
        assert_eq!(blend_dry_wet(1.0, 0.0, -1.0), 1.0);
    }
}
