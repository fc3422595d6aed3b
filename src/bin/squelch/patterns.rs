//! Built-in patterns. Velocity 127 accents, velocity <= 15 slides, note 0 rests.

use squelch::sequencing::{PatternError, StepPattern};

const LANES: [([u8; 8], [u8; 8]); 3] = [
    (
        [36, 36, 48, 36, 48, 55, 36, 48],
        [127, 80, 80, 80, 127, 1, 30, 1],
    ),
    (
        [34, 36, 34, 36, 48, 48, 36, 48],
        [127, 80, 120, 80, 127, 11, 127, 80],
    ),
    (
        [36, 48, 36, 48, 36, 0, 36, 0],
        [127, 80, 120, 80, 127, 80, 127, 80],
    ),
];

pub fn builtin() -> Result<Vec<StepPattern>, PatternError> {
    LANES
        .iter()
        .map(|(notes, velocities)| StepPattern::from_lanes(notes, velocities))
        .collect()
}
