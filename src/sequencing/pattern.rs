use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One step of a pattern. Note 0 is a rest.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Step {
    pub note: u8,
    pub velocity: u8,
}

impl Step {
    pub const REST: Step = Step { note: 0, velocity: 0 };

    pub fn new(note: u8, velocity: u8) -> Self {
        Self { note, velocity }
    }

    pub fn is_rest(&self) -> bool {
        self.note == 0
    }
}

/// Fixed-length loop of steps.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPattern {
    steps: Vec<Step>,
}

impl StepPattern {
    pub fn new(steps: Vec<Step>) -> Result<Self, PatternError> {
        if steps.is_empty() {
            return Err(PatternError::Empty);
        }
        Ok(Self { steps })
    }

    /// Build from parallel note and velocity lanes, e.g.
    /// `[60, 0, 64, 60]` and `[100, 0, 100, 100]`.
    pub fn from_lanes(notes: &[u8], velocities: &[u8]) -> Result<Self, PatternError> {
        if notes.len() != velocities.len() {
            return Err(PatternError::LaneMismatch {
                notes: notes.len(),
                velocities: velocities.len(),
            });
        }
        let steps = notes
            .iter()
            .zip(velocities)
            .map(|(&note, &velocity)| Step::new(note, velocity))
            .collect();
        Self::new(steps)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; patterns hold at least one step.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`, wrapping.
    pub fn step(&self, index: usize) -> Step {
        self.steps[index % self.steps.len()]
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Errors that can occur when building a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Pattern has no steps
    Empty,
    /// Note and velocity lanes have different lengths
    LaneMismatch { notes: usize, velocities: usize },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Empty => write!(f, "pattern has no steps"),
            PatternError::LaneMismatch { notes, velocities } => write!(
                f,
                "pattern lanes differ: {} notes, {} velocities",
                notes, velocities
            ),
        }
    }
}

impl std::error::Error for PatternError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_zip_into_steps() {
        let pattern = StepPattern::from_lanes(&[60, 0, 64, 60], &[100, 0, 100, 100]).unwrap();
        assert_eq!(pattern.len(), 4);
        assert!(pattern.step(1).is_rest());
        assert_eq!(pattern.step(2), Step::new(64, 100));
        // wraps
        assert_eq!(pattern.step(6), Step::new(64, 100));
    }

    #[test]
    fn rejects_bad_lanes() {
        assert_eq!(
            StepPattern::from_lanes(&[60, 62], &[100]),
            Err(PatternError::LaneMismatch { notes: 2, velocities: 1 })
        );
        assert_eq!(StepPattern::from_lanes(&[], &[]), Err(PatternError::Empty));
    }
}
