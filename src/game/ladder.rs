//! Reveal ladder: how many seconds of the track each stage unlocks

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a ladder is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LadderError {
    #[error("stage ladder must have at least one stage")]
    Empty,
    #[error("stage {index} has invalid duration {seconds}")]
    InvalidDuration { index: usize, seconds: f64 },
    #[error("stage {index} ({seconds}s) does not increase on the previous stage")]
    NotIncreasing { index: usize, seconds: f64 },
}

/// Strictly increasing unlock durations in seconds.
///
/// The last value is the full-reveal ceiling every progress fraction is
/// normalized against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct StageLadder {
    stages: Vec<f64>,
}

impl StageLadder {
    pub fn new(stages: Vec<f64>) -> Result<Self, LadderError> {
        if stages.is_empty() {
            return Err(LadderError::Empty);
        }
        for (index, &seconds) in stages.iter().enumerate() {
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err(LadderError::InvalidDuration { index, seconds });
            }
            if index > 0 && seconds <= stages[index - 1] {
                return Err(LadderError::NotIncreasing { index, seconds });
            }
        }
        Ok(Self { stages })
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false; an empty ladder cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Index of the final stage
    pub fn last_index(&self) -> usize {
        self.stages.len() - 1
    }

    /// Unlocked seconds at `index`, clamped to the final stage
    pub fn seconds_at(&self, index: usize) -> f64 {
        self.stages[index.min(self.last_index())]
    }

    /// Full-reveal duration
    pub fn ceiling(&self) -> f64 {
        self.stages[self.last_index()]
    }

    /// Position of each stage boundary as a fraction of the ceiling
    pub fn marker_fractions(&self) -> Vec<f64> {
        let ceiling = self.ceiling();
        self.stages.iter().map(|s| s / ceiling).collect()
    }

    pub fn stages(&self) -> &[f64] {
        &self.stages
    }
}

impl TryFrom<Vec<f64>> for StageLadder {
    type Error = LadderError;

    fn try_from(stages: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(stages)
    }
}

impl From<StageLadder> for Vec<f64> {
    fn from(ladder: StageLadder) -> Self {
        ladder.stages
    }
}
