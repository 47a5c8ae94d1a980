//! Scoring — nearest-pitch-match distance between a reference and a performance.
//!
//! For every reference note the closest performance note of the same pitch is
//! found by a full linear scan. Distances saturate at the [`Threshold`], so an
//! unmatched note costs exactly the threshold and never more. The per-note
//! distances are folded into a [`ScoreResult`].

pub mod engine;
pub mod result;

pub use engine::{compute, distance, ScoreEngine};
pub use result::ScoreResult;

use thiserror::Error;

/// Scoring errors. The only failure is a violated threshold precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// Threshold must be a positive number of milliseconds.
    #[error("threshold must be positive, got {0} ms")]
    InvalidThreshold(i64),
}

/// A validated, strictly positive matching window in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Threshold(u64);

impl Threshold {
    /// Threshold used when nothing else is configured.
    pub const DEFAULT: Threshold = Threshold(200);

    /// Validate a caller-supplied threshold.
    pub fn new(ms: i64) -> Result<Self, ScoreError> {
        if ms <= 0 {
            return Err(ScoreError::InvalidThreshold(ms));
        }
        Ok(Self(ms as u64))
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for Threshold {
    type Error = ScoreError;

    fn try_from(ms: i64) -> Result<Self, Self::Error> {
        Threshold::new(ms)
    }
}
