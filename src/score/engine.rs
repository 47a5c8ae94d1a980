//! Score engine — nearest same-pitch match per reference note.

use super::result::ScoreResult;
use super::{ScoreError, Threshold};
use crate::event::{EventLog, NoteEvent};

/// Distance from `event` to the closest same-pitch note in `performance`.
///
/// Starts at the threshold and only moves down on a strictly closer match,
/// so a note with no match (or only far matches) yields exactly the threshold.
/// Every performance event is examined; there is no early exit.
pub fn distance(event: &NoteEvent, performance: &EventLog, threshold: Threshold) -> u64 {
    let mut min_distance = threshold.as_millis();
    for candidate in performance {
        if candidate.pitch != event.pitch {
            continue;
        }
        let d = event.distance_to(candidate);
        if d < min_distance {
            min_distance = d;
        }
    }
    min_distance
}

/// Score `performance` against `reference` with a caller-supplied threshold.
///
/// Rejects a threshold `<= 0` before looking at either log.
pub fn compute(
    reference: &EventLog,
    performance: &EventLog,
    threshold_ms: i64,
) -> Result<ScoreResult, ScoreError> {
    let engine = ScoreEngine::new(Threshold::new(threshold_ms)?);
    Ok(engine.compute(reference, performance))
}

/// Stateless scorer holding only the threshold knob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreEngine {
    threshold: Threshold,
}

impl ScoreEngine {
    pub fn new(threshold: Threshold) -> Self {
        Self { threshold }
    }

    /// Build an engine from a raw millisecond value.
    pub fn with_threshold_ms(threshold_ms: i64) -> Result<Self, ScoreError> {
        Ok(Self::new(Threshold::new(threshold_ms)?))
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Replace the threshold. The old value stays in place on error.
    pub fn set_threshold_ms(&mut self, threshold_ms: i64) -> Result<(), ScoreError> {
        self.threshold = Threshold::new(threshold_ms)?;
        Ok(())
    }

    /// Score `performance` against `reference`. Neither log is modified.
    ///
    /// An empty reference log yields [`ScoreResult::empty`]. Because every
    /// per-note distance saturates at the threshold, `percentage` stays within
    /// `0..=100` even though it is not clamped.
    pub fn compute(&self, reference: &EventLog, performance: &EventLog) -> ScoreResult {
        if reference.is_empty() {
            return ScoreResult::empty();
        }

        let threshold = self.threshold.as_millis();
        let mut sum_of_distances: u128 = 0;
        let mut in_threshold_count = 0usize;

        for event in reference {
            let d = distance(event, performance, self.threshold);
            sum_of_distances += d as u128;
            if d < threshold {
                in_threshold_count += 1;
            }
        }

        let count = reference.len();
        // trunc(average * 100 / threshold) in exact integer arithmetic
        let penalty = (sum_of_distances * 100) / (count as u128 * threshold as u128);
        let percentage = 100 - penalty as i32;
        let in_threshold_percentage = (in_threshold_count * 100 / count) as i32;

        ScoreResult {
            percentage,
            in_threshold_percentage,
            last_used_channel: None,
            reference_count: count,
            in_threshold_count,
            average_distance_ms: sum_of_distances as f64 / count as f64,
        }
    }
}
