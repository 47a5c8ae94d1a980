//! The value produced by each scoring pass.

use serde::Serialize;

/// Outcome of one scoring pass. Produced fresh on every compute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// `100 - average distance as a percentage of the threshold`. Not clamped.
    pub percentage: i32,
    /// Share of reference notes matched strictly inside the threshold (0–100).
    pub in_threshold_percentage: i32,
    /// Last MIDI channel (1–16) seen by the ingestion side, echoed unchanged.
    pub last_used_channel: Option<u8>,
    /// Number of reference notes that were scored.
    pub reference_count: usize,
    /// Number of reference notes matched strictly inside the threshold.
    pub in_threshold_count: usize,
    /// Mean saturated distance over all reference notes, in milliseconds.
    pub average_distance_ms: f64,
}

impl ScoreResult {
    /// The defined result for an empty reference log.
    pub fn empty() -> Self {
        Self {
            percentage: 0,
            in_threshold_percentage: 0,
            last_used_channel: None,
            reference_count: 0,
            in_threshold_count: 0,
            average_distance_ms: 0.0,
        }
    }

    /// Attach the channel most recently seen by the ingestion side.
    pub fn with_last_used_channel(mut self, channel: Option<u8>) -> Self {
        self.last_used_channel = channel;
        self
    }
}

impl Default for ScoreResult {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Display for ScoreResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}% ({}% in threshold, {} reference notes",
            self.percentage, self.in_threshold_percentage, self.reference_count
        )?;
        match self.last_used_channel {
            Some(ch) => write!(f, ", last channel {ch})"),
            None => write!(f, ", last channel -)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_is_zero() {
        let r = ScoreResult::empty();
        assert_eq!(r.percentage, 0);
        assert_eq!(r.in_threshold_percentage, 0);
        assert_eq!(r.last_used_channel, None);
        assert_eq!(r, ScoreResult::default());
    }

    #[test]
    fn with_last_used_channel_sets_only_channel() {
        let r = ScoreResult::empty().with_last_used_channel(Some(10));
        assert_eq!(r.last_used_channel, Some(10));
        assert_eq!(r.percentage, 0);
    }

    #[test]
    fn display_format() {
        let r = ScoreResult {
            percentage: 38,
            in_threshold_percentage: 50,
            last_used_channel: Some(1),
            reference_count: 2,
            in_threshold_count: 1,
            average_distance_ms: 125.0,
        };
        assert_eq!(
            r.to_string(),
            "38% (50% in threshold, 2 reference notes, last channel 1)"
        );
        assert_eq!(
            ScoreResult::empty().to_string(),
            "0% (0% in threshold, 0 reference notes, last channel -)"
        );
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(ScoreResult::empty()).unwrap();
        assert_eq!(json["percentage"], 0);
        assert_eq!(json["in_threshold_percentage"], 0);
        assert!(json["last_used_channel"].is_null());
    }
}
