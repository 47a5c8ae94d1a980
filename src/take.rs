//! Takes — a reference and a performance event list stored as YAML, scored
//! offline without any MIDI hardware.
//!
//! ```yaml
//! reference:
//!   - { timestamp_ms: 1000, pitch: 60 }
//! performance:
//!   - { timestamp_ms: 1050, pitch: 60 }
//! ```

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::{EventLog, NoteEvent, Role};
use crate::score::{self, ScoreError, ScoreResult};

/// Take file errors.
#[derive(Debug, Error)]
pub enum TakeError {
    #[error("take io: {0}")]
    Io(#[from] io::Error),
    #[error("take parse: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("pitch {0} is outside the MIDI range 0-127")]
    Pitch(u8),
}

/// One recorded pair of streams.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Take {
    #[serde(default)]
    pub reference: Vec<NoteEvent>,
    #[serde(default)]
    pub performance: Vec<NoteEvent>,
}

impl Take {
    pub fn reference_log(&self) -> EventLog {
        EventLog::from_events(Role::Reference, self.reference.iter().copied())
    }

    pub fn performance_log(&self) -> EventLog {
        EventLog::from_events(Role::Performance, self.performance.iter().copied())
    }

    /// Score the take with the given threshold.
    pub fn score(&self, threshold_ms: i64) -> Result<ScoreResult, ScoreError> {
        score::compute(&self.reference_log(), &self.performance_log(), threshold_ms)
    }
}

/// Load a take from a YAML file.
pub fn load_take(path: &Path) -> Result<Take, TakeError> {
    let content = std::fs::read_to_string(path)?;
    let take: Take = serde_yaml::from_str(&content)?;
    if let Some(bad) = take
        .reference
        .iter()
        .chain(&take.performance)
        .find(|e| e.pitch > 127)
    {
        return Err(TakeError::Pitch(bad.pitch));
    }
    Ok(take)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const EXAMPLE: &str = r#"
reference:
  - { timestamp_ms: 1000, pitch: 60 }
  - { timestamp_ms: 2000, pitch: 64 }
performance:
  - { timestamp_ms: 1050, pitch: 60 }
  - { timestamp_ms: 2300, pitch: 64 }
"#;

    #[test]
    fn parse_and_score() {
        let take: Take = serde_yaml::from_str(EXAMPLE).unwrap();
        assert_eq!(take.reference.len(), 2);
        let result = take.score(200).unwrap();
        assert_eq!(result.percentage, 38);
        assert_eq!(result.in_threshold_percentage, 50);
    }

    #[test]
    fn logs_carry_roles() {
        let take: Take = serde_yaml::from_str(EXAMPLE).unwrap();
        assert_eq!(take.reference_log().role(), Role::Reference);
        assert_eq!(take.performance_log().role(), Role::Performance);
        assert_eq!(take.performance_log().events()[1], NoteEvent::new(2300, 64));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let take: Take = serde_yaml::from_str("performance: []\n").unwrap();
        assert!(take.reference.is_empty());
        assert_eq!(take.score(100).unwrap(), ScoreResult::empty());
    }

    #[test]
    fn load_from_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), EXAMPLE).unwrap();
        let take = load_take(file.path()).unwrap();
        assert_eq!(take.performance.len(), 2);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_take(&dir.path().join("nope.yaml")),
            Err(TakeError::Io(_))
        ));
    }

    #[test]
    fn pitch_above_127_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "performance:\n  - { timestamp_ms: 1, pitch: 128 }\n").unwrap();
        assert!(matches!(load_take(file.path()), Err(TakeError::Pitch(128))));
    }

    #[test]
    fn out_of_range_pitch_is_parse_error() {
        let yaml = "reference:\n  - { timestamp_ms: 1, pitch: 300 }\n";
        assert!(serde_yaml::from_str::<Take>(yaml).is_err());
    }
}
