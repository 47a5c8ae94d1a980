//! Configuration — routing, threshold and polling settings loaded from
//! ~/.mididiff/config.yaml. Command-line flags override file values.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::score::Threshold;
use crate::session::{validate_channel, SessionConfig, SessionError, DEFAULT_RING_CAPACITY};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] io::Error),
    #[error("config parse: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] SessionError),
    #[error("invalid config: poll interval must be at least 1 ms")]
    PollInterval,
}

/// Settings file contents. Every field is optional in YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiDiffConfig {
    /// Preferred MIDI input device (substring match). None = first available.
    pub device_name: Option<String>,
    /// Channel (1–16) carrying the reference performance.
    pub reference_channel: u8,
    /// Channel (1–16) carrying the performance under test.
    pub performance_channel: u8,
    /// Matching threshold in milliseconds.
    pub threshold_ms: i64,
    /// How often the score is recomputed, in milliseconds.
    pub poll_interval_ms: u64,
    /// Note-ons buffered between polls before new ones are dropped.
    pub ring_capacity: usize,
}

impl Default for MidiDiffConfig {
    fn default() -> Self {
        Self {
            device_name: None,
            reference_channel: 1,
            performance_channel: 10,
            threshold_ms: Threshold::DEFAULT.as_millis() as i64,
            poll_interval_ms: 1000,
            ring_capacity: DEFAULT_RING_CAPACITY,
        }
    }
}

/// Standard config path (~/.mididiff/config.yaml).
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".mididiff");
    path.push("config.yaml");
    path
}

impl MidiDiffConfig {
    /// Load from the standard path. A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as YAML, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_channel(self.reference_channel)?;
        validate_channel(self.performance_channel)?;
        Threshold::new(self.threshold_ms).map_err(SessionError::from)?;
        if self.ring_capacity == 0 {
            return Err(SessionError::InvalidCapacity.into());
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::PollInterval);
        }
        Ok(())
    }

    /// The session-level subset of this config.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            reference_channel: self.reference_channel,
            performance_channel: self.performance_channel,
            threshold_ms: self.threshold_ms,
            ring_capacity: self.ring_capacity,
        }
    }
}
