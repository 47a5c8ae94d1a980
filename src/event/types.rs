//! Note events — the unit of information both streams are made of.
//!
//! A [`NoteEvent`] is a note-on reduced to what scoring needs: when it happened
//! (wall-clock milliseconds) and which key was pressed.

use serde::{Deserialize, Serialize};

/// Which logical stream an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The ground-truth (control) performance.
    Reference,
    /// The performance being scored.
    Performance,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Reference => write!(f, "reference"),
            Role::Performance => write!(f, "performance"),
        }
    }
}

/// A single note-on occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Wall-clock milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    /// MIDI note number (0–127).
    pub pitch: u8,
}

impl NoteEvent {
    pub fn new(timestamp_ms: i64, pitch: u8) -> Self {
        Self {
            timestamp_ms,
            pitch,
        }
    }

    /// Absolute time between two events, in milliseconds.
    pub fn distance_to(&self, other: &NoteEvent) -> u64 {
        self.timestamp_ms.abs_diff(other.timestamp_ms)
    }
}

/// A note-on tagged with its role, as carried from the ingestion thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutedNote {
    pub role: Role,
    pub event: NoteEvent,
}
