//! Scoring session — realtime ingestion on one side, polling queries on the other.
//!
//! [`session`] builds a bounded lock-free ring and splits it. The [`Ingestor`]
//! half lives on the MIDI / audio thread and only pushes. The [`Session`] half
//! owns both [`EventLog`]s; every query first drains the ring into the logs
//! and then reads them on the same thread, so a compute always sees one
//! consistent snapshot and a reset can never interleave with it.

pub mod ingest;
pub mod shared;

pub use ingest::Ingestor;
pub use shared::SessionShared;

use std::sync::Arc;

use ringbuf::traits::{Consumer, Split};
use ringbuf::{HeapCons, HeapRb};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::event::{EventLog, Role, RoutedNote};
use crate::score::{ScoreEngine, ScoreError, ScoreResult, Threshold};

/// Lowest valid MIDI channel (1-based).
pub const MIN_CHANNEL: u8 = 1;
/// Highest valid MIDI channel (1-based).
pub const MAX_CHANNEL: u8 = 16;
/// Default ingestion ring capacity (number of note-ons between polls).
pub const DEFAULT_RING_CAPACITY: usize = 4096;

/// Session errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("MIDI channel must be between 1 and 16, got {0}")]
    InvalidChannel(u8),
    #[error("ingestion ring capacity must be at least 1")]
    InvalidCapacity,
    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// Check that `channel` is a 1-based MIDI channel.
pub fn validate_channel(channel: u8) -> Result<u8, SessionError> {
    if (MIN_CHANNEL..=MAX_CHANNEL).contains(&channel) {
        Ok(channel)
    } else {
        Err(SessionError::InvalidChannel(channel))
    }
}

/// Routing, threshold and capacity for a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub reference_channel: u8,
    pub performance_channel: u8,
    pub threshold_ms: i64,
    pub ring_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reference_channel: 1,
            performance_channel: 10,
            threshold_ms: Threshold::DEFAULT.as_millis() as i64,
            ring_capacity: DEFAULT_RING_CAPACITY,
        }
    }
}

/// Event counts per role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogSizes {
    pub reference: usize,
    pub performance: usize,
}

/// Create a session, returning its ingestion and query halves.
pub fn session(config: &SessionConfig) -> Result<(Ingestor, Session), SessionError> {
    validate_channel(config.reference_channel)?;
    validate_channel(config.performance_channel)?;
    if config.ring_capacity == 0 {
        return Err(SessionError::InvalidCapacity);
    }
    let engine = ScoreEngine::with_threshold_ms(config.threshold_ms)?;

    let (producer, consumer) = HeapRb::<RoutedNote>::new(config.ring_capacity).split();
    let shared = Arc::new(SessionShared::new(
        config.reference_channel,
        config.performance_channel,
    ));

    let session = Session {
        consumer,
        reference: EventLog::new(Role::Reference),
        performance: EventLog::new(Role::Performance),
        engine,
        shared: Arc::clone(&shared),
        reported_dropped: 0,
    };
    Ok((Ingestor::new(producer, shared), session))
}

/// Query half of a session. Owns both event logs.
pub struct Session {
    consumer: HeapCons<RoutedNote>,
    reference: EventLog,
    performance: EventLog,
    engine: ScoreEngine,
    shared: Arc<SessionShared>,
    reported_dropped: u64,
}

impl Session {
    /// Move every pending note from the ring into its log.
    ///
    /// Returns the number of notes moved.
    pub fn sync(&mut self) -> usize {
        let mut moved = 0;
        while let Some(note) = self.consumer.try_pop() {
            match note.role {
                Role::Reference => self.reference.push(note.event),
                Role::Performance => self.performance.push(note.event),
            }
            moved += 1;
        }

        let dropped = self.shared.dropped();
        if dropped > self.reported_dropped {
            warn!(
                lost = dropped - self.reported_dropped,
                total = dropped,
                "ingestion ring overflowed, notes were dropped"
            );
            self.reported_dropped = dropped;
        }
        moved
    }

    /// Score the current logs against the session threshold.
    pub fn compute(&mut self) -> ScoreResult {
        self.sync();
        let result = self
            .engine
            .compute(&self.reference, &self.performance)
            .with_last_used_channel(self.shared.last_used_channel());
        debug!(
            percentage = result.percentage,
            in_threshold = result.in_threshold_percentage,
            reference = self.reference.len(),
            performance = self.performance.len(),
            "score computed"
        );
        result
    }

    /// Score the current logs against a one-off threshold.
    pub fn compute_with(&mut self, threshold_ms: i64) -> Result<ScoreResult, SessionError> {
        let engine = ScoreEngine::with_threshold_ms(threshold_ms)?;
        self.sync();
        Ok(engine
            .compute(&self.reference, &self.performance)
            .with_last_used_channel(self.shared.last_used_channel()))
    }

    /// Discard pending notes and clear both logs and the note counter.
    pub fn reset(&mut self) {
        let pending = self.consumer.clear();
        let cleared = self.reference.len() + self.performance.len();
        self.reference.clear();
        self.performance.clear();
        self.shared.reset_counters();
        info!(cleared, pending, "session reset");
    }

    pub fn log_sizes(&mut self) -> LogSizes {
        self.sync();
        LogSizes {
            reference: self.reference.len(),
            performance: self.performance.len(),
        }
    }

    /// Reference log as of the last sync.
    pub fn reference_log(&self) -> &EventLog {
        &self.reference
    }

    /// Performance log as of the last sync.
    pub fn performance_log(&self) -> &EventLog {
        &self.performance
    }

    pub fn threshold(&self) -> Threshold {
        self.engine.threshold()
    }

    pub fn set_threshold(&mut self, threshold_ms: i64) -> Result<(), SessionError> {
        self.engine.set_threshold_ms(threshold_ms)?;
        info!(threshold_ms, "threshold changed");
        Ok(())
    }

    pub fn set_reference_channel(&mut self, channel: u8) -> Result<(), SessionError> {
        self.shared.set_reference_channel(validate_channel(channel)?);
        info!(channel, "reference channel changed");
        Ok(())
    }

    pub fn set_performance_channel(&mut self, channel: u8) -> Result<(), SessionError> {
        self.shared.set_performance_channel(validate_channel(channel)?);
        info!(channel, "performance channel changed");
        Ok(())
    }

    pub fn reference_channel(&self) -> u8 {
        self.shared.reference_channel()
    }

    pub fn performance_channel(&self) -> u8 {
        self.shared.performance_channel()
    }

    pub fn notes_seen(&self) -> u64 {
        self.shared.notes_seen()
    }

    pub fn dropped(&self) -> u64 {
        self.shared.dropped()
    }

    pub fn last_used_channel(&self) -> Option<u8> {
        self.shared.last_used_channel()
    }

    pub fn last_note(&self) -> Option<u8> {
        self.shared.last_note()
    }
}
