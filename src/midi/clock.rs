//! Timestamp derivation — turns host or driver time into wall-clock milliseconds.
//!
//! Both clocks produce milliseconds since the Unix epoch so that events from
//! either stream land on the same axis.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn epoch_millis_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Clock for block-based hosts: the wall-clock time at the start of the
/// current audio block plus the intra-block sample offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockClock {
    block_start_ms: i64,
    sample_rate: f64,
}

impl BlockClock {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            block_start_ms: epoch_millis_now(),
            sample_rate,
        }
    }

    /// Mark the start of a new block at the given wall-clock time.
    pub fn begin_block(&mut self, epoch_ms: i64) {
        self.block_start_ms = epoch_ms;
    }

    /// Mark the start of a new block now.
    pub fn begin_block_now(&mut self) {
        self.begin_block(epoch_millis_now());
    }

    pub fn block_start_ms(&self) -> i64 {
        self.block_start_ms
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Timestamp of a message `sample_offset` samples into the current block.
    /// A non-positive sample rate maps every offset to the block start.
    pub fn timestamp(&self, sample_offset: u32) -> i64 {
        if self.sample_rate <= 0.0 {
            return self.block_start_ms;
        }
        let offset_ms = (sample_offset as f64 * 1000.0 / self.sample_rate).round() as i64;
        self.block_start_ms + offset_ms
    }
}

/// Clock for live driver input that stamps messages in microseconds from an
/// arbitrary origin. The first stamp seen is anchored to the wall clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamClock {
    anchor: Option<(u64, i64)>,
}

impl StreamClock {
    pub fn new() -> Self {
        Self { anchor: None }
    }

    /// Wall-clock milliseconds for a driver stamp, anchoring on first use.
    pub fn timestamp(&mut self, stamp_us: u64) -> i64 {
        self.timestamp_at(stamp_us, epoch_millis_now())
    }

    /// Same as [`StreamClock::timestamp`] with an explicit anchor time.
    pub fn timestamp_at(&mut self, stamp_us: u64, now_ms: i64) -> i64 {
        let (anchor_us, anchor_ms) = *self.anchor.get_or_insert((stamp_us, now_ms));
        let delta_us = stamp_us as i128 - anchor_us as i128;
        anchor_ms + (delta_us / 1000) as i64
    }

    /// Forget the anchor; the next stamp re-anchors.
    pub fn reset(&mut self) {
        self.anchor = None;
    }
}
