//! State shared between the ingestion thread and the query side.
//!
//! Everything here is an atomic so the realtime side never takes a lock.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// Sentinel for "no channel / no note seen yet". Valid values never reach it.
const NONE: u8 = u8::MAX;

/// Session-scoped routing and counters.
#[derive(Debug)]
pub struct SessionShared {
    reference_channel: AtomicU8,
    performance_channel: AtomicU8,
    last_used_channel: AtomicU8,
    last_note: AtomicU8,
    notes_seen: AtomicU64,
    dropped: AtomicU64,
}

impl SessionShared {
    pub fn new(reference_channel: u8, performance_channel: u8) -> Self {
        Self {
            reference_channel: AtomicU8::new(reference_channel),
            performance_channel: AtomicU8::new(performance_channel),
            last_used_channel: AtomicU8::new(NONE),
            last_note: AtomicU8::new(NONE),
            notes_seen: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    pub fn reference_channel(&self) -> u8 {
        self.reference_channel.load(Ordering::Relaxed)
    }

    pub fn performance_channel(&self) -> u8 {
        self.performance_channel.load(Ordering::Relaxed)
    }

    pub(crate) fn set_reference_channel(&self, channel: u8) {
        self.reference_channel.store(channel, Ordering::Relaxed);
    }

    pub(crate) fn set_performance_channel(&self, channel: u8) {
        self.performance_channel.store(channel, Ordering::Relaxed);
    }

    pub fn last_used_channel(&self) -> Option<u8> {
        decode(self.last_used_channel.load(Ordering::Relaxed))
    }

    pub(crate) fn set_last_used_channel(&self, channel: u8) {
        self.last_used_channel.store(channel, Ordering::Relaxed);
    }

    /// Pitch of the most recent routed note-on.
    pub fn last_note(&self) -> Option<u8> {
        decode(self.last_note.load(Ordering::Relaxed))
    }

    /// Routed note-ons since the session started or was last reset.
    pub fn notes_seen(&self) -> u64 {
        self.notes_seen.load(Ordering::Relaxed)
    }

    /// Note-ons lost because the ingestion ring was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub(crate) fn note_seen(&self, pitch: u8) {
        self.notes_seen.fetch_add(1, Ordering::Relaxed);
        self.last_note.store(pitch, Ordering::Relaxed);
    }

    pub(crate) fn note_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn reset_counters(&self) {
        self.notes_seen.store(0, Ordering::Relaxed);
    }
}

fn decode(raw: u8) -> Option<u8> {
    (raw != NONE).then_some(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_nothing_seen() {
        let shared = SessionShared::new(1, 10);
        assert_eq!(shared.reference_channel(), 1);
        assert_eq!(shared.performance_channel(), 10);
        assert_eq!(shared.last_used_channel(), None);
        assert_eq!(shared.last_note(), None);
        assert_eq!(shared.notes_seen(), 0);
        assert_eq!(shared.dropped(), 0);
    }

    #[test]
    fn note_seen_updates_counter_and_last_note() {
        let shared = SessionShared::new(1, 2);
        shared.note_seen(60);
        shared.note_seen(0);
        assert_eq!(shared.notes_seen(), 2);
        assert_eq!(shared.last_note(), Some(0));
    }

    #[test]
    fn reset_counters_keeps_last_channel() {
        let shared = SessionShared::new(1, 2);
        shared.set_last_used_channel(2);
        shared.note_seen(64);
        shared.reset_counters();
        assert_eq!(shared.notes_seen(), 0);
        assert_eq!(shared.last_used_channel(), Some(2));
    }

    #[test]
    fn routing_can_be_retuned() {
        let shared = SessionShared::new(1, 2);
        shared.set_reference_channel(5);
        shared.set_performance_channel(6);
        assert_eq!(shared.reference_channel(), 5);
        assert_eq!(shared.performance_channel(), 6);
    }
}
