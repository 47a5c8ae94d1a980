//! Ingestion half of a session — runs on the realtime / driver thread.
//!
//! Pushes routed note-ons into a lock-free ring. Never blocks, never logs and
//! never allocates per event.

use std::sync::Arc;

use ringbuf::traits::Producer;
use ringbuf::HeapProd;

use super::shared::SessionShared;
use crate::event::{NoteEvent, Role, RoutedNote};
use crate::midi::clock::BlockClock;
use crate::midi::mapping::{parse_message, route, MidiMessage};

/// Producer side of a session. Move it into the MIDI callback.
pub struct Ingestor {
    producer: HeapProd<RoutedNote>,
    shared: Arc<SessionShared>,
}

impl Ingestor {
    pub(crate) fn new(producer: HeapProd<RoutedNote>, shared: Arc<SessionShared>) -> Self {
        Self { producer, shared }
    }

    /// Record an already routed note-on.
    ///
    /// Returns `false` if the ring was full and the note was dropped.
    pub fn record(&mut self, role: Role, timestamp_ms: i64, pitch: u8) -> bool {
        self.shared.note_seen(pitch);
        let note = RoutedNote {
            role,
            event: NoteEvent::new(timestamp_ms, pitch),
        };
        if self.producer.try_push(note).is_err() {
            self.shared.note_dropped();
            return false;
        }
        true
    }

    /// Parse a raw MIDI message and record it if it is a note-on on one of
    /// the routed channels. Every channel-voice message updates the last
    /// used channel.
    ///
    /// Returns the role the note was routed to.
    pub fn handle_message(&mut self, msg: &[u8], timestamp_ms: i64) -> Option<Role> {
        let message = parse_message(msg)?;
        self.shared.set_last_used_channel(message.channel());

        let MidiMessage::NoteOn { channel, pitch, .. } = message else {
            return None;
        };
        let role = route(
            channel,
            self.shared.reference_channel(),
            self.shared.performance_channel(),
        )?;
        self.record(role, timestamp_ms, pitch);
        Some(role)
    }

    /// Handle one host buffer of `(sample_offset, message)` pairs, stamping
    /// each message with `clock`.
    pub fn process_block<'a>(
        &mut self,
        clock: &BlockClock,
        messages: impl IntoIterator<Item = (u32, &'a [u8])>,
    ) -> usize {
        let mut routed = 0;
        for (offset, msg) in messages {
            if self.handle_message(msg, clock.timestamp(offset)).is_some() {
                routed += 1;
            }
        }
        routed
    }

    pub fn shared(&self) -> &SessionShared {
        &self.shared
    }
}
