//! MIDI message parsing and channel-to-role routing.

use crate::event::Role;

/// The channel-voice messages scoring cares about. Channels are 1-based (1–16).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn { channel: u8, pitch: u8, velocity: u8 },
    NoteOff { channel: u8, pitch: u8 },
    /// Any other channel-voice message (CC, program change, pitch bend, ...).
    Other { channel: u8 },
}

impl MidiMessage {
    pub fn channel(&self) -> u8 {
        match *self {
            MidiMessage::NoteOn { channel, .. }
            | MidiMessage::NoteOff { channel, .. }
            | MidiMessage::Other { channel } => channel,
        }
    }
}

/// Parse a raw MIDI message.
///
/// Message format:
/// - Note On:  [0x90 | channel, note, velocity]
/// - Note Off: [0x80 | channel, note, velocity]
/// - other channel-voice status bytes 0xA0–0xEF
///
/// System messages (0xF0 and up), running-status data and truncated note
/// messages return `None`. Note On with velocity 0 is a Note Off.
pub fn parse_message(msg: &[u8]) -> Option<MidiMessage> {
    let &status_byte = msg.first()?;
    if !(0x80..0xF0).contains(&status_byte) {
        return None;
    }

    let status = status_byte & 0xF0;
    let channel = (status_byte & 0x0F) + 1;

    match status {
        0x90 if msg.len() >= 3 => {
            let pitch = msg[1] & 0x7F;
            let velocity = msg[2] & 0x7F;
            if velocity == 0 {
                Some(MidiMessage::NoteOff { channel, pitch })
            } else {
                Some(MidiMessage::NoteOn {
                    channel,
                    pitch,
                    velocity,
                })
            }
        }
        0x80 if msg.len() >= 3 => Some(MidiMessage::NoteOff {
            channel,
            pitch: msg[1] & 0x7F,
        }),
        0x80 | 0x90 => None,
        _ => Some(MidiMessage::Other { channel }),
    }
}

/// Resolve which role a channel feeds. The reference role wins when both
/// routing channels are the same.
pub fn route(channel: u8, reference_channel: u8, performance_channel: u8) -> Option<Role> {
    if channel == reference_channel {
        Some(Role::Reference)
    } else if channel == performance_channel {
        Some(Role::Performance)
    } else {
        None
    }
}
