//! MIDI glue — message parsing, channel routing, timestamping and live input.

pub mod clock;
pub mod input;
pub mod mapping;

pub use clock::{epoch_millis_now, BlockClock, StreamClock};
pub use input::MidiInput;
pub use mapping::{parse_message, route, MidiMessage};

use thiserror::Error;

/// MIDI input errors.
#[derive(Debug, Error)]
pub enum MidiError {
    /// The MIDI backend could not be initialised.
    #[error("MIDI init: {0}")]
    Init(String),
    #[error("no MIDI input ports available")]
    NoPorts,
    #[error("MIDI device matching '{0}' not found")]
    DeviceNotFound(String),
    #[error("MIDI connect: {0}")]
    Connect(String),
}
