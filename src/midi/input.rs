//! Live MIDI input — connects a `midir` port and feeds an [`Ingestor`].

use midir::{MidiInput as MidirInput, MidiInputConnection};
use tracing::info;

use super::clock::StreamClock;
use super::MidiError;
use crate::session::Ingestor;

const CLIENT_NAME: &str = "mididiff";

/// Active MIDI input connection. Dropping it closes the port.
pub struct MidiInput {
    _connection: MidiInputConnection<()>,
    port_name: String,
}

impl MidiInput {
    /// Start listening on a MIDI port.
    ///
    /// Picks the first port whose name contains `device_name`, or the first
    /// available port when no name is given. Incoming messages are stamped
    /// with a [`StreamClock`] and handed to the ingestor on the driver thread.
    pub fn start(device_name: Option<&str>, mut ingestor: Ingestor) -> Result<Self, MidiError> {
        let midi_in = MidirInput::new(CLIENT_NAME).map_err(|e| MidiError::Init(e.to_string()))?;

        let ports = midi_in.ports();
        if ports.is_empty() {
            return Err(MidiError::NoPorts);
        }

        let (port, port_name) = match device_name {
            Some(filter) => ports
                .iter()
                .find_map(|p| {
                    let name = midi_in.port_name(p).unwrap_or_default();
                    name.contains(filter).then(|| (p.clone(), name))
                })
                .ok_or_else(|| MidiError::DeviceNotFound(filter.to_string()))?,
            None => {
                let p = ports[0].clone();
                let name = midi_in
                    .port_name(&p)
                    .unwrap_or_else(|_| "unknown".to_string());
                (p, name)
            }
        };

        let mut clock = StreamClock::new();
        let connection = midi_in
            .connect(
                &port,
                "mididiff-input",
                move |stamp_us, msg, _| {
                    let timestamp_ms = clock.timestamp(stamp_us);
                    ingestor.handle_message(msg, timestamp_ms);
                },
                (),
            )
            .map_err(|e| MidiError::Connect(e.to_string()))?;

        info!(port = %port_name, "MIDI input connected");
        Ok(Self {
            _connection: connection,
            port_name,
        })
    }

    /// Name of the connected port.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// List all available MIDI input port names.
    pub fn list_devices() -> Result<Vec<String>, MidiError> {
        let midi_in = MidirInput::new(&format!("{CLIENT_NAME}-list"))
            .map_err(|e| MidiError::Init(e.to_string()))?;
        Ok(midi_in
            .ports()
            .iter()
            .filter_map(|p| midi_in.port_name(p).ok())
            .collect())
    }
}
