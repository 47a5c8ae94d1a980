//! Control channel — mpsc bridge for user commands (reset, threshold, routing).
//!
//! Commands are typed as text lines on stdin by the CLI, parsed here, and
//! polled by the score loop between computes.

use std::sync::mpsc;

/// Commands from the user to a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// Clear both logs.
    Reset,
    /// Change the matching threshold (milliseconds).
    SetThreshold(i64),
    /// Route a different MIDI channel (1–16) to the reference log.
    SetReferenceChannel(u8),
    /// Route a different MIDI channel (1–16) to the performance log.
    SetPerformanceChannel(u8),
    /// Stop listening.
    Quit,
}

impl ControlEvent {
    /// Parse a command line such as `reset`, `threshold 500`, `ref 2`,
    /// `perf 10` or `quit`. Unknown or malformed lines return `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = words.next()?.to_ascii_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            return None;
        }

        match (command.as_str(), arg) {
            ("reset" | "r", None) => Some(ControlEvent::Reset),
            ("quit" | "q" | "exit", None) => Some(ControlEvent::Quit),
            ("threshold" | "t", Some(v)) => v.parse().ok().map(ControlEvent::SetThreshold),
            ("ref" | "reference", Some(v)) => v.parse().ok().map(ControlEvent::SetReferenceChannel),
            ("perf" | "performance", Some(v)) => {
                v.parse().ok().map(ControlEvent::SetPerformanceChannel)
            }
            _ => None,
        }
    }
}

/// Sender half — clone this for input threads.
pub type ControlSender = mpsc::Sender<ControlEvent>;

/// Receiver half — held by the score loop.
pub struct ControlReceiver {
    rx: mpsc::Receiver<ControlEvent>,
}

impl ControlReceiver {
    /// Non-blocking poll for the next command.
    pub fn poll(&self) -> Option<ControlEvent> {
        self.rx.try_recv().ok()
    }

    /// Drain all pending commands.
    pub fn drain(&self) -> Vec<ControlEvent> {
        self.rx.try_iter().collect()
    }
}

/// Create a new control channel pair.
pub fn control_channel() -> (ControlSender, ControlReceiver) {
    let (tx, rx) = mpsc::channel();
    (tx, ControlReceiver { rx })
}
