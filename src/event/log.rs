//! Append-only event storage for one role.
//!
//! Events are kept in arrival order and never re-sorted. Scoring performs a
//! full scan, so an out-of-order append costs nothing but is still matched
//! correctly.

use super::types::{NoteEvent, Role};

/// Arrival-ordered record of note-ons for a single role.
#[derive(Debug, Clone, PartialEq)]
pub struct EventLog {
    role: Role,
    events: Vec<NoteEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            events: Vec::new(),
        }
    }

    /// Create an empty log with room for `capacity` events.
    pub fn with_capacity(role: Role, capacity: usize) -> Self {
        Self {
            role,
            events: Vec::with_capacity(capacity),
        }
    }

    /// Build a log from already collected events, keeping their order.
    pub fn from_events(role: Role, events: impl IntoIterator<Item = NoteEvent>) -> Self {
        Self {
            role,
            events: events.into_iter().collect(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Append a note-on at the tail.
    pub fn append(&mut self, timestamp_ms: i64, pitch: u8) {
        self.events.push(NoteEvent::new(timestamp_ms, pitch));
    }

    /// Append a prebuilt event at the tail.
    pub fn push(&mut self, event: NoteEvent) {
        self.events.push(event);
    }

    /// Remove every event. Capacity is retained.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events, in arrival order.
    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoteEvent> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a NoteEvent;
    type IntoIter = std::slice::Iter<'a, NoteEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_log_is_empty() {
        let log = EventLog::new(Role::Reference);
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert_eq!(log.role(), Role::Reference);
    }

    #[test]
    fn append_keeps_arrival_order() {
        let mut log = EventLog::new(Role::Performance);
        log.append(300, 64);
        log.append(100, 60);
        log.append(200, 62);

        let times: Vec<i64> = log.iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(times, vec![300, 100, 200]);
    }

    #[test]
    fn equal_timestamps_stay_in_arrival_order() {
        let mut log = EventLog::new(Role::Reference);
        log.append(100, 60);
        log.append(100, 64);
        log.append(100, 67);

        let pitches: Vec<u8> = log.iter().map(|e| e.pitch).collect();
        assert_eq!(pitches, vec![60, 64, 67]);
    }

    #[test]
    fn clear_removes_everything() {
        let mut log = EventLog::new(Role::Reference);
        log.append(1, 60);
        log.push(NoteEvent::new(2, 61));
        assert_eq!(log.len(), 2);

        log.clear();
        assert!(log.is_empty());

        log.append(3, 62);
        assert_eq!(log.events(), &[NoteEvent::new(3, 62)]);
    }

    #[test]
    fn from_events_preserves_order() {
        let log = EventLog::from_events(
            Role::Performance,
            vec![NoteEvent::new(20, 1), NoteEvent::new(10, 2)],
        );
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].timestamp_ms, 20);
        assert_eq!(log.role(), Role::Performance);
    }

    #[test]
    fn borrowed_into_iter() {
        let mut log = EventLog::with_capacity(Role::Reference, 4);
        log.append(5, 60);
        log.append(6, 61);
        let mut count = 0;
        for event in &log {
            assert!(event.pitch >= 60);
            count += 1;
        }
        assert_eq!(count, 2);
    }
}
