//! Event model — note-on events and the per-role logs that hold them.
//!
//! Each session keeps two [`EventLog`]s, one per [`Role`]. Logs only grow by
//! appending and only shrink by a full clear.

pub mod log;
pub mod types;

pub use log::EventLog;
pub use types::{NoteEvent, Role, RoutedNote};
