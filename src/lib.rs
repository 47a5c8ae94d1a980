//! mididiff — scores a MIDI performance against a reference stream.
//!
//! Note-ons from two channels are collected into per-role [`event::EventLog`]s.
//! For every reference note, the closest performance note of the same pitch is
//! found, and the distances are folded into a percentage score relative to a
//! matching threshold.

pub mod config;
pub mod control;
pub mod event;
pub mod midi;
pub mod score;
pub mod session;
pub mod take;
