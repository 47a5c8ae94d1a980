//! Session pipeline integration tests — raw MIDI bytes on a producer thread,
//! ring buffer, event logs and scoring on the polling side.

use std::thread;

use mididiff::event::Role;
use mididiff::midi::BlockClock;
use mididiff::score::ScoreResult;
use mididiff::session::{session, LogSizes, SessionConfig};

const NOTE_ON_CH1: u8 = 0x90;
const NOTE_ON_CH10: u8 = 0x99;

fn default_session() -> (mididiff::session::Ingestor, mididiff::session::Session) {
    session(&SessionConfig::default()).expect("default session config is valid")
}

#[test]
fn raw_midi_worked_example() {
    let (mut ingestor, mut session) = default_session();

    ingestor.handle_message(&[NOTE_ON_CH1, 60, 100], 1000);
    ingestor.handle_message(&[NOTE_ON_CH10, 60, 100], 1050);
    ingestor.handle_message(&[NOTE_ON_CH1, 64, 100], 2000);
    ingestor.handle_message(&[NOTE_ON_CH10, 64, 100], 2300);

    let result = session.compute();
    assert_eq!(result.percentage, 38);
    assert_eq!(result.in_threshold_percentage, 50);
    assert_eq!(result.last_used_channel, Some(10));
    assert_eq!(session.notes_seen(), 4);
}

#[test]
fn producer_thread_feeds_polling_side() {
    let (mut ingestor, mut session) = default_session();

    let producer = thread::spawn(move || {
        for i in 0..500i64 {
            let pitch = 48 + (i % 24) as u8;
            ingestor.record(Role::Reference, i * 100, pitch);
            ingestor.record(Role::Performance, i * 100 + 10, pitch);
        }
        ingestor
    });

    // poll while the producer runs; every snapshot must be in range
    for _ in 0..20 {
        let result = session.compute();
        assert!((0..=100).contains(&result.percentage));
        thread::yield_now();
    }

    let _ingestor = producer.join().unwrap();
    let result = session.compute();
    assert_eq!(
        session.log_sizes(),
        LogSizes {
            reference: 500,
            performance: 500
        }
    );
    // every note 10 ms late against a 200 ms threshold
    assert_eq!(result.percentage, 95);
    assert_eq!(result.in_threshold_percentage, 100);
    assert_eq!(session.dropped(), 0);
}

#[test]
fn reset_returns_empty_result() {
    let (mut ingestor, mut session) = default_session();
    ingestor.handle_message(&[NOTE_ON_CH1, 60, 100], 1000);
    ingestor.handle_message(&[NOTE_ON_CH10, 60, 100], 1000);
    assert_eq!(session.compute().percentage, 100);

    session.reset();
    let result = session.compute();
    assert_eq!(result.percentage, 0);
    assert_eq!(result.in_threshold_percentage, 0);
    assert_eq!(result.reference_count, 0);

    // logging continues after a reset
    ingestor.handle_message(&[NOTE_ON_CH1, 62, 100], 5000);
    assert_eq!(session.compute().reference_count, 1);
}

#[test]
fn reset_discards_notes_not_yet_synced() {
    let (mut ingestor, mut session) = default_session();
    ingestor.record(Role::Reference, 10, 60);
    ingestor.record(Role::Performance, 10, 60);
    session.reset();
    assert_eq!(session.compute(), ScoreResult::empty());
}

#[test]
fn host_block_timestamps_flow_into_score() {
    let (mut ingestor, mut session) = default_session();
    let mut clock = BlockClock::new(48_000.0);

    clock.begin_block(1_000_000);
    let block: Vec<(u32, &[u8])> = vec![
        (0, &[NOTE_ON_CH1, 60, 100][..]),
        (2_400, &[NOTE_ON_CH10, 60, 100][..]), // +50 ms
    ];
    assert_eq!(ingestor.process_block(&clock, block), 2);

    clock.begin_block(1_001_000);
    let block: Vec<(u32, &[u8])> = vec![(0, &[NOTE_ON_CH1, 64, 100][..])];
    assert_eq!(ingestor.process_block(&clock, block), 1);

    let result = session.compute();
    // distances 50 and 200 (unmatched)
    assert_eq!(result.percentage, 38);
    assert_eq!(session.reference_log().events()[1].timestamp_ms, 1_001_000);
}

#[test]
fn changing_threshold_rescores_same_logs() {
    let (mut ingestor, mut session) = default_session();
    ingestor.record(Role::Reference, 2000, 64);
    ingestor.record(Role::Performance, 2300, 64);

    assert_eq!(session.compute().percentage, 0);
    session.set_threshold(1000).unwrap();
    assert_eq!(session.compute().percentage, 70);
    assert_eq!(session.compute().in_threshold_percentage, 100);
}

#[test]
fn overflow_drops_newest_notes_and_keeps_scoring() {
    let config = SessionConfig {
        ring_capacity: 4,
        ..SessionConfig::default()
    };
    let (mut ingestor, mut session) = session(&config).unwrap();
    for i in 0..6 {
        ingestor.record(Role::Reference, i * 1000, 60);
    }
    assert_eq!(session.dropped(), 2);
    assert_eq!(session.log_sizes().reference, 4);
    assert_eq!(session.compute().reference_count, 4);
}
