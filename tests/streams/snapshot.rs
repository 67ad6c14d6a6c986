//! Snapshot capture, encoding and restoring.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use fuzz_stream::hash::checksum;
use fuzz_stream::{MutatingStream, StreamConfig, StreamError, StreamSnapshot, Whence};

use crate::common::{stream_over, FixedLengthEngine, ScriptedEngine};

#[test]
fn snapshot_captures_buffer_and_position() {
    let mut stream = stream_over(ScriptedEngine::new(&[b"abcdef"]));
    stream.read(Some(2)).unwrap();
    let snapshot = stream.snapshot().unwrap();
    assert_eq!(snapshot.source, b"source");
    assert_eq!(snapshot.buffer, b"abcdef");
    assert_eq!(snapshot.position, 2);
    assert_eq!(snapshot.mutation_budget, 6);
    assert_eq!(snapshot.checksum, checksum(b"abcdef"));
}

#[test]
fn restore_continues_where_snapshot_left_off() {
    let mut stream = stream_over(ScriptedEngine::new(&[b"abcdef"]));
    stream.read(Some(2)).unwrap();
    let bytes = stream.snapshot().unwrap().encode().unwrap();

    let snapshot = StreamSnapshot::decode(&bytes).unwrap();
    let mut restored =
        MutatingStream::restore(snapshot, ScriptedEngine::new(&[b"next"])).unwrap();
    assert_eq!(restored.tell().unwrap(), 2);
    assert_eq!(restored.read(Some(3)).unwrap(), b"cde");
    // Restoring does not call the engine
    assert!(restored.engine().calls.is_empty());
    assert_eq!(restored.read(Some(5)).unwrap(), b"fnext");
}

#[test]
fn restore_rejects_tampered_buffer() {
    let stream = stream_over(FixedLengthEngine::new(8));
    let mut snapshot = stream.snapshot().unwrap();
    snapshot.buffer[0] ^= 0xff;
    let err = MutatingStream::restore(snapshot, FixedLengthEngine::new(8)).unwrap_err();
    assert!(matches!(err, StreamError::Snapshot { .. }), "{err}");
}

#[test]
fn resume_with_default_engine_replays_seeded_stream() {
    let config = StreamConfig::seeded(99);
    let mut original = MutatingStream::new(b"resume me".to_vec(), config).unwrap();
    original.seek(1, Whence::Start).unwrap();
    let snapshot = original.snapshot().unwrap();

    let resumed = MutatingStream::resume(snapshot.clone()).unwrap();
    assert_eq!(resumed.getvalue().unwrap(), original.getvalue().unwrap());
    assert_eq!(resumed.tell().unwrap(), 1);
    assert_eq!(resumed.config().seed, Some(99));
    assert_eq!(resumed.mutation_budget(), snapshot.mutation_budget);
}

#[test]
fn load_snapshot_rewinds_in_place() {
    let mut stream = stream_over(ScriptedEngine::new(&[b"abc", b"defg"]));
    let checkpoint = stream.snapshot().unwrap();
    assert_eq!(stream.read(Some(5)).unwrap(), b"abcdefg");

    stream.load_snapshot(checkpoint).unwrap();
    assert_eq!(stream.tell().unwrap(), 0);
    assert_eq!(stream.read(Some(3)).unwrap(), b"abc");
}

#[test]
fn snapshot_config_round_trips_construction_parameters() {
    let config = StreamConfig::builder().seed(5).offset(3).build();
    let stream = MutatingStream::new(b"ab".to_vec(), config).unwrap();
    let restored = stream.snapshot().unwrap().config();
    assert_eq!(restored.seed, Some(5));
    assert_eq!(restored.offset, 3);
    assert_eq!(restored.mutation_budget(999), 5);
}

#[test]
fn decode_garbage_is_an_error() {
    for bytes in [&b""[..], b"\x01", b"not a snapshot at all"] {
        assert!(matches!(
            StreamSnapshot::decode(bytes),
            Err(StreamError::Snapshot { .. })
        ));
    }
}
