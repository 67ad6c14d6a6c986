//! MutatingStream behavior through the public API.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use std::sync::Arc;

use fuzz_stream::telemetry::{CollectingObserver, ViolationKind};
use fuzz_stream::{
    assert_no_violations, assert_violation, ByteMutator, MutatingStream, MutationEngine,
    StreamConfig, StreamError, Whence,
};

use crate::common::{init_tracing, stream_over, CountingEngine, FailingEngine, FixedLengthEngine, ScriptedEngine};

// ==========================================
// Construction
// ==========================================

#[test]
fn construction_fuzzes_source_once_with_budget() {
    let engine = ScriptedEngine::new(&[b"first"]);
    let stream =
        MutatingStream::with_engine(b"hello".to_vec(), engine, StreamConfig::builder().offset(2).build())
            .unwrap();
    assert_eq!(stream.mutation_budget(), 7);
    assert_eq!(stream.engine().calls, vec![(b"hello".to_vec(), 7)]);
    assert_eq!(stream.getvalue().unwrap(), b"first");
    assert_eq!(stream.tell().unwrap(), 0);
}

#[test]
fn explicit_mutations_override_default_budget() {
    let stream = MutatingStream::with_engine(
        b"hello".to_vec(),
        ScriptedEngine::new(&[b"x"]),
        StreamConfig::builder().mutations(3).offset(100).build(),
    )
    .unwrap();
    assert_eq!(stream.mutation_budget(), 3);
}

#[test]
fn construction_propagates_engine_error() {
    let err = MutatingStream::with_engine(b"hello".to_vec(), FailingEngine, StreamConfig::new())
        .unwrap_err();
    match err {
        StreamError::Engine(inner) => assert_eq!(inner.context, "engine refused"),
        other => panic!("expected engine error, got {other:?}"),
    }
}

#[test]
fn seeded_hello_scenario() {
    init_tracing();
    let mut stream = MutatingStream::new(b"hello".to_vec(), StreamConfig::seeded(42)).unwrap();
    assert_eq!(stream.mutation_budget(), 5);

    // The stream's first buffer is what a fresh engine with the same seed produces
    let expected = ByteMutator::new(Some(42), 0).fuzz(b"hello", 5).unwrap();
    assert_eq!(stream.getvalue().unwrap(), expected);

    let first = stream.read(Some(3)).unwrap();
    if expected.len() >= 3 {
        assert_eq!(first, &expected[..3]);
        assert_eq!(stream.tell().unwrap(), 3);
    } else {
        // Too short: the read regenerated and returned everything it handed out
        assert!(first.starts_with(&expected));
        assert_eq!(stream.tell().unwrap(), first.len() as u64);
    }
}

// ==========================================
// Reading
// ==========================================

#[test]
fn read_all_after_construction_returns_whole_buffer() {
    let mut stream = stream_over(FixedLengthEngine::new(6));
    let all = stream.read(None).unwrap();
    assert_eq!(all.len(), 6);
    assert_eq!(stream.tell().unwrap(), 6);
}

#[test]
fn read_all_resolves_to_full_buffer_length_not_remainder() {
    // "all" means len(buffer); from position 2 that overruns and regenerates
    let mut stream = stream_over(ScriptedEngine::new(&[b"abcdef", b"XY"]));
    stream.seek(2, Whence::Start).unwrap();
    assert_eq!(stream.read(None).unwrap(), b"cdefXY");
    assert_eq!(stream.tell().unwrap(), 2 + 6);
}

#[test]
fn in_bounds_reads_slice_and_advance() {
    let mut stream = stream_over(ScriptedEngine::new(&[b"0123456789"]));
    assert_eq!(stream.read(Some(0)).unwrap(), b"");
    assert_eq!(stream.read(Some(4)).unwrap(), b"0123");
    assert_eq!(stream.read(Some(6)).unwrap(), b"456789");
    assert_eq!(stream.tell().unwrap(), 10);
    assert_eq!(stream.regenerations(), 0);
}

#[test]
fn regeneration_with_length_four_buffer() {
    let mut stream = stream_over(ScriptedEngine::new(&[b"abcd", b"new bytes"]));
    let out = stream.read(Some(10)).unwrap();
    assert_eq!(out.len(), 4 + 9);
    assert_eq!(out, b"abcdnew bytes");
    assert_eq!(stream.tell().unwrap(), 13);
    assert_eq!(stream.getvalue().unwrap(), b"new bytes");
}

#[test]
fn regeneration_uses_source_and_budget() {
    let mut stream = MutatingStream::with_engine(
        b"seed".to_vec(),
        ScriptedEngine::new(&[b"ab", b"cd"]),
        StreamConfig::builder().mutations(9).build(),
    )
    .unwrap();
    stream.read(Some(3)).unwrap();
    assert_eq!(
        stream.engine().calls,
        vec![(b"seed".to_vec(), 9), (b"seed".to_vec(), 9)]
    );
}

#[test]
fn exact_end_read_does_not_regenerate() {
    let engine = CountingEngine::default();
    let counter = engine.clone();
    let mut stream = stream_over(engine);
    assert_eq!(stream.read(Some(6)).unwrap(), b"source");
    assert_eq!(counter.count(), 1);

    // One more byte than remains
    assert_eq!(stream.read(Some(1)).unwrap(), b"source");
    assert_eq!(counter.count(), 2);
    assert_eq!(stream.tell().unwrap(), 12);
}

#[test]
fn position_past_end_yields_only_new_buffer() {
    let observer = Arc::new(CollectingObserver::new());
    let mut stream = stream_over(ScriptedEngine::new(&[b"abc", b"fresh"]));
    stream.set_violation_observer(observer.clone());

    stream.seek(50, Whence::Start).unwrap();
    assert_eq!(stream.read(Some(2)).unwrap(), b"fresh");
    assert_eq!(stream.tell().unwrap(), 55);
    assert_violation!(observer, ViolationKind::Position);
}

#[test]
fn failed_regeneration_keeps_stream_usable() {
    let mut stream = stream_over(ScriptedEngine::new(&[b"abc"]));
    assert_eq!(stream.read(Some(1)).unwrap(), b"a");
    assert!(matches!(stream.read(Some(5)), Err(StreamError::Engine(_))));
    assert_eq!(stream.tell().unwrap(), 1);
    assert_eq!(stream.getvalue().unwrap(), b"abc");
    assert_eq!(stream.read(Some(2)).unwrap(), b"bc");
}

#[test]
fn read1_matches_read() {
    let mut stream = stream_over(ScriptedEngine::new(&[b"abcdef"]));
    assert_eq!(stream.read1(Some(2)).unwrap(), b"ab");
    assert_eq!(stream.read(Some(2)).unwrap(), b"cd");
    assert_eq!(stream.tell().unwrap(), 4);
}

#[test]
fn fuzz_does_not_touch_stream_state() {
    let mut stream = stream_over(ScriptedEngine::new(&[b"abc", b"other"]));
    assert_eq!(stream.fuzz(b"anything", 1).unwrap(), b"other");
    assert_eq!(stream.getvalue().unwrap(), b"abc");
    assert_eq!(stream.tell().unwrap(), 0);
}

#[test]
fn normal_reads_report_nothing() {
    let observer = Arc::new(CollectingObserver::new());
    let mut stream = stream_over(FixedLengthEngine::new(8));
    stream.set_violation_observer(observer.clone());
    for _ in 0..10 {
        stream.read(Some(3)).unwrap();
    }
    assert_no_violations!(observer);
}

#[test]
fn seek_past_end_reports_once() {
    let observer = Arc::new(CollectingObserver::new());
    let mut stream = stream_over(FixedLengthEngine::new(8));
    stream.set_violation_observer(observer.clone());
    stream.seek(20, Whence::Start).unwrap();
    for _ in 0..10 {
        stream.read(Some(3)).unwrap();
    }
    assert_eq!(observer.violations_of_kind(ViolationKind::Position).len(), 1);
    assert_eq!(observer.len(), 1);
}

#[test]
fn explicit_zero_budget_serves_source_verbatim() {
    let config = StreamConfig::builder().seed(11).mutations(0).build();
    let mut stream = MutatingStream::new(b"hello".to_vec(), config).unwrap();
    assert_eq!(stream.mutation_budget(), 0);
    for _ in 0..4 {
        assert_eq!(stream.read(Some(5)).unwrap(), b"hello");
    }
    stream.seek(2, Whence::Start).unwrap();
    assert_eq!(stream.read(Some(7)).unwrap(), b"llohello");
}

// ==========================================
// Seeking
// ==========================================

#[test]
fn seek_start_current_end() {
    let mut stream = stream_over(FixedLengthEngine::new(20));
    assert_eq!(stream.seek(0, Whence::Start).unwrap(), 0);
    assert_eq!(stream.tell().unwrap(), 0);
    assert_eq!(stream.seek(5, Whence::Current).unwrap(), 5);
    assert_eq!(stream.seek(5, Whence::Current).unwrap(), 10);
    assert_eq!(stream.seek(-1, Whence::End).unwrap(), 19);
    assert_eq!(stream.seek(-100, Whence::Current).unwrap(), 0);
}

#[test]
fn seek_end_on_empty_buffer_clamps_to_zero() {
    let mut stream = stream_over(FixedLengthEngine::new(0));
    assert_eq!(stream.seek(-1, Whence::End).unwrap(), 0);
}

#[test]
fn negative_absolute_seek_is_rejected_without_moving() {
    let mut stream = stream_over(FixedLengthEngine::new(4));
    stream.seek(2, Whence::Start).unwrap();
    assert!(matches!(
        stream.seek(-1, Whence::Start),
        Err(StreamError::InvalidArgument { .. })
    ));
    assert_eq!(stream.tell().unwrap(), 2);
}

// ==========================================
// Closing
// ==========================================

#[test]
fn every_operation_fails_after_close() {
    use fuzz_stream::FuzzStream;

    let mut stream = stream_over(FixedLengthEngine::new(4));
    stream.close();
    assert!(stream.is_closed());

    assert!(stream.read(Some(1)).unwrap_err().is_closed());
    assert!(stream.read1(None).unwrap_err().is_closed());
    assert!(stream.seek(0, Whence::Start).unwrap_err().is_closed());
    assert!(stream.tell().unwrap_err().is_closed());
    assert!(stream.getvalue().unwrap_err().is_closed());
    assert!(stream.snapshot().unwrap_err().is_closed());
    assert!(FuzzStream::readable(&stream).unwrap_err().is_closed());
    assert!(FuzzStream::writable(&stream).unwrap_err().is_closed());
    assert!(FuzzStream::seekable(&stream).unwrap_err().is_closed());
    assert!(FuzzStream::write(&mut stream, b"x").unwrap_err().is_closed());
    assert!(FuzzStream::truncate(&mut stream, None).unwrap_err().is_closed());
}

#[test]
fn close_twice_is_fine() {
    let mut stream = stream_over(FixedLengthEngine::new(4));
    stream.close();
    stream.close();
    assert!(stream.is_closed());
}

#[test]
fn closed_error_names_operation() {
    let mut stream = stream_over(FixedLengthEngine::new(4));
    stream.close();
    let err = stream.tell().unwrap_err();
    assert_eq!(err, StreamError::Closed { operation: "tell" });
}
