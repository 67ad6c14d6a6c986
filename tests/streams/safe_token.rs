//! SafeTokenStream behavior through the public API.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use fuzz_stream::rng::{Pcg32, SeedableRng};
use fuzz_stream::stream::{is_safe_byte, sanitize};
use fuzz_stream::{
    MutatingStream, SafeTokenStream, StreamConfig, StreamError, Whence, SAFE_ALPHABET,
};

use crate::common::{stream_over, FixedLengthEngine, ScriptedEngine};

fn token_stream(buffers: &[&[u8]]) -> SafeTokenStream<ScriptedEngine, Pcg32> {
    SafeTokenStream::with_parts(stream_over(ScriptedEngine::new(buffers)), Pcg32::seed_from_u64(7))
}

#[test]
fn alphabet_has_66_unique_safe_bytes() {
    let mut sorted = SAFE_ALPHABET.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 66);
    assert!(SAFE_ALPHABET.iter().all(|&b| is_safe_byte(b)));
    for b in [b'/', b'%', b'?', b'#', b' ', 0x00, 0x7f, 0x80, 0xff] {
        assert!(!is_safe_byte(b), "{b:#04x} must be unsafe");
    }
}

#[test]
fn sanitize_keeps_safe_bytes_in_place() {
    let out = sanitize(b"path/to file.txt");
    assert_eq!(out.len(), 16);
    assert_eq!(&out[..4], b"path");
    assert_eq!(&out[5..7], b"to");
    assert_eq!(&out[8..], b"file.txt");
    assert!(out.iter().all(|&b| is_safe_byte(b)));
}

#[test]
fn sanitize_empty() {
    assert!(sanitize(b"").is_empty());
}

#[test]
fn read_output_matches_base_length() {
    let mut stream = token_stream(&[b"\x00\x01/\xff~ok"]);
    let out = stream.read(Some(4)).unwrap();
    assert_eq!(out.len(), 4);
    assert!(out.iter().all(|&b| is_safe_byte(b)));
    assert_eq!(stream.tell().unwrap(), 4);
}

#[test]
fn sanitizing_does_not_affect_regeneration_accounting() {
    let mut stream = token_stream(&[b"a b", b"c/d/e"]);
    let out = stream.read(Some(10)).unwrap();
    assert_eq!(out.len(), 3 + 5);
    assert_eq!(out[0], b'a');
    assert_eq!(out[2], b'b');
    assert_eq!(out[3], b'c');
    assert!(out.iter().all(|&b| is_safe_byte(b)));
    assert_eq!(stream.tell().unwrap(), 8);
    assert_eq!(stream.getvalue().unwrap(), b"c/d/e");
}

#[test]
fn seek_and_tell_delegate() {
    let mut stream =
        SafeTokenStream::with_parts(stream_over(FixedLengthEngine::new(10)), Pcg32::seed_from_u64(1));
    assert_eq!(stream.seek(-3, Whence::End).unwrap(), 7);
    assert_eq!(stream.tell().unwrap(), 7);
    assert_eq!(stream.inner().tell().unwrap(), 7);
}

#[test]
fn default_engine_token_stream_stays_safe() {
    let mut stream =
        SafeTokenStream::new(b"/search?q=%00<script>".to_vec(), StreamConfig::seeded(1234)).unwrap();
    for _ in 0..100 {
        let token = stream.read(Some(5)).unwrap();
        assert!(token.iter().all(|&b| is_safe_byte(b)), "{token:?}");
    }
}

#[test]
fn unseeded_token_stream_stays_safe() {
    let mut stream = SafeTokenStream::new(b"a/b".to_vec(), StreamConfig::new()).unwrap();
    for _ in 0..20 {
        assert!(stream.read(Some(2)).unwrap().iter().all(|&b| is_safe_byte(b)));
    }
}

#[test]
fn operations_after_close_fail() {
    let mut stream = token_stream(&[b"abc"]);
    stream.close();
    assert!(matches!(stream.read(Some(1)), Err(StreamError::Closed { .. })));
    assert!(stream.read1(Some(1)).unwrap_err().is_closed());
    assert!(stream.getvalue().unwrap_err().is_closed());
    assert!(stream.tell().unwrap_err().is_closed());
    assert!(stream.snapshot().unwrap_err().is_closed());
}

#[test]
fn raw_reads_through_inner_are_unsanitized() {
    let mut stream = token_stream(&[b"a/b"]);
    let inner: &mut MutatingStream<ScriptedEngine> = stream.inner_mut();
    assert_eq!(inner.read(Some(3)).unwrap(), b"a/b");
}

#[test]
fn helper_sanitize_uses_stream_rng() {
    let mut a = token_stream(&[b"x"]);
    let mut b = token_stream(&[b"x"]);
    assert_eq!(a.sanitize(b"%%%%%%"), b.sanitize(b"%%%%%%"));
}
