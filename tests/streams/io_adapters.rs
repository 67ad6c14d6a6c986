//! `std::io::Read` and `std::io::Seek` adapters.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

use fuzz_stream::rng::{Pcg32, SeedableRng};
use fuzz_stream::stream::is_safe_byte;
use fuzz_stream::{MutatingStream, SafeTokenStream, StreamConfig, Whence};

use crate::common::{stream_over, FailingEngine, FixedLengthEngine, ScriptedEngine};

#[test]
fn read_exact_spans_regenerations() {
    let mut stream = stream_over(FixedLengthEngine::new(3));
    let mut buf = [0u8; 3];
    stream.read_exact(&mut buf).unwrap();
    assert_eq!(buf, [0, 1, 2]);
    stream.read_exact(&mut buf).unwrap();
    assert_eq!(buf, [1, 2, 3]);
}

#[test]
fn take_reads_arbitrarily_far() {
    let stream = stream_over(FixedLengthEngine::new(7));
    let mut out = Vec::new();
    stream.take(1000).read_to_end(&mut out).unwrap();
    assert_eq!(out.len(), 1000);
}

#[test]
fn io_reads_see_the_same_bytes_as_stream_reads() {
    let config = StreamConfig::seeded(21);
    let mut direct = MutatingStream::new(b"GET /a/b?c=d HTTP/1.1".to_vec(), config).unwrap();
    let mut adapted = MutatingStream::new(b"GET /a/b?c=d HTTP/1.1".to_vec(), config).unwrap();

    let mut expected = Vec::new();
    while expected.len() < 500 {
        expected.extend(direct.read(Some(13)).unwrap());
    }

    let mut buf = [0u8; 13];
    let mut seen = Vec::new();
    while seen.len() < expected.len() {
        let n = Read::read(&mut adapted, &mut buf).unwrap();
        seen.extend_from_slice(&buf[..n]);
    }
    seen.truncate(expected.len());
    assert_eq!(seen, expected);
}

#[test]
fn seek_discards_unread_surplus() {
    let mut stream = stream_over(ScriptedEngine::new(&[b"ab", b"cdefgh"]));
    let mut buf = [0u8; 3];
    assert_eq!(Read::read(&mut stream, &mut buf).unwrap(), 3);
    assert_eq!(&buf, b"abc");
    stream.seek(0, Whence::Start).unwrap();
    assert_eq!(Read::read(&mut stream, &mut buf).unwrap(), 3);
    assert_eq!(&buf, b"cde");
}

#[test]
fn buf_reader_lines() {
    let stream = stream_over(ScriptedEngine::new(&[b"one\ntwo\n", b"three\n"]));
    let mut reader = BufReader::with_capacity(4, stream);
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    assert_eq!(line, "one\n");
}

#[test]
fn seek_from_variants() {
    let mut stream = stream_over(FixedLengthEngine::new(10));
    // Inherent `seek` shadows the trait method, so call through `Seek`
    assert_eq!(Seek::seek(&mut stream, SeekFrom::Start(4)).unwrap(), 4);
    assert_eq!(Seek::seek(&mut stream, SeekFrom::Current(2)).unwrap(), 6);
    assert_eq!(Seek::seek(&mut stream, SeekFrom::End(-4)).unwrap(), 6);
    assert_eq!(Seek::seek(&mut stream, SeekFrom::End(-40)).unwrap(), 0);
    assert_eq!(stream.stream_position().unwrap(), 0);
}

#[test]
fn engine_failure_is_io_other() {
    let mut stream = stream_over(ScriptedEngine::new(&[b"ab"]));
    let mut buf = [0u8; 8];
    let err = Read::read(&mut stream, &mut buf).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::Other);
    assert!(err.to_string().contains("exhausted"));
}

#[test]
fn closed_stream_is_broken_pipe() {
    let mut stream = stream_over(FixedLengthEngine::new(4));
    stream.close();
    assert_eq!(
        Seek::seek(&mut stream, SeekFrom::Start(0)).unwrap_err().kind(),
        io::ErrorKind::BrokenPipe
    );
}

#[test]
fn failing_engine_construction_error_converts() {
    let err = MutatingStream::with_engine(b"x".to_vec(), FailingEngine, StreamConfig::new())
        .unwrap_err();
    let io_err: io::Error = err.into();
    assert_eq!(io_err.kind(), io::ErrorKind::Other);
}

#[test]
fn safe_token_stream_reader_is_safe() {
    let inner = stream_over(ScriptedEngine::new(&[b"\x00 /\xff", b"%%%%"]));
    let mut stream = SafeTokenStream::with_parts(inner, Pcg32::seed_from_u64(2));
    let mut buf = [0u8; 6];
    let n = Read::read(&mut stream, &mut buf).unwrap();
    assert_eq!(n, 6);
    assert!(buf.iter().all(|&b| is_safe_byte(b)));
    assert_eq!(Seek::seek(&mut stream, SeekFrom::Start(1)).unwrap(), 1);
}
