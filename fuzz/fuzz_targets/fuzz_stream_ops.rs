//! Fuzz target for stream operation sequences.
//!
//! Drives both stream types with arbitrary sources, configurations and
//! operation sequences. It verifies:
//!
//! 1. **No panics**: on any source, seed, offset, budget or operation order
//! 2. **In-bounds reads**: return exactly `size` bytes and advance by `size`
//! 3. **Regenerating reads**: advance the position by the returned length
//! 4. **Token reads**: only ever contain safe-alphabet bytes
//! 5. **Closed streams**: reject everything with `Closed`

#![no_main]

use arbitrary::Arbitrary;
use fuzz_stream::stream::is_safe_byte;
use fuzz_stream::{FuzzStream, MutatingStream, SafeTokenStream, StreamConfig};
use libfuzzer_sys::fuzz_target;

/// Keeps individual reads small so runs stay fast.
const MAX_READ: usize = 512;

#[derive(Debug, Arbitrary)]
struct StreamInput {
    source: Vec<u8>,
    seed: Option<u64>,
    offset: u8,
    mutations: Option<u8>,
    safe: bool,
    ops: Vec<StreamOp>,
}

#[derive(Debug, Arbitrary)]
enum StreamOp {
    Read(Option<u16>),
    Read1(Option<u16>),
    Seek(i64, u8),
    Tell,
    GetValue,
    Write(Vec<u8>),
    Close,
}

fn run(stream: &mut dyn FuzzStream, ops: &[StreamOp], safe: bool) {
    for op in ops {
        if stream.is_closed() {
            assert!(stream.tell().is_err_and(|e| e.is_closed()));
            assert!(stream.read(Some(1)).is_err_and(|e| e.is_closed()));
            return;
        }
        match op {
            StreamOp::Read(size) | StreamOp::Read1(size) => {
                let size = size.map(|s| usize::from(s) % MAX_READ);
                let before = stream.tell().unwrap_or_default();
                let len = stream.getvalue().map(|b| b.len()).unwrap_or_default();
                let result = if matches!(op, StreamOp::Read(_)) {
                    stream.read(size)
                } else {
                    stream.read1(size)
                };
                let Ok(out) = result else { continue };
                let after = stream.tell().unwrap_or_default();
                let want = size.unwrap_or(len);
                let in_bounds = usize::try_from(before)
                    .ok()
                    .and_then(|p| p.checked_add(want))
                    .is_some_and(|end| end <= len);
                if in_bounds {
                    assert_eq!(out.len(), want);
                    assert_eq!(after, before + want as u64);
                } else {
                    assert_eq!(after, before.saturating_add(out.len() as u64));
                }
                if safe {
                    assert!(out.iter().all(|&b| is_safe_byte(b)));
                }
            }
            StreamOp::Seek(pos, whence) => {
                let result = stream.seek_raw(*pos, i32::from(*whence % 4));
                if let Ok(position) = result {
                    assert_eq!(stream.tell().ok(), Some(position));
                }
            }
            StreamOp::Tell => {
                let _ = stream.tell();
            }
            StreamOp::GetValue => {
                let _ = stream.getvalue();
            }
            StreamOp::Write(data) => {
                assert!(stream.write(data).is_err());
                assert!(stream.truncate(None).is_err());
            }
            StreamOp::Close => stream.close(),
        }
    }
}

fuzz_target!(|input: StreamInput| {
    if input.source.len() > 4096 {
        return;
    }
    let config = StreamConfig {
        seed: input.seed,
        offset: usize::from(input.offset),
        mutations: input.mutations.map(usize::from),
    };
    if input.safe {
        if let Ok(mut stream) = SafeTokenStream::new(input.source, config) {
            run(&mut stream, &input.ops, true);
        }
    } else if let Ok(mut stream) = MutatingStream::new(input.source, config) {
        run(&mut stream, &input.ops, false);
    }
});
