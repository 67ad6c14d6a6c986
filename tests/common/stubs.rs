//! Mutation engine stubs.

// Allow test-specific patterns that are appropriate for test code
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    dead_code
)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fuzz_stream::{EngineError, MutatingStream, MutationEngine, StreamConfig};

/// Replays a fixed queue of buffers, one per call, then fails.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    queue: VecDeque<Vec<u8>>,
    /// `(data, max_mutations)` of every call, in order.
    pub calls: Vec<(Vec<u8>, usize)>,
}

impl ScriptedEngine {
    #[must_use]
    pub fn new(buffers: &[&[u8]]) -> Self {
        Self {
            queue: buffers.iter().map(|b| b.to_vec()).collect(),
            calls: Vec::new(),
        }
    }
}

impl MutationEngine for ScriptedEngine {
    fn fuzz(&mut self, data: &[u8], max_mutations: usize) -> Result<Vec<u8>, EngineError> {
        self.calls.push((data.to_vec(), max_mutations));
        self.queue
            .pop_front()
            .ok_or_else(|| EngineError::new("scripted engine exhausted"))
    }
}

/// Always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEngine;

impl MutationEngine for FailingEngine {
    fn fuzz(&mut self, _data: &[u8], _max_mutations: usize) -> Result<Vec<u8>, EngineError> {
        Err(EngineError::new("engine refused"))
    }
}

/// Returns `len` bytes counting up from a per-call generation byte:
/// call 0 yields `[0, 1, 2, ..]`, call 1 yields `[1, 2, 3, ..]`.
#[derive(Debug, Clone, Default)]
pub struct FixedLengthEngine {
    pub len: usize,
    generation: u8,
}

impl FixedLengthEngine {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { len, generation: 0 }
    }
}

impl MutationEngine for FixedLengthEngine {
    fn fuzz(&mut self, _data: &[u8], _max_mutations: usize) -> Result<Vec<u8>, EngineError> {
        let start = self.generation;
        self.generation = self.generation.wrapping_add(1);
        Ok((0..self.len).map(|i| start.wrapping_add(i as u8)).collect())
    }
}

/// Echoes the input and counts calls through a shared counter.
#[derive(Debug, Clone, Default)]
pub struct CountingEngine {
    pub calls: Arc<AtomicUsize>,
}

impl CountingEngine {
    #[must_use]
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MutationEngine for CountingEngine {
    fn fuzz(&mut self, data: &[u8], _max_mutations: usize) -> Result<Vec<u8>, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(data.to_vec())
    }
}

/// Builds a stream over `b"source"` with the given engine and default config.
pub fn stream_over<E: MutationEngine>(engine: E) -> MutatingStream<E> {
    MutatingStream::with_engine(b"source".to_vec(), engine, StreamConfig::new())
        .expect("stub engines succeed on construction")
}
