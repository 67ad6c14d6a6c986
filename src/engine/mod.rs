//! The mutation engine seam.
//!
//! A [`MutatingStream`](crate::MutatingStream) never mutates bytes itself. It
//! hands its source buffer and mutation budget to a [`MutationEngine`] and
//! takes whatever comes back. Swap the engine to change what "fuzzed" means:
//!
//! - [`ByteMutator`] - the built-in seeded byte-level mutator
//! - [`FnEngine`] - any closure, handy for scripted tests and adapters to
//!   external fuzzers
//! - `Box<dyn MutationEngine>` - runtime-selected engines

pub mod byte_mutator;
pub mod config;

pub use byte_mutator::{ByteMutator, MutatorStats};
pub use config::{MutatorConfig, MutatorConfigBuilder};

use crate::error::EngineError;

/// Produces mutated copies of a byte buffer.
///
/// # Contract
///
/// - `fuzz` returns a mutated copy of `data`; the result may be longer or
///   shorter than `data`, and may be empty.
/// - `max_mutations` caps how many edit operations a single call may apply.
///   Zero means "no mutations".
/// - Output is non-deterministic across calls unless the engine was seeded.
/// - Errors are reported as [`EngineError`] and reach stream callers
///   unchanged. Engines must not panic on well-formed input.
///
/// # Example
///
/// ```
/// use fuzz_stream::{EngineError, MutationEngine};
///
/// /// Reverses the input; ignores the budget.
/// struct Reverser;
///
/// impl MutationEngine for Reverser {
///     fn fuzz(&mut self, data: &[u8], _max_mutations: usize) -> Result<Vec<u8>, EngineError> {
///         Ok(data.iter().rev().copied().collect())
///     }
/// }
///
/// assert_eq!(Reverser.fuzz(b"abc", 1).unwrap(), b"cba");
/// ```
pub trait MutationEngine {
    /// Returns a mutated copy of `data` using at most `max_mutations` edits.
    fn fuzz(&mut self, data: &[u8], max_mutations: usize) -> Result<Vec<u8>, EngineError>;
}

impl<E: MutationEngine + ?Sized> MutationEngine for Box<E> {
    fn fuzz(&mut self, data: &[u8], max_mutations: usize) -> Result<Vec<u8>, EngineError> {
        (**self).fuzz(data, max_mutations)
    }
}

/// A [`MutationEngine`] backed by a closure.
///
/// ```
/// use fuzz_stream::engine::FnEngine;
/// use fuzz_stream::MutationEngine;
///
/// let mut doubling = FnEngine::new(|data: &[u8], _max| Ok([data, data].concat()));
/// assert_eq!(doubling.fuzz(b"ab", 3).unwrap(), b"abab");
/// ```
pub struct FnEngine<F> {
    f: F,
}

impl<F> FnEngine<F>
where
    F: FnMut(&[u8], usize) -> Result<Vec<u8>, EngineError>,
{
    /// Wraps the closure.
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> MutationEngine for FnEngine<F>
where
    F: FnMut(&[u8], usize) -> Result<Vec<u8>, EngineError>,
{
    fn fuzz(&mut self, data: &[u8], max_mutations: usize) -> Result<Vec<u8>, EngineError> {
        (self.f)(data, max_mutations)
    }
}

impl<F> std::fmt::Debug for FnEngine<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnEngine").finish_non_exhaustive()
    }
}
