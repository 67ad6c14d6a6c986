//! # fuzz-stream
//!
//! Self-refilling, read-only byte streams that hand out mutated ("fuzzed")
//! variants of a fixed source buffer, written in 100% safe Rust.
//!
//! A [`MutatingStream`] never runs dry: when a read asks for more bytes than
//! its current mutated buffer holds, it asks its [`MutationEngine`] for a fresh
//! variant and keeps going. A [`SafeTokenStream`] does the same but rewrites
//! every byte outside the URL-path-safe alphabet, so its output can be pasted
//! into a path segment without encoding.
//!
//! ```
//! use fuzz_stream::prelude::*;
//!
//! let mut stream = MutatingStream::new(b"GET /index.html HTTP/1.1".to_vec(), StreamConfig::seeded(42))?;
//! let first = stream.read(Some(3))?;
//! assert_eq!(stream.tell()?, first.len() as u64);
//!
//! let mut tokens = SafeTokenStream::new(b"/users/42?sort=asc".to_vec(), StreamConfig::seeded(42))?;
//! let token = tokens.read(Some(8))?;
//! assert!(token.iter().all(|&b| is_safe_byte(b)));
//! # Ok::<(), StreamError>(())
//! ```
//!
//! # Crate layout
//!
//! - [`stream`]: the stream types, the [`FuzzStream`] trait and snapshots
//! - [`engine`]: the [`MutationEngine`] seam and the default [`ByteMutator`]
//! - [`telemetry`]: structured reporting of suspicious-but-legal situations
//! - [`rng`] and [`hash`]: the PCG32 generator and FNV-1a hashing both build on
//!
//! # Feature flags
//!
//! - `json`: `Violation::to_json` via `serde_json`
//! - `paranoid`: runtime invariant checks in release builds

#![forbid(unsafe_code)] // let us try
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use engine::{ByteMutator, MutationEngine, MutatorConfig, MutatorConfigBuilder, MutatorStats};
pub use error::{EngineError, StreamError, StreamResult};
pub use stream::{
    FuzzStream, MutatingStream, SafeTokenStream, StreamConfig, StreamConfigBuilder,
    StreamSnapshot, Whence, SAFE_ALPHABET,
};

pub mod engine;
/// Error types returned by streams and engines.
pub mod error;
pub mod hash;
pub mod prelude;
/// Internal random number generator module based on PCG32.
///
/// Provides a minimal, seedable PRNG without pulling in the `rand` crate.
/// See the module documentation for usage details.
pub mod rng;
pub mod stream;
pub mod telemetry;

// ###################
// # UNIT TESTS      #
// ###################
