//! Common test infrastructure shared across integration tests.
//!
//! This module provides:
//! - `stubs`: Mutation engine stubs with scripted, failing and fixed-length output
//!
//! # Usage
//!
//! From any integration test file:
//! ```ignore
//! #[path = "common/mod.rs"]
//! mod common;
//! use common::stubs::{ScriptedEngine, FailingEngine};
//! ```

pub mod stubs;

// These are public utilities for integration tests - allow unused until tests adopt them.
#[allow(unused_imports)]
pub use stubs::{stream_over, CountingEngine, FailingEngine, FixedLengthEngine, ScriptedEngine};

/// Installs a `tracing` subscriber that writes to the test harness output.
///
/// Safe to call from every test; only the first call installs.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
