//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust
//! use fuzz_stream::prelude::*;
//! ```
//!
//! # What's Included
//!
//! - **Stream types**: [`MutatingStream`], [`SafeTokenStream`]
//! - **Core traits**: [`FuzzStream`], [`MutationEngine`]
//! - **Default engine**: [`ByteMutator`], [`MutatorConfig`]
//! - **Configuration**: [`StreamConfig`], [`Whence`]
//! - **Snapshots**: [`StreamSnapshot`]
//! - **Sanitizing**: [`SAFE_ALPHABET`], [`is_safe_byte`]
//! - **Error handling**: [`StreamError`], [`StreamResult`], [`EngineError`]

// Stream types
pub use crate::stream::{MutatingStream, SafeTokenStream};

// Core traits
pub use crate::engine::MutationEngine;
pub use crate::stream::FuzzStream;

// Default engine
pub use crate::engine::{ByteMutator, MutatorConfig};

// Configuration
pub use crate::stream::{StreamConfig, Whence};

// Snapshots
pub use crate::stream::StreamSnapshot;

// Sanitizing
pub use crate::stream::{is_safe_byte, SAFE_ALPHABET};

// Error handling
pub use crate::error::{EngineError, StreamError, StreamResult};
