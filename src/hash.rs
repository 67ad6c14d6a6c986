//! Deterministic FNV-1a hashing.
//!
//! Used for two things: checksumming the mutated buffer stored in a
//! [`StreamSnapshot`](crate::StreamSnapshot), and mixing timing entropy when a
//! generator is created without a seed. `DefaultHasher` is randomly keyed per
//! process, which would make snapshot checksums useless across runs.
//!
//! ```
//! use fuzz_stream::hash::{checksum, DeterministicHasher};
//! use std::hash::Hasher;
//!
//! let mut hasher = DeterministicHasher::new();
//! hasher.write(b"hello");
//! assert_eq!(hasher.finish(), checksum(b"hello"));
//! ```
//!
//! FNV-1a is NOT cryptographically secure. It detects accidental corruption only.

use std::hash::{Hash, Hasher};

/// FNV-1a 64-bit offset basis constant.
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime constant.
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// A deterministic hasher using the FNV-1a algorithm.
#[derive(Debug, Clone)]
pub struct DeterministicHasher {
    state: u64,
}

impl DeterministicHasher {
    /// Creates a new `DeterministicHasher` with the standard FNV-1a offset basis.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }
}

impl Default for DeterministicHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for DeterministicHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }
}

/// Computes the FNV-1a hash of a raw byte slice.
///
/// Unlike [`fnv1a_hash`], no length prefix is mixed in, so the result matches
/// published FNV-1a test vectors.
#[inline]
#[must_use]
pub fn checksum(bytes: &[u8]) -> u64 {
    let mut hasher = DeterministicHasher::new();
    hasher.write(bytes);
    hasher.finish()
}

/// Computes a deterministic FNV-1a hash of any [`Hash`] value.
#[inline]
pub fn fnv1a_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DeterministicHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
