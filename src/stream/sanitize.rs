//! URL-path-safe byte rewriting.
//!
//! A byte is safe if it is an ASCII letter, an ASCII digit, or one of
//! `_ . - ~`: the RFC 3986 unreserved set, which never needs percent-encoding.
//! Every other byte is replaced by a byte drawn uniformly from
//! [`SAFE_ALPHABET`].

use crate::rng::{thread_rng, Rng};

/// The 66 bytes that pass through sanitization unchanged.
pub const SAFE_ALPHABET: [u8; 66] =
    *b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_.-~";

/// Returns true if `byte` is in [`SAFE_ALPHABET`].
#[inline]
#[must_use]
pub const fn is_safe_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'.' | b'-' | b'~')
}

/// Sanitizes `value` using the thread-local generator.
///
/// ```
/// use fuzz_stream::stream::{is_safe_byte, sanitize};
///
/// let out = sanitize(b"a/b c");
/// assert_eq!(out.len(), 5);
/// assert_eq!(out[0], b'a');
/// assert!(out.iter().all(|&b| is_safe_byte(b)));
/// ```
#[must_use]
pub fn sanitize(value: &[u8]) -> Vec<u8> {
    sanitize_with(value, &mut thread_rng())
}

/// Sanitizes `value`, drawing replacement bytes from `rng`.
///
/// Safe bytes are kept in place; the output always has the same length as
/// the input.
pub fn sanitize_with<R: Rng + ?Sized>(value: &[u8], rng: &mut R) -> Vec<u8> {
    let mut out = value.to_vec();
    sanitize_in_place(&mut out, rng);
    out
}

/// In-place form of [`sanitize_with`].
pub fn sanitize_in_place<R: Rng + ?Sized>(value: &mut [u8], rng: &mut R) {
    for byte in value.iter_mut().filter(|b| !is_safe_byte(**b)) {
        *byte = rng.pick_uniform(&SAFE_ALPHABET).copied().unwrap_or(b'-');
    }
}
