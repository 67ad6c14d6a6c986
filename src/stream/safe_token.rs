//! A mutating stream whose reads are URL-path safe.

use std::io;
use std::sync::Arc;

use super::config::StreamConfig;
use super::mutating::MutatingStream;
use super::sanitize::{sanitize_in_place, sanitize_with};
use super::snapshot::StreamSnapshot;
use super::{FuzzStream, Whence};
use crate::engine::{ByteMutator, MutationEngine};
use crate::error::StreamResult;
use crate::rng::{Pcg32, Rng, SeedableRng};
use crate::telemetry::ViolationObserver;

/// PCG stream used for replacement bytes, kept apart from the engine's
/// streams so a seeded token stream does not correlate the two.
const SANITIZER_STREAM: u64 = 0x5afe_70ce;

/// A [`MutatingStream`] whose reads only contain bytes from
/// [`SAFE_ALPHABET`](super::SAFE_ALPHABET).
///
/// Every [`read`](Self::read) sanitizes its result: safe bytes pass through,
/// every other byte is replaced by one drawn uniformly from the alphabet.
/// Everything else (positions, regeneration, [`getvalue`](Self::getvalue))
/// behaves exactly like the wrapped stream. In particular `getvalue` returns
/// the raw, unsanitized buffer.
///
/// # Example
///
/// ```
/// use fuzz_stream::stream::is_safe_byte;
/// use fuzz_stream::{SafeTokenStream, StreamConfig};
///
/// let mut stream = SafeTokenStream::new(b"../etc/passwd?x=1".to_vec(), StreamConfig::seeded(9))?;
/// for _ in 0..8 {
///     let token = stream.read(Some(6))?;
///     assert!(token.iter().all(|&b| is_safe_byte(b)));
/// }
/// # Ok::<(), fuzz_stream::StreamError>(())
/// ```
pub struct SafeTokenStream<E = ByteMutator, R = Pcg32> {
    inner: MutatingStream<E>,
    rng: R,
}

impl SafeTokenStream<ByteMutator, Pcg32> {
    /// Creates a token stream over the default engine.
    ///
    /// With a seed, replacement bytes are reproducible too; without one they
    /// come from timing entropy.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Engine`](crate::StreamError::Engine) if the
    /// initial mutation fails.
    pub fn new(source: impl Into<Vec<u8>>, config: StreamConfig) -> StreamResult<Self> {
        let rng = match config.seed {
            Some(seed) => Pcg32::new(seed, SANITIZER_STREAM),
            None => Pcg32::from_entropy(),
        };
        Ok(Self::with_parts(MutatingStream::new(source, config)?, rng))
    }
}

impl<E: MutationEngine, R: Rng> SafeTokenStream<E, R> {
    /// Wraps an existing stream and replacement source.
    pub fn with_parts(inner: MutatingStream<E>, rng: R) -> Self {
        Self { inner, rng }
    }

    /// Reads like [`MutatingStream::read`] and sanitizes the result.
    ///
    /// # Errors
    ///
    /// Same as [`MutatingStream::read`].
    pub fn read(&mut self, size: Option<usize>) -> StreamResult<Vec<u8>> {
        let mut out = self.inner.read(size)?;
        sanitize_in_place(&mut out, &mut self.rng);
        Ok(out)
    }

    /// Same as [`read`](Self::read).
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read).
    pub fn read1(&mut self, size: Option<usize>) -> StreamResult<Vec<u8>> {
        self.read(size)
    }

    /// Sanitizes arbitrary bytes with this stream's replacement source.
    pub fn sanitize(&mut self, value: &[u8]) -> Vec<u8> {
        sanitize_with(value, &mut self.rng)
    }

    /// Captures the wrapped stream's state.
    ///
    /// The replacement source is not captured.
    ///
    /// # Errors
    ///
    /// Same as [`MutatingStream::snapshot`].
    pub fn snapshot(&self) -> StreamResult<StreamSnapshot> {
        self.inner.snapshot()
    }
}

impl<E, R> SafeTokenStream<E, R> {
    /// See [`MutatingStream::seek`].
    ///
    /// # Errors
    ///
    /// Same as [`MutatingStream::seek`].
    pub fn seek(&mut self, pos: i64, whence: Whence) -> StreamResult<u64> {
        self.inner.seek(pos, whence)
    }

    /// See [`MutatingStream::tell`].
    ///
    /// # Errors
    ///
    /// Same as [`MutatingStream::tell`].
    pub fn tell(&self) -> StreamResult<u64> {
        self.inner.tell()
    }

    /// The raw, unsanitized buffer.
    ///
    /// # Errors
    ///
    /// Same as [`MutatingStream::getvalue`].
    pub fn getvalue(&self) -> StreamResult<Vec<u8>> {
        self.inner.getvalue()
    }

    /// See [`MutatingStream::close`].
    pub fn close(&mut self) {
        self.inner.close();
    }

    /// Returns true once closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Routes violations from the wrapped stream to `observer`.
    pub fn set_violation_observer(&mut self, observer: Arc<dyn ViolationObserver>) {
        self.inner.set_violation_observer(observer);
    }

    /// The wrapped stream.
    #[must_use]
    pub fn inner(&self) -> &MutatingStream<E> {
        &self.inner
    }

    /// Mutable access to the wrapped stream. Reads through it are not sanitized.
    pub fn inner_mut(&mut self) -> &mut MutatingStream<E> {
        &mut self.inner
    }

    /// Mutable access to the replacement source.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<E, R> std::fmt::Debug for SafeTokenStream<E, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeTokenStream")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<E: MutationEngine, R: Rng> FuzzStream for SafeTokenStream<E, R> {
    fn read(&mut self, size: Option<usize>) -> StreamResult<Vec<u8>> {
        Self::read(self, size)
    }

    fn seek(&mut self, pos: i64, whence: Whence) -> StreamResult<u64> {
        Self::seek(self, pos, whence)
    }

    fn tell(&self) -> StreamResult<u64> {
        Self::tell(self)
    }

    fn getvalue(&self) -> StreamResult<Vec<u8>> {
        Self::getvalue(self)
    }

    fn close(&mut self) {
        Self::close(self);
    }

    fn is_closed(&self) -> bool {
        Self::is_closed(self)
    }
}

impl<E: MutationEngine, R: Rng> io::Read for SafeTokenStream<E, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = io::Read::read(&mut self.inner, buf)?;
        sanitize_in_place(&mut buf[..n], &mut self.rng);
        Ok(n)
    }
}

impl<E, R> io::Seek for SafeTokenStream<E, R> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        io::Seek::seek(&mut self.inner, pos)
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::engine::FnEngine;
    use crate::stream::is_safe_byte;

    fn fixed(buffer: &'static [u8]) -> MutatingStream<impl MutationEngine> {
        let engine = FnEngine::new(move |_: &[u8], _: usize| Ok(buffer.to_vec()));
        MutatingStream::with_engine(b"src".to_vec(), engine, StreamConfig::new()).unwrap()
    }

    #[test]
    fn test_read_sanitizes_unsafe_bytes() {
        let mut stream = SafeTokenStream::with_parts(fixed(b"a/b%c"), Pcg32::seed_from_u64(1));
        let out = stream.read(Some(5)).unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], b'a');
        assert_eq!(out[2], b'b');
        assert_eq!(out[4], b'c');
        assert!(out.iter().all(|&b| is_safe_byte(b)));
    }

    #[test]
    fn test_getvalue_is_raw() {
        let stream = SafeTokenStream::with_parts(fixed(b"a/b"), Pcg32::seed_from_u64(1));
        assert_eq!(stream.getvalue().unwrap(), b"a/b");
    }

    #[test]
    fn test_regenerating_read_is_sanitized() {
        let mut stream = SafeTokenStream::with_parts(fixed(b"x y"), Pcg32::seed_from_u64(2));
        let out = stream.read(Some(10)).unwrap();
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|&b| is_safe_byte(b)));
        assert_eq!(stream.tell().unwrap(), 6);
    }

    #[test]
    fn test_seeded_token_streams_match() {
        let mut a = SafeTokenStream::new(b"/a b/c?d".to_vec(), StreamConfig::seeded(5)).unwrap();
        let mut b = SafeTokenStream::new(b"/a b/c?d".to_vec(), StreamConfig::seeded(5)).unwrap();
        for _ in 0..10 {
            assert_eq!(a.read(Some(3)).unwrap(), b.read(Some(3)).unwrap());
        }
    }

    #[test]
    fn test_io_read_is_sanitized() {
        use std::io::Read;
        let mut stream = SafeTokenStream::with_parts(fixed(b"\x00\x01\x02\x03"), Pcg32::seed_from_u64(3));
        let mut buf = [0u8; 4];
        assert_eq!(Read::read(&mut stream, &mut buf).unwrap(), 4);
        assert!(buf.iter().all(|&b| is_safe_byte(b)));
    }

    #[test]
    fn test_close_delegates() {
        let mut stream = SafeTokenStream::with_parts(fixed(b"abc"), Pcg32::seed_from_u64(4));
        stream.close();
        assert!(stream.is_closed());
        assert!(stream.inner().is_closed());
        assert!(stream.read(Some(1)).unwrap_err().is_closed());
    }
}
