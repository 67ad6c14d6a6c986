//! The self-refilling mutated byte stream.

use std::io;
use std::sync::Arc;

use tracing::{debug, trace};

use super::config::StreamConfig;
use super::snapshot::StreamSnapshot;
use super::{resolve_seek, scrub, FuzzStream, Whence};
use crate::engine::{ByteMutator, MutationEngine};
use crate::error::{StreamError, StreamResult};
use crate::telemetry::{
    report_to_observer, InvariantChecker, InvariantViolation, Violation, ViolationKind,
    ViolationObserver, ViolationSeverity,
};
use crate::{debug_check_invariants, report_violation_to};

/// A read-only byte stream over a mutated copy of a source buffer.
///
/// On construction the stream asks its [`MutationEngine`] for one mutated
/// variant of `source` and serves reads from it. When a read would run past
/// the end, the stream asks for a fresh variant and returns the unread
/// remainder of the old buffer followed by the entire new one. Reads never
/// hit end-of-file.
///
/// # Positions
///
/// The position is a plain cursor into the current buffer. Seeking past the
/// end is allowed; the next read then regenerates and returns only the new
/// buffer. After a regeneration the position advances by the number of bytes
/// returned, so it may point past the new buffer's end. That is the steady
/// state of sequential reading and is not reported; only a read following a
/// seek past the end raises a [`ViolationKind::Position`] warning.
///
/// # Example
///
/// ```
/// use fuzz_stream::{MutatingStream, StreamConfig};
///
/// let mut stream = MutatingStream::new(b"GET / HTTP/1.1".to_vec(), StreamConfig::seeded(42))?;
/// let buffer = stream.getvalue()?;
///
/// let all = stream.read(None)?;
/// assert_eq!(all, buffer);
/// assert_eq!(stream.tell()?, buffer.len() as u64);
///
/// // At the end: the next read pulls a fresh variant.
/// let next = stream.read(Some(1))?;
/// assert_eq!(next, stream.getvalue()?);
/// # Ok::<(), fuzz_stream::StreamError>(())
/// ```
pub struct MutatingStream<E = ByteMutator> {
    source: Vec<u8>,
    config: StreamConfig,
    mutation_budget: usize,
    engine: E,
    buffer: Vec<u8>,
    position: u64,
    closed: bool,
    regenerations: u64,
    /// Set by a seek that leaves the cursor past the end, cleared by the next read.
    seeked_past_end: bool,
    /// Regenerated bytes an `io::Read` caller had no room for yet.
    pending: Vec<u8>,
    observer: Option<Arc<dyn ViolationObserver>>,
}

impl MutatingStream<ByteMutator> {
    /// Creates a stream driven by the default [`ByteMutator`], seeded from
    /// `config.seed` and `config.offset`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Engine`] if the initial mutation fails.
    pub fn new(source: impl Into<Vec<u8>>, config: StreamConfig) -> StreamResult<Self> {
        let engine = ByteMutator::new(config.seed, config.offset);
        Self::with_engine(source, engine, config)
    }

    /// Rebuilds a stream from a snapshot using a fresh default engine.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Snapshot`] if the snapshot fails validation.
    pub fn resume(snapshot: StreamSnapshot) -> StreamResult<Self> {
        let engine = ByteMutator::new(snapshot.seed, snapshot.offset);
        Self::restore(snapshot, engine)
    }
}

impl<E: MutationEngine> MutatingStream<E> {
    /// Creates a stream driven by a caller-supplied engine.
    ///
    /// `config.seed` is recorded for snapshots but is otherwise the engine's
    /// business.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Engine`] if the initial mutation fails.
    pub fn with_engine(
        source: impl Into<Vec<u8>>,
        mut engine: E,
        config: StreamConfig,
    ) -> StreamResult<Self> {
        let source = source.into();
        let mutation_budget = config.mutation_budget(source.len());
        let buffer = engine.fuzz(&source, mutation_budget)?;
        debug!(
            source_len = source.len(),
            buffer_len = buffer.len(),
            mutation_budget,
            seeded = config.seed.is_some(),
            "created mutating stream"
        );
        Ok(Self {
            source,
            config,
            mutation_budget,
            engine,
            buffer,
            position: 0,
            closed: false,
            regenerations: 0,
            seeked_past_end: false,
            pending: Vec::new(),
            observer: None,
        })
    }

    /// Rebuilds a stream from a snapshot without calling the engine.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Snapshot`] if the snapshot fails validation.
    pub fn restore(snapshot: StreamSnapshot, engine: E) -> StreamResult<Self> {
        verify_snapshot(&snapshot, None)?;
        let config = StreamConfig {
            seed: snapshot.seed,
            offset: snapshot.offset,
            mutations: None,
        };
        Ok(Self {
            source: snapshot.source,
            config,
            mutation_budget: snapshot.mutation_budget,
            engine,
            buffer: snapshot.buffer,
            position: snapshot.position,
            closed: false,
            regenerations: 0,
            seeked_past_end: false,
            pending: Vec::new(),
            observer: None,
        })
    }

    /// Mutates arbitrary `data` with this stream's engine, leaving the
    /// stream's own state untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Engine`] if the engine fails.
    pub fn fuzz(&mut self, data: &[u8], max_mutations: usize) -> StreamResult<Vec<u8>> {
        Ok(self.engine.fuzz(data, max_mutations)?)
    }

    /// Reads `size` bytes from the current position, or the whole current
    /// buffer if `size` is `None`.
    ///
    /// If `position + size` fits inside the buffer, the slice is returned and
    /// the position advances by `size`. Otherwise the buffer is regenerated
    /// and the result is the unread remainder followed by the entire new
    /// buffer; the position advances by the length of that result.
    ///
    /// # Errors
    ///
    /// - [`StreamError::Closed`] after [`close`](Self::close)
    /// - [`StreamError::Engine`] if regeneration fails; buffer and position
    ///   are left unchanged
    pub fn read(&mut self, size: Option<usize>) -> StreamResult<Vec<u8>> {
        self.ensure_open("read")?;
        scrub(&mut self.pending);
        let len = self.buffer.len();
        let size = size.unwrap_or(len);
        let start = usize::try_from(self.position).ok();

        if let Some(end) = start.and_then(|s| s.checked_add(size)) {
            if end <= len {
                let out = self.buffer[self.position as usize..end].to_vec();
                self.position += size as u64;
                trace!(size, position = self.position, "read");
                return Ok(out);
            }
        }

        self.read_with_regeneration(start.unwrap_or(usize::MAX), size)
    }

    fn read_with_regeneration(&mut self, start: usize, size: usize) -> StreamResult<Vec<u8>> {
        let len = self.buffer.len();
        if self.seeked_past_end && start > len {
            report_violation_to!(
                self.observer,
                Violation::new(
                    ViolationSeverity::Warning,
                    ViolationKind::Position,
                    "read after a seek past the end of the buffer; remainder is empty",
                    concat!(file!(), ":", line!()),
                )
                .with_position(self.position)
                .with_context("buffer_len", len.to_string())
            );
        }

        // Nothing changes until the engine has succeeded
        let fresh = self.engine.fuzz(&self.source, self.mutation_budget)?;
        if fresh.is_empty() {
            report_violation_to!(
                self.observer,
                Violation::new(
                    ViolationSeverity::Warning,
                    ViolationKind::Engine,
                    "engine returned an empty buffer",
                    concat!(file!(), ":", line!()),
                )
                .with_position(self.position)
                .with_context("mutation_budget", self.mutation_budget.to_string())
            );
        }

        let remainder = &self.buffer[start.min(len)..];
        let mut out = Vec::with_capacity(remainder.len() + fresh.len());
        out.extend_from_slice(remainder);
        out.extend_from_slice(&fresh);

        let mut old = std::mem::replace(&mut self.buffer, fresh);
        scrub(&mut old);
        self.position = self.position.saturating_add(out.len() as u64);
        self.regenerations += 1;
        self.seeked_past_end = false;

        debug!(
            requested = size,
            returned = out.len(),
            buffer_len = self.buffer.len(),
            position = self.position,
            regenerations = self.regenerations,
            "regenerated buffer"
        );
        debug_check_invariants!(self, "after regeneration");
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

    /// Captures the stream's state.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Closed`] after [`close`](Self::close).
    pub fn snapshot(&self) -> StreamResult<StreamSnapshot> {
        self.ensure_open("snapshot")?;
        Ok(StreamSnapshot::capture(
            &self.source,
            self.config,
            self.mutation_budget,
            &self.buffer,
            self.position,
        ))
    }

    /// Moves the stream to the state captured in `snapshot`, keeping the
    /// current engine and observer.
    ///
    /// # Errors
    ///
    /// - [`StreamError::Closed`] after [`close`](Self::close)
    /// - [`StreamError::Snapshot`] if the snapshot fails validation
    pub fn load_snapshot(&mut self, snapshot: StreamSnapshot) -> StreamResult<()> {
        self.ensure_open("load_snapshot")?;
        verify_snapshot(&snapshot, self.observer.as_ref())?;
        scrub(&mut self.buffer);
        scrub(&mut self.pending);
        self.source = snapshot.source;
        self.config.seed = snapshot.seed;
        self.config.offset = snapshot.offset;
        self.mutation_budget = snapshot.mutation_budget;
        self.buffer = snapshot.buffer;
        self.position = snapshot.position;
        self.seeked_past_end = false;
        debug_check_invariants!(self, "after load_snapshot");
        Ok(())
    }
}

impl<E> MutatingStream<E> {
    /// Moves the position and returns the new absolute position.
    ///
    /// - [`Whence::Start`]: `pos` must be non-negative
    /// - [`Whence::Current`] / [`Whence::End`]: relative, clamped at zero
    ///
    /// Positions past the end of the buffer are allowed.
    ///
    /// # Errors
    ///
    /// - [`StreamError::Closed`] after [`close`](Self::close)
    /// - [`StreamError::InvalidArgument`] for a negative absolute target
    pub fn seek(&mut self, pos: i64, whence: Whence) -> StreamResult<u64> {
        self.ensure_open("seek")?;
        let position = resolve_seek(self.position, self.buffer.len(), pos, whence)?;
        self.set_position(position);
        trace!(pos, %whence, position = self.position, "seek");
        Ok(self.position)
    }

    /// Returns the current position.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Closed`] after [`close`](Self::close).
    pub fn tell(&self) -> StreamResult<u64> {
        self.ensure_open("tell")?;
        Ok(self.position)
    }

    /// Returns a copy of the current mutated buffer.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Closed`] after [`close`](Self::close).
    pub fn getvalue(&self) -> StreamResult<Vec<u8>> {
        self.ensure_open("getvalue")?;
        Ok(self.buffer.clone())
    }

    /// Zeroes and releases the buffer and marks the stream closed.
    ///
    /// Idempotent. Also runs on drop.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        scrub(&mut self.buffer);
        scrub(&mut self.pending);
        self.closed = true;
        debug!(regenerations = self.regenerations, "closed mutating stream");
        debug_check_invariants!(self, "after close");
    }

    /// Returns true once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Routes violations to `observer` instead of the tracing log.
    pub fn set_violation_observer(&mut self, observer: Arc<dyn ViolationObserver>) {
        self.observer = Some(observer);
    }

    /// The unmutated source buffer.
    #[must_use]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// The construction parameters.
    #[must_use]
    pub fn config(&self) -> StreamConfig {
        self.config
    }

    /// Mutations allowed per regeneration.
    #[must_use]
    pub fn mutation_budget(&self) -> usize {
        self.mutation_budget
    }

    /// How many times the buffer has been regenerated after construction.
    #[must_use]
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    /// The engine.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the engine.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    fn set_position(&mut self, position: u64) {
        scrub(&mut self.pending);
        self.position = position;
        self.seeked_past_end = usize::try_from(position).map_or(true, |p| p > self.buffer.len());
    }

    fn ensure_open(&self, operation: &'static str) -> StreamResult<()> {
        if self.closed {
            Err(StreamError::closed(operation))
        } else {
            Ok(())
        }
    }
}

/// Verifies `snapshot`, reporting a rejection before returning it.
fn verify_snapshot(
    snapshot: &StreamSnapshot,
    observer: Option<&Arc<dyn ViolationObserver>>,
) -> StreamResult<()> {
    snapshot.verify().inspect_err(|err| {
        report_to_observer(
            observer,
            &Violation::new(
                ViolationSeverity::Error,
                ViolationKind::Snapshot,
                "rejected snapshot",
                concat!(file!(), ":", line!()),
            )
            .with_position(snapshot.position)
            .with_context("reason", err.to_string()),
        );
    })
}

impl<E> Drop for MutatingStream<E> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<E> InvariantChecker for MutatingStream<E> {
    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.closed && !(self.buffer.is_empty() && self.pending.is_empty()) {
            return Err(InvariantViolation::new(
                "MutatingStream",
                "closed stream still holds buffer bytes",
            )
            .with_details(format!(
                "buffer_len={} pending_len={}",
                self.buffer.len(),
                self.pending.len()
            )));
        }
        Ok(())
    }
}

impl<E> std::fmt::Debug for MutatingStream<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Buffer contents are omitted; they may be large or sensitive
        f.debug_struct("MutatingStream")
            .field("source_len", &self.source.len())
            .field("config", &self.config)
            .field("mutation_budget", &self.mutation_budget)
            .field("buffer_len", &self.buffer.len())
            .field("position", &self.position)
            .field("closed", &self.closed)
            .field("regenerations", &self.regenerations)
            .field("pending_len", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl<E: MutationEngine> FuzzStream for MutatingStream<E> {
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

/// Copies up to `buf.len()` bytes of a stream read into `buf`.
///
/// A read that triggers regeneration can return more than requested; the
/// surplus is held back and handed out by the following `io::Read` calls
/// before the stream is read again, so the byte sequence matches
/// [`MutatingStream::read`]. The position already counts held-back bytes.
/// Any other stream operation that moves the cursor drops them.
///
/// `Ok(0)` only happens when the engine produced an empty buffer and nothing
/// was left to read.
impl<E: MutationEngine> io::Read for MutatingStream<E> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if !self.pending.is_empty() {
            self.ensure_open("read")?;
            let n = self.pending.len().min(buf.len());
            buf[..n].copy_from_slice(&self.pending[..n]);
            self.pending.drain(..n);
            return Ok(n);
        }
        let chunk = Self::read(self, Some(buf.len()))?;
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        self.pending = chunk;
        self.pending.drain(..n);
        Ok(n)
    }
}

impl<E> io::Seek for MutatingStream<E> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let position = match pos {
            io::SeekFrom::Start(offset) => {
                self.ensure_open("seek")?;
                self.set_position(offset);
                offset
            }
            io::SeekFrom::Current(delta) => Self::seek(self, delta, Whence::Current)?,
            io::SeekFrom::End(delta) => Self::seek(self, delta, Whence::End)?,
        };
        Ok(position)
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
    use crate::error::EngineError;
    use crate::telemetry::CollectingObserver;
    use std::collections::VecDeque;

    /// Engine that replays a fixed queue of buffers, then fails.
    fn scripted(
        buffers: &[&[u8]],
    ) -> FnEngine<impl FnMut(&[u8], usize) -> Result<Vec<u8>, EngineError>> {
        let mut queue: VecDeque<Vec<u8>> = buffers.iter().map(|b| b.to_vec()).collect();
        FnEngine::new(move |_: &[u8], _: usize| {
            queue
                .pop_front()
                .ok_or_else(|| EngineError::new("script exhausted"))
        })
    }

    #[test]
    fn test_read_within_buffer_advances() {
        let mut stream =
            MutatingStream::with_engine(b"src".to_vec(), scripted(&[b"abcdef"]), StreamConfig::new())
                .unwrap();
        assert_eq!(stream.read(Some(2)).unwrap(), b"ab");
        assert_eq!(stream.read(Some(3)).unwrap(), b"cde");
        assert_eq!(stream.tell().unwrap(), 5);
        assert_eq!(stream.regenerations(), 0);
    }

    #[test]
    fn test_regeneration_returns_remainder_then_new_buffer() {
        let mut stream = MutatingStream::with_engine(
            b"src".to_vec(),
            scripted(&[b"abcd", b"WXYZ12"]),
            StreamConfig::new(),
        )
        .unwrap();
        assert_eq!(stream.read(Some(2)).unwrap(), b"ab");
        assert_eq!(stream.read(Some(10)).unwrap(), b"cdWXYZ12");
        assert_eq!(stream.tell().unwrap(), 2 + 8);
        assert_eq!(stream.getvalue().unwrap(), b"WXYZ12");
        assert_eq!(stream.regenerations(), 1);
    }

    #[test]
    fn test_failed_regeneration_leaves_state_unchanged() {
        let mut stream =
            MutatingStream::with_engine(b"src".to_vec(), scripted(&[b"abc"]), StreamConfig::new())
                .unwrap();
        stream.seek(1, Whence::Start).unwrap();
        let err = stream.read(Some(10)).unwrap_err();
        assert!(matches!(err, StreamError::Engine(_)));
        assert_eq!(stream.tell().unwrap(), 1);
        assert_eq!(stream.getvalue().unwrap(), b"abc");
    }

    #[test]
    fn test_read_past_end_reports_position_violation() {
        let observer = Arc::new(CollectingObserver::new());
        let mut stream = MutatingStream::with_engine(
            b"src".to_vec(),
            scripted(&[b"abc", b"xyz"]),
            StreamConfig::new(),
        )
        .unwrap();
        stream.set_violation_observer(observer.clone());
        stream.seek(100, Whence::Start).unwrap();
        assert_eq!(stream.read(Some(1)).unwrap(), b"xyz");
        assert_eq!(stream.tell().unwrap(), 103);
        assert!(observer.has_violation(ViolationKind::Position));
    }

    #[test]
    fn test_empty_engine_output_reports_engine_violation() {
        let observer = Arc::new(CollectingObserver::new());
        let mut stream =
            MutatingStream::with_engine(b"src".to_vec(), scripted(&[b"ab", b""]), StreamConfig::new())
                .unwrap();
        stream.set_violation_observer(observer.clone());
        assert_eq!(stream.read(Some(5)).unwrap(), b"ab");
        assert!(observer.has_violation(ViolationKind::Engine));
        assert_eq!(observer.len(), 1);
    }

    #[test]
    fn test_close_clears_buffer_and_is_idempotent() {
        let mut stream = MutatingStream::new(b"secret".to_vec(), StreamConfig::seeded(1)).unwrap();
        stream.close();
        stream.close();
        assert!(stream.is_closed());
        assert!(stream.buffer.is_empty());
        assert!(stream.check_invariants().is_ok());
    }

    #[test]
    fn test_debug_omits_buffer_bytes() {
        let stream =
            MutatingStream::with_engine(b"src".to_vec(), scripted(&[b"TOPSECRET"]), StreamConfig::new())
                .unwrap();
        let rendered = format!("{stream:?}");
        assert!(!rendered.contains("TOPSECRET"));
        assert!(rendered.contains("buffer_len: 9"));
    }

    #[test]
    fn test_io_read_hands_out_surplus_later() {
        use std::io::Read;
        let mut stream = MutatingStream::with_engine(
            b"src".to_vec(),
            scripted(&[b"ab", b"cdefgh"]),
            StreamConfig::new(),
        )
        .unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(Read::read(&mut stream, &mut buf).unwrap(), 4);
        assert_eq!(&buf, b"abcd");
        // Position already reflects everything the regeneration returned
        assert_eq!(stream.tell().unwrap(), 8);

        // Served from the held-back bytes; the script has nothing left
        let mut rest = [0u8; 3];
        assert_eq!(Read::read(&mut stream, &mut rest).unwrap(), 3);
        assert_eq!(&rest, b"efg");
        assert_eq!(Read::read(&mut stream, &mut rest).unwrap(), 1);
        assert_eq!(rest[0], b'h');
        assert_eq!(stream.regenerations(), 1);
    }

    #[test]
    fn test_seek_drops_held_back_bytes() {
        use std::io::Read;
        let mut stream = MutatingStream::with_engine(
            b"src".to_vec(),
            scripted(&[b"ab", b"cdefgh"]),
            StreamConfig::new(),
        )
        .unwrap();
        let mut buf = [0u8; 4];
        Read::read(&mut stream, &mut buf).unwrap();
        stream.seek(1, Whence::Start).unwrap();
        assert!(stream.pending.is_empty());
        assert_eq!(Read::read(&mut stream, &mut buf).unwrap(), 4);
        assert_eq!(&buf, b"defg");
    }

    #[test]
    fn test_sequential_reads_past_end_are_not_reported() {
        let observer = Arc::new(CollectingObserver::new());
        let mut stream = MutatingStream::with_engine(
            b"src".to_vec(),
            scripted(&[b"abc", b"defg", b"hi"]),
            StreamConfig::new(),
        )
        .unwrap();
        stream.set_violation_observer(observer.clone());
        assert_eq!(stream.read(Some(5)).unwrap(), b"abcdefg");
        // Position 7 is past the 4-byte buffer without any seek
        assert_eq!(stream.read(Some(1)).unwrap(), b"hi");
        assert!(observer.is_empty());
    }

    #[test]
    fn test_load_snapshot_reports_rejection() {
        let observer = Arc::new(CollectingObserver::new());
        let mut stream =
            MutatingStream::with_engine(b"src".to_vec(), scripted(&[b"abc"]), StreamConfig::new())
                .unwrap();
        stream.set_violation_observer(observer.clone());
        let mut snapshot = stream.snapshot().unwrap();
        snapshot.buffer.push(b'!');
        assert!(matches!(
            stream.load_snapshot(snapshot),
            Err(StreamError::Snapshot { .. })
        ));
        let rejected = observer.violations_of_kind(ViolationKind::Snapshot);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].severity, ViolationSeverity::Error);
        assert!(rejected[0].context["reason"].contains("checksum"));
        assert_eq!(stream.getvalue().unwrap(), b"abc");
    }

    #[test]
    fn test_io_seek_start_accepts_full_u64() {
        use std::io::{Seek, SeekFrom};
        let mut stream =
            MutatingStream::with_engine(b"src".to_vec(), scripted(&[b"abc"]), StreamConfig::new())
                .unwrap();
        assert_eq!(Seek::seek(&mut stream, SeekFrom::Start(u64::MAX)).unwrap(), u64::MAX);
        assert_eq!(Seek::seek(&mut stream, SeekFrom::End(-1)).unwrap(), 2);
        assert_eq!(Seek::seek(&mut stream, SeekFrom::Current(-10)).unwrap(), 0);
    }

    #[test]
    fn test_io_errors_after_close() {
        use std::io::Read;
        let mut stream = MutatingStream::new(b"abc".to_vec(), StreamConfig::seeded(1)).unwrap();
        stream.close();
        let mut buf = [0u8; 2];
        let err = Read::read(&mut stream, &mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
