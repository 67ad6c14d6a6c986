//! Read-only fuzz streams.
//!
//! - [`MutatingStream`] hands out bytes from a mutated copy of a source buffer
//!   and regenerates the copy whenever a read would run past its end.
//! - [`SafeTokenStream`] wraps a [`MutatingStream`] and rewrites every byte
//!   outside [`SAFE_ALPHABET`] so the output can be dropped into a URL path.
//!
//! Both implement [`FuzzStream`], plus [`std::io::Read`] and [`std::io::Seek`].

pub mod config;
pub mod mutating;
pub mod safe_token;
pub mod sanitize;
pub mod snapshot;

pub use config::{StreamConfig, StreamConfigBuilder};
pub use mutating::MutatingStream;
pub use safe_token::SafeTokenStream;
pub use sanitize::{is_safe_byte, sanitize, sanitize_in_place, sanitize_with, SAFE_ALPHABET};
pub use snapshot::{StreamSnapshot, SNAPSHOT_VERSION};

use std::fmt;

use crate::error::{StreamError, StreamResult};

/// Reference point for [`FuzzStream::seek`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Whence {
    /// Absolute position. Negative targets are rejected.
    #[default]
    Start,
    /// Relative to the current position. Clamped at zero.
    Current,
    /// Relative to the end of the current mutated buffer. Clamped at zero.
    End,
}

impl TryFrom<i32> for Whence {
    type Error = StreamError;

    /// Maps the conventional `0`/`1`/`2` whence codes.
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Start),
            1 => Ok(Self::Current),
            2 => Ok(Self::End),
            other => Err(StreamError::InvalidArgument {
                info: format!("invalid whence ({other}, should be 0, 1 or 2)"),
            }),
        }
    }
}

impl fmt::Display for Whence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Current => write!(f, "current"),
            Self::End => write!(f, "end"),
        }
    }
}

/// A unified interface over both fuzz stream types.
///
/// Write generic harness code against this trait and pick the stream type at
/// the call site.
///
/// # Method Override Table
///
/// | Method | [`MutatingStream`] | [`SafeTokenStream`] |
/// |--------|:-:|:-:|
/// | [`read`](FuzzStream::read) | Override | Override (sanitized) |
/// | [`read1`](FuzzStream::read1) | Default (`read`) | Default (`read`) |
/// | [`seek`](FuzzStream::seek) / [`tell`](FuzzStream::tell) | Override | Override (delegates) |
/// | [`getvalue`](FuzzStream::getvalue) | Override | Override (raw, unsanitized) |
/// | [`readable`](FuzzStream::readable) / [`writable`](FuzzStream::writable) / [`seekable`](FuzzStream::seekable) | Default | Default |
/// | [`write`](FuzzStream::write) / [`truncate`](FuzzStream::truncate) | Default (unsupported) | Default (unsupported) |
///
/// Every method except [`close`](FuzzStream::close) and
/// [`is_closed`](FuzzStream::is_closed) fails with [`StreamError::Closed`]
/// once the stream has been closed.
///
/// # Example
///
/// ```
/// use fuzz_stream::prelude::*;
///
/// fn first_token(stream: &mut impl FuzzStream) -> StreamResult<Vec<u8>> {
///     stream.seek(0, Whence::Start)?;
///     stream.read(Some(8))
/// }
///
/// // A zero budget keeps the buffer identical to the source.
/// let config = StreamConfig::builder().seed(1).mutations(0).build();
/// let mut raw = MutatingStream::new(b"/api/v1/users".to_vec(), config)?;
/// let mut safe = SafeTokenStream::new(b"/api/v1/users".to_vec(), config)?;
/// assert_eq!(first_token(&mut raw)?, b"/api/v1/");
/// assert!(first_token(&mut safe)?.iter().all(|&b| is_safe_byte(b)));
/// # Ok::<(), StreamError>(())
/// ```
pub trait FuzzStream {
    /// Reads `size` bytes (`None` = the whole current buffer), regenerating
    /// the mutated buffer if the read would run past its end.
    ///
    /// After a regeneration the result is the unread remainder followed by
    /// the entire new buffer, so it may be longer than `size`.
    fn read(&mut self, size: Option<usize>) -> StreamResult<Vec<u8>>;

    /// Same as [`read`](FuzzStream::read).
    fn read1(&mut self, size: Option<usize>) -> StreamResult<Vec<u8>> {
        self.read(size)
    }

    /// Moves the position and returns the new absolute position.
    ///
    /// Positions past the end of the buffer are allowed; the next read then
    /// regenerates.
    fn seek(&mut self, pos: i64, whence: Whence) -> StreamResult<u64>;

    /// Like [`seek`](FuzzStream::seek), with a raw `0`/`1`/`2` whence code.
    ///
    /// A closed stream reports [`StreamError::Closed`] before the whence code
    /// is validated.
    fn seek_raw(&mut self, pos: i64, whence: i32) -> StreamResult<u64> {
        self.ensure_open("seek")?;
        self.seek(pos, Whence::try_from(whence)?)
    }

    /// Current position.
    fn tell(&self) -> StreamResult<u64>;

    /// A copy of the current mutated buffer.
    fn getvalue(&self) -> StreamResult<Vec<u8>>;

    /// Closes the stream and discards the buffer. Idempotent.
    fn close(&mut self);

    /// Returns true once [`close`](FuzzStream::close) has been called.
    fn is_closed(&self) -> bool;

    /// Fails with [`StreamError::Closed`] if the stream is closed.
    fn ensure_open(&self, operation: &'static str) -> StreamResult<()> {
        if self.is_closed() {
            Err(StreamError::closed(operation))
        } else {
            Ok(())
        }
    }

    /// Always `true` while open.
    fn readable(&self) -> StreamResult<bool> {
        self.ensure_open("readable")?;
        Ok(true)
    }

    /// Always `false` while open.
    fn writable(&self) -> StreamResult<bool> {
        self.ensure_open("writable")?;
        Ok(false)
    }

    /// Always `false` while open, even though [`seek`](FuzzStream::seek)
    /// works. Consumers that probe this flag will not seek.
    fn seekable(&self) -> StreamResult<bool> {
        self.ensure_open("seekable")?;
        Ok(false)
    }

    /// Writing is unsupported.
    fn write(&mut self, _data: &[u8]) -> StreamResult<usize> {
        self.ensure_open("write")?;
        Err(StreamError::NotSupported { operation: "write" })
    }

    /// Truncating is unsupported.
    fn truncate(&mut self, _size: Option<u64>) -> StreamResult<u64> {
        self.ensure_open("truncate")?;
        Err(StreamError::NotSupported {
            operation: "truncate",
        })
    }
}

impl<S: FuzzStream + ?Sized> FuzzStream for Box<S> {
    fn read(&mut self, size: Option<usize>) -> StreamResult<Vec<u8>> {
        (**self).read(size)
    }

    fn seek(&mut self, pos: i64, whence: Whence) -> StreamResult<u64> {
        (**self).seek(pos, whence)
    }

    fn tell(&self) -> StreamResult<u64> {
        (**self).tell()
    }

    fn getvalue(&self) -> StreamResult<Vec<u8>> {
        (**self).getvalue()
    }

    fn close(&mut self) {
        (**self).close();
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

/// Overwrites a buffer with zeros before releasing it.
///
/// Best effort: without `unsafe` volatile writes the compiler may still elide
/// the stores, but [`std::hint::black_box`] keeps the common case honest.
pub(crate) fn scrub(buffer: &mut Vec<u8>) {
    buffer.fill(0);
    std::hint::black_box(buffer.as_slice());
    buffer.clear();
    buffer.shrink_to_fit();
}

/// Resolves a seek request against the current position and buffer length.
pub(crate) fn resolve_seek(
    position: u64,
    buffer_len: usize,
    pos: i64,
    whence: Whence,
) -> StreamResult<u64> {
    let base: i128 = match whence {
        Whence::Start => {
            if pos < 0 {
                return Err(StreamError::InvalidArgument {
                    info: format!("negative seek position {pos}"),
                });
            }
            0
        }
        Whence::Current => i128::from(position),
        Whence::End => buffer_len as i128,
    };
    let target = (base + i128::from(pos)).clamp(0, i128::from(u64::MAX));
    Ok(target as u64)
}
