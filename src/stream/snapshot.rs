//! Serializable stream state.
//!
//! A [`StreamSnapshot`] captures everything needed to rebuild a
//! [`MutatingStream`](crate::MutatingStream) at the same position over the same
//! mutated buffer: the source, the construction parameters, the current buffer
//! and position, and an FNV-1a checksum of the buffer.
//!
//! The wire format is bincode with fixed-size integers, so a snapshot's
//! encoded size depends only on its byte buffers.
//!
//! ```
//! use fuzz_stream::{MutatingStream, StreamConfig, StreamSnapshot};
//!
//! let mut stream = MutatingStream::new(b"hello".to_vec(), StreamConfig::seeded(42))?;
//! stream.seek(2, fuzz_stream::Whence::Start)?;
//!
//! let bytes = stream.snapshot()?.encode()?;
//! let restored = MutatingStream::resume(StreamSnapshot::decode(&bytes)?)?;
//! assert_eq!(restored.tell()?, 2);
//! assert_eq!(restored.getvalue()?, stream.getvalue()?);
//! # Ok::<(), fuzz_stream::StreamError>(())
//! ```
//!
//! The engine's internal generator state is not captured. A resumed stream
//! serves the saved buffer exactly, but its next regeneration starts the
//! engine afresh from `(seed, offset)`.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{StreamError, StreamResult};
use crate::hash::checksum;

use super::config::StreamConfig;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u8 = 1;

/// Upper bound on bytes a decoded snapshot may claim (256 MiB).
const DECODE_LIMIT: usize = 256 * 1024 * 1024;

// Fixed-size integers keep the layout independent of the values stored.
// The limit stops a corrupt length prefix from forcing a huge allocation.
fn config() -> impl bincode::config::Config {
    bincode::config::standard()
        .with_fixed_int_encoding()
        .with_limit::<DECODE_LIMIT>()
}

fn encode<T: Serialize + ?Sized>(value: &T) -> StreamResult<Vec<u8>> {
    bincode::serde::encode_to_vec(value, config()).map_err(|e| StreamError::Snapshot {
        context: format!("encoding failed: {e}"),
    })
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StreamResult<(T, usize)> {
    bincode::serde::decode_from_slice(bytes, config()).map_err(|e| StreamError::Snapshot {
        context: format!("decoding failed: {e}"),
    })
}

/// Serializable state of a [`MutatingStream`](crate::MutatingStream).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamSnapshot {
    /// Format version; see [`SNAPSHOT_VERSION`].
    pub version: u8,
    /// The unmutated source buffer.
    pub source: Vec<u8>,
    /// Seed the stream was built with, if any.
    pub seed: Option<u64>,
    /// Engine offset the stream was built with.
    pub offset: usize,
    /// Mutation budget per regeneration.
    pub mutation_budget: usize,
    /// The current mutated buffer.
    pub buffer: Vec<u8>,
    /// The current position.
    pub position: u64,
    /// FNV-1a checksum of `buffer`.
    pub checksum: u64,
}

impl StreamSnapshot {
    pub(crate) fn capture(
        source: &[u8],
        config: StreamConfig,
        mutation_budget: usize,
        buffer: &[u8],
        position: u64,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            source: source.to_vec(),
            seed: config.seed,
            offset: config.offset,
            mutation_budget,
            buffer: buffer.to_vec(),
            position,
            checksum: checksum(buffer),
        }
    }

    /// Encodes the snapshot with bincode.
    pub fn encode(&self) -> StreamResult<Vec<u8>> {
        encode(self)
    }

    /// Decodes and validates a snapshot.
    ///
    /// Fails on trailing bytes, an unknown version, or a checksum mismatch.
    pub fn decode(bytes: &[u8]) -> StreamResult<Self> {
        let (snapshot, read): (Self, usize) = decode(bytes)?;
        if read != bytes.len() {
            return Err(StreamError::Snapshot {
                context: format!("{} trailing bytes after snapshot", bytes.len() - read),
            });
        }
        snapshot.verify()?;
        Ok(snapshot)
    }

    /// Checks the version and the buffer checksum.
    pub fn verify(&self) -> StreamResult<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(StreamError::Snapshot {
                context: format!(
                    "unsupported snapshot version {} (expected {})",
                    self.version, SNAPSHOT_VERSION
                ),
            });
        }
        let actual = checksum(&self.buffer);
        if actual != self.checksum {
            return Err(StreamError::Snapshot {
                context: format!(
                    "buffer checksum mismatch: stored {:#018x}, computed {:#018x}",
                    self.checksum, actual
                ),
            });
        }
        Ok(())
    }

    /// Reconstructs the construction parameters.
    ///
    /// The budget is always restored as an explicit `mutations` value.
    #[must_use]
    pub fn config(&self) -> StreamConfig {
        StreamConfig {
            seed: self.seed,
            offset: self.offset,
            mutations: Some(self.mutation_budget),
        }
    }
}
