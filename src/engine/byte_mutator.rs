//! The built-in byte-level mutation engine.
//!
//! [`ByteMutator`] applies a random number of havoc-style edits (bit flips,
//! arithmetic, interesting values, range deletion/duplication, insertion,
//! swaps and dictionary splices) to a copy of its input. Every random choice
//! comes from a [`Pcg32`] keyed by `(seed, offset)`, so two mutators built with
//! the same pair produce identical output sequences for identical inputs.

use tracing::trace;

use super::config::MutatorConfig;
use super::MutationEngine;
use crate::error::EngineError;
use crate::rng::{timing_entropy_seed, Pcg32, Rng};

/// Byte values that tend to hit boundary conditions in parsers.
const INTERESTING_8: [u8; 9] = [0x80, 0xff, 0x00, 0x01, 0x10, 0x20, 0x40, 0x64, 0x7f];

/// Number of distinct edit operations.
const MUTATION_COUNT: usize = 12;

/// A single edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    BitFlip,
    Increment,
    Decrement,
    Negate,
    RandomByte,
    InterestingByte,
    DeleteRange,
    DuplicateRange,
    InsertRandom,
    InsertRepeated,
    SwapBytes,
    DictionaryToken,
}

impl Mutation {
    const ALL: [Self; MUTATION_COUNT] = [
        Self::BitFlip,
        Self::Increment,
        Self::Decrement,
        Self::Negate,
        Self::RandomByte,
        Self::InterestingByte,
        Self::DeleteRange,
        Self::DuplicateRange,
        Self::InsertRandom,
        Self::InsertRepeated,
        Self::SwapBytes,
        Self::DictionaryToken,
    ];
}

/// Counters for what a [`ByteMutator`] has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutatorStats {
    /// Number of `fuzz` calls that produced output.
    pub calls: u64,
    /// Edits that changed the buffer.
    pub mutations_applied: u64,
    /// Edits drawn but not applicable (e.g. a deletion on an empty buffer).
    pub mutations_skipped: u64,
    /// Total bytes added by insertions and duplications.
    pub bytes_inserted: u64,
    /// Total bytes removed by deletions.
    pub bytes_deleted: u64,
}

/// Seeded byte-level [`MutationEngine`].
///
/// # Example
///
/// ```
/// use fuzz_stream::{ByteMutator, MutationEngine};
///
/// let mut a = ByteMutator::new(Some(42), 0);
/// let mut b = ByteMutator::new(Some(42), 0);
/// assert_eq!(a.fuzz(b"hello", 5).unwrap(), b.fuzz(b"hello", 5).unwrap());
///
/// // A zero budget returns the input untouched.
/// assert_eq!(a.fuzz(b"hello", 0).unwrap(), b"hello");
/// ```
#[derive(Debug, Clone)]
pub struct ByteMutator {
    rng: Pcg32,
    seed: u64,
    seeded: bool,
    offset: usize,
    config: MutatorConfig,
    stats: MutatorStats,
}

impl ByteMutator {
    /// Creates a mutator with the default [`MutatorConfig`].
    ///
    /// `seed` of `None` draws a seed from timing entropy; `offset` selects the
    /// PCG stream, so the same seed with different offsets yields unrelated
    /// mutation sequences.
    #[must_use]
    pub fn new(seed: Option<u64>, offset: usize) -> Self {
        Self::with_config(seed, offset, MutatorConfig::default())
    }

    /// Creates a mutator with an explicit configuration.
    #[must_use]
    pub fn with_config(seed: Option<u64>, offset: usize, config: MutatorConfig) -> Self {
        let seeded = seed.is_some();
        let seed = seed.unwrap_or_else(timing_entropy_seed);
        Self {
            rng: Pcg32::new(seed, offset as u64),
            seed,
            seeded,
            offset,
            config,
            stats: MutatorStats::default(),
        }
    }

    /// The seed actually in use (drawn from entropy if none was given).
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns true if the caller supplied the seed.
    #[must_use]
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// The PCG stream selector this mutator was built with.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &MutatorConfig {
        &self.config
    }

    /// Returns a copy of the counters.
    #[must_use]
    pub fn stats(&self) -> MutatorStats {
        self.stats
    }

    /// Resets the counters.
    pub fn reset_stats(&mut self) {
        self.stats = MutatorStats::default();
    }

    fn pick_mutation(&mut self) -> Mutation {
        Mutation::ALL[self.rng.gen_range_usize(0..MUTATION_COUNT)]
    }

    /// Random index into a non-empty buffer.
    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range_usize(0..len)
    }

    /// Random chunk length in `1..=max`, where `max >= 1`.
    fn chunk_len(&mut self, max: usize) -> usize {
        1 + self.rng.gen_range_usize(0..max.min(self.config.max_chunk).max(1))
    }

    /// Applies one edit. Returns false if it could not apply.
    fn apply(&mut self, mutation: Mutation, buf: &mut Vec<u8>, limit: usize) -> bool {
        let len = buf.len();
        let room = limit.saturating_sub(len);
        match mutation {
            Mutation::BitFlip if len > 0 => {
                let idx = self.index(len);
                let bit = self.rng.gen_range_usize(0..8);
                buf[idx] ^= 1 << bit;
            }
            Mutation::Increment if len > 0 => {
                let idx = self.index(len);
                buf[idx] = buf[idx].wrapping_add(1);
            }
            Mutation::Decrement if len > 0 => {
                let idx = self.index(len);
                buf[idx] = buf[idx].wrapping_sub(1);
            }
            Mutation::Negate if len > 0 => {
                let idx = self.index(len);
                buf[idx] = buf[idx].wrapping_neg();
            }
            Mutation::RandomByte if len > 0 => {
                let idx = self.index(len);
                // xor with a non-zero value so the byte always changes
                let delta = 1 + self.rng.gen_range_usize(0..255) as u8;
                buf[idx] ^= delta;
            }
            Mutation::InterestingByte if len > 0 => {
                let idx = self.index(len);
                if let Some(&value) = self.rng.pick_uniform(&INTERESTING_8) {
                    buf[idx] = value;
                }
            }
            Mutation::DeleteRange if len > 1 => {
                let start = self.index(len);
                let count = self.chunk_len(len - start);
                buf.drain(start..start + count);
                self.stats.bytes_deleted += count as u64;
            }
            Mutation::DuplicateRange if len > 0 && room > 0 => {
                let start = self.index(len);
                let count = self.chunk_len((len - start).min(room));
                let chunk = buf[start..start + count].to_vec();
                let at = start + count;
                buf.splice(at..at, chunk);
                self.stats.bytes_inserted += count as u64;
            }
            Mutation::InsertRandom if room > 0 => {
                let at = self.rng.gen_range_usize(0..len + 1);
                let count = self.chunk_len(room);
                let mut bytes = vec![0u8; count];
                self.rng.fill_bytes(&mut bytes);
                buf.splice(at..at, bytes);
                self.stats.bytes_inserted += count as u64;
            }
            Mutation::InsertRepeated if len > 0 && room > 0 => {
                let value = buf[self.index(len)];
                let at = self.rng.gen_range_usize(0..len + 1);
                let count = self.chunk_len(room);
                buf.splice(at..at, std::iter::repeat_n(value, count));
                self.stats.bytes_inserted += count as u64;
            }
            Mutation::SwapBytes if len > 1 => {
                let a = self.index(len);
                let b = self.index(len);
                if a == b || buf[a] == buf[b] {
                    return false;
                }
                buf.swap(a, b);
            }
            Mutation::DictionaryToken if !self.config.dictionary.is_empty() => {
                let which = self.rng.gen_range_usize(0..self.config.dictionary.len());
                let token_len = self.config.dictionary[which].len();
                let at = self.rng.gen_range_usize(0..len + 1);
                let overwrite = len > 0 && (token_len > room || self.rng.gen_bool(0.5));
                if overwrite {
                    // Clip so the overwrite never runs past the end
                    let end = (at + token_len).min(len);
                    let take = end - at.min(end);
                    if take == 0 {
                        return false;
                    }
                    let token = &self.config.dictionary[which];
                    buf[at..at + take].copy_from_slice(&token[..take]);
                } else if token_len <= room {
                    let token = self.config.dictionary[which].clone();
                    buf.splice(at..at, token);
                    self.stats.bytes_inserted += token_len as u64;
                } else {
                    return false;
                }
            }
            _ => return false,
        }
        true
    }
}

impl MutationEngine for ByteMutator {
    fn fuzz(&mut self, data: &[u8], max_mutations: usize) -> Result<Vec<u8>, EngineError> {
        if data.len() > self.config.max_input_len {
            return Err(EngineError::new(format!(
                "input of {} bytes exceeds max_input_len {}",
                data.len(),
                self.config.max_input_len
            )));
        }

        let mut out = data.to_vec();
        self.stats.calls += 1;
        if max_mutations == 0 {
            return Ok(out);
        }

        let limit = data.len().saturating_add(self.config.max_growth);
        let rounds = 1 + self.rng.gen_range_usize(0..max_mutations);
        for _ in 0..rounds {
            let mutation = self.pick_mutation();
            if self.apply(mutation, &mut out, limit) {
                self.stats.mutations_applied += 1;
            } else {
                self.stats.mutations_skipped += 1;
            }
        }

        if self.config.printable {
            for byte in &mut out {
                *byte = (byte.wrapping_sub(0x20) % 95) + 0x20;
            }
        }

        trace!(
            input_len = data.len(),
            output_len = out.len(),
            rounds,
            "mutated buffer"
        );
        Ok(out)
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

    #[test]
    fn test_same_seed_same_output() {
        let mut a = ByteMutator::new(Some(42), 0);
        let mut b = ByteMutator::new(Some(42), 0);
        for _ in 0..32 {
            assert_eq!(a.fuzz(b"hello", 5).unwrap(), b.fuzz(b"hello", 5).unwrap());
        }
    }

    #[test]
    fn test_offset_changes_sequence() {
        let mut a = ByteMutator::new(Some(42), 0);
        let mut b = ByteMutator::new(Some(42), 3);
        let seq_a: Vec<Vec<u8>> = (0..16).map(|_| a.fuzz(b"hello world", 11).unwrap()).collect();
        let seq_b: Vec<Vec<u8>> = (0..16).map(|_| b.fuzz(b"hello world", 11).unwrap()).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn test_zero_budget_is_identity() {
        let mut mutator = ByteMutator::new(Some(1), 0);
        assert_eq!(mutator.fuzz(b"abc", 0).unwrap(), b"abc");
        assert_eq!(mutator.stats().mutations_applied, 0);
        assert_eq!(mutator.stats().calls, 1);
    }

    #[test]
    fn test_output_respects_growth_limit() {
        let config = MutatorConfig::builder().max_growth(4).build();
        let mut mutator = ByteMutator::with_config(Some(7), 0, config);
        for _ in 0..500 {
            let out = mutator.fuzz(b"0123456789", 64).unwrap();
            assert!(out.len() <= 14, "grew to {} bytes", out.len());
        }
    }

    #[test]
    fn test_mutations_eventually_change_input() {
        let mut mutator = ByteMutator::new(Some(5), 0);
        let changed = (0..64).any(|_| mutator.fuzz(b"hello", 5).unwrap() != b"hello");
        assert!(changed);
    }

    #[test]
    fn test_empty_input_only_grows() {
        let mut mutator = ByteMutator::new(Some(11), 0);
        for _ in 0..100 {
            let _ = mutator.fuzz(b"", 1).unwrap();
        }
        let stats = mutator.stats();
        assert_eq!(stats.bytes_deleted, 0);
        assert!(stats.bytes_inserted > 0);
    }

    #[test]
    fn test_printable_output() {
        let mut mutator = ByteMutator::with_config(Some(3), 0, MutatorConfig::text());
        for _ in 0..200 {
            let out = mutator.fuzz(b"\x00\x01binary\xff", 8).unwrap();
            assert!(out.iter().all(|b| (0x20..=0x7e).contains(b)), "{out:?}");
        }
    }

    #[test]
    fn test_dictionary_tokens_appear() {
        let config = MutatorConfig::builder()
            .token("@@TOKEN@@")
            .max_growth(64)
            .build();
        let mut mutator = ByteMutator::with_config(Some(99), 0, config);
        let spliced = (0..500).any(|_| {
            let out = mutator.fuzz(b"", 1).unwrap();
            out.windows(9).any(|w| w == b"@@TOKEN@@")
        });
        assert!(spliced);
    }

    #[test]
    fn test_oversized_input_is_engine_error() {
        let config = MutatorConfig::builder().max_input_len(4).build();
        let mut mutator = ByteMutator::with_config(Some(1), 0, config);
        let err = mutator.fuzz(b"too long", 1).unwrap_err();
        assert!(err.context.contains("max_input_len"));
        assert_eq!(mutator.stats().calls, 0);
    }

    #[test]
    fn test_unseeded_reports_drawn_seed() {
        let mutator = ByteMutator::new(None, 2);
        assert!(!mutator.is_seeded());
        assert_eq!(mutator.offset(), 2);
        let replay = ByteMutator::new(Some(mutator.seed()), 2);
        assert!(replay.is_seeded());
        assert_eq!(replay.seed(), mutator.seed());
    }
}
