//! Configuration for the built-in [`ByteMutator`](super::ByteMutator).

/// Default cap on how far a single `fuzz` call may grow its output.
pub const DEFAULT_MAX_GROWTH: usize = 64;

/// Default maximum length of a single inserted, duplicated or deleted range.
pub const DEFAULT_MAX_CHUNK: usize = 16;

/// Default maximum input length accepted by the mutator (16 MiB).
pub const DEFAULT_MAX_INPUT_LEN: usize = 16 * 1024 * 1024;

/// Configuration for [`ByteMutator`](super::ByteMutator).
///
/// Use [`MutatorConfig::builder()`] for a fluent configuration API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutatorConfig {
    /// Output of one `fuzz` call is at most `input.len() + max_growth` bytes
    /// (default: 64).
    pub max_growth: usize,

    /// Longest range a single insert/duplicate/delete touches (default: 16, min 1).
    pub max_chunk: usize,

    /// Inputs longer than this are rejected with an engine error
    /// (default: 16 MiB).
    pub max_input_len: usize,

    /// Fold every output byte into printable ASCII `0x20..=0x7e` (default: false).
    pub printable: bool,

    /// Tokens that may be spliced into the output, e.g. protocol keywords
    /// (default: empty).
    pub dictionary: Vec<Vec<u8>>,
}

impl Default for MutatorConfig {
    fn default() -> Self {
        Self {
            max_growth: DEFAULT_MAX_GROWTH,
            max_chunk: DEFAULT_MAX_CHUNK,
            max_input_len: DEFAULT_MAX_INPUT_LEN,
            printable: false,
            dictionary: Vec::new(),
        }
    }
}

impl MutatorConfig {
    /// Creates a new builder for fluent configuration.
    #[must_use]
    pub fn builder() -> MutatorConfigBuilder {
        MutatorConfigBuilder::new()
    }

    /// Output stays printable ASCII and grows slowly. Suited to text protocols.
    #[must_use]
    pub fn text() -> Self {
        Self {
            printable: true,
            max_growth: 32,
            ..Default::default()
        }
    }

    /// Large edits and generous growth. Suited to binary parsers.
    #[must_use]
    pub fn aggressive() -> Self {
        Self {
            max_growth: 4096,
            max_chunk: 256,
            ..Default::default()
        }
    }

    /// Path-segment flavoured dictionary for URL fuzzing.
    #[must_use]
    pub fn url_path() -> Self {
        Self {
            printable: true,
            dictionary: [&b".."[..], b"%2e", b"%2f", b"%00", b"/", b"//", b"?", b"#", b";"]
                .iter()
                .map(|token| token.to_vec())
                .collect(),
            ..Default::default()
        }
    }
}

/// Builder for [`MutatorConfig`].
#[derive(Debug, Clone, Default)]
pub struct MutatorConfigBuilder {
    config: MutatorConfig,
}

impl MutatorConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many bytes one call may add beyond the input length.
    #[must_use]
    pub fn max_growth(mut self, bytes: usize) -> Self {
        self.config.max_growth = bytes;
        self
    }

    /// Sets the longest range a single edit touches. Clamped to at least 1.
    #[must_use]
    pub fn max_chunk(mut self, bytes: usize) -> Self {
        self.config.max_chunk = bytes.max(1);
        self
    }

    /// Sets the longest accepted input.
    #[must_use]
    pub fn max_input_len(mut self, bytes: usize) -> Self {
        self.config.max_input_len = bytes;
        self
    }

    /// Enables or disables printable-only output.
    #[must_use]
    pub fn printable(mut self, printable: bool) -> Self {
        self.config.printable = printable;
        self
    }

    /// Adds a dictionary token. Empty tokens are ignored.
    #[must_use]
    pub fn token(mut self, token: impl Into<Vec<u8>>) -> Self {
        let token = token.into();
        if !token.is_empty() {
            self.config.dictionary.push(token);
        }
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> MutatorConfig {
        self.config
    }
}
