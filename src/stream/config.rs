//! Construction-time parameters for fuzz streams.

/// Construction parameters shared by [`MutatingStream`] and [`SafeTokenStream`].
///
/// | Field | Default | Meaning |
/// |-------|---------|---------|
/// | `seed` | `None` | Seed for the default engine; `None` means non-deterministic |
/// | `offset` | `0` | Engine stream selector; also added to the default mutation budget |
/// | `mutations` | `None` | Mutation budget per regeneration; `None` means `source.len() + offset` |
///
/// # Example
///
/// ```
/// use fuzz_stream::StreamConfig;
///
/// let config = StreamConfig::builder().seed(42).offset(3).build();
/// assert_eq!(config.mutation_budget(5), 8);
///
/// let capped = StreamConfig::builder().mutations(2).build();
/// assert_eq!(capped.mutation_budget(5), 2);
/// ```
///
/// [`MutatingStream`]: crate::MutatingStream
/// [`SafeTokenStream`]: crate::SafeTokenStream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StreamConfig {
    /// Seed for the engine's generator.
    pub seed: Option<u64>,
    /// Engine stream selector, added to the source length for the default budget.
    pub offset: usize,
    /// Explicit mutation budget. Only `None` selects the
    /// `source.len() + offset` default.
    ///
    /// `Some(0)` is honored as a budget of zero: the default engine then
    /// serves the source verbatim on every regeneration. It is not treated
    /// as "unset"; pass `None` for the default budget.
    pub mutations: Option<usize>,
}

impl StreamConfig {
    /// Unseeded configuration with every default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new builder for fluent configuration.
    #[must_use]
    pub fn builder() -> StreamConfigBuilder {
        StreamConfigBuilder::new()
    }

    /// Seeded configuration; everything else default.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Reproducible single-edit variants: seeded, one mutation per regeneration.
    #[must_use]
    pub fn gentle(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            mutations: Some(1),
            ..Self::default()
        }
    }

    /// Mutation budget for a source of `source_len` bytes.
    ///
    /// `mutations` if set, otherwise `source_len + offset` (saturating).
    #[must_use]
    pub fn mutation_budget(&self, source_len: usize) -> usize {
        self.mutations
            .unwrap_or_else(|| source_len.saturating_add(self.offset))
    }
}

/// Builder for [`StreamConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamConfigBuilder {
    config: StreamConfig,
}

impl StreamConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the engine seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Sets the engine offset.
    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.config.offset = offset;
        self
    }

    /// Sets an explicit mutation budget.
    #[must_use]
    pub fn mutations(mut self, mutations: usize) -> Self {
        self.config.mutations = Some(mutations);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> StreamConfig {
        self.config
    }
}
