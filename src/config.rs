//! Configuration for signature compilation and matching.
//!
//! Two concerns are configurable: the resource limits applied when a
//! signature's regex patterns are compiled, and how the engine spreads
//! matching work across threads. Neither changes which signatures match.

/// Limits applied to every regex pattern when a signature is built.
///
/// The values are forwarded to `regex::bytes::RegexBuilder`. A pattern that
/// exceeds them fails to compile and the whole signature is rejected.
///
/// # Examples
///
/// ```rust
/// use sigolyze::RegexConfig;
///
/// let strict = RegexConfig {
///     size_limit: 1024 * 1024,
///     ..Default::default()
/// };
/// assert_eq!(strict.nest_limit, 250);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexConfig {
    /// Approximate upper bound, in bytes, on the compiled program size.
    ///
    /// **Default**: 10MB
    pub size_limit: usize,

    /// Upper bound, in bytes, on the lazy DFA cache of each regex.
    ///
    /// **Default**: 2MB
    pub dfa_size_limit: usize,

    /// Maximum nesting depth of the regex syntax tree.
    ///
    /// **Default**: 250
    pub nest_limit: u32,
}

impl Default for RegexConfig {
    fn default() -> Self {
        Self {
            size_limit: 10 * (1 << 20),
            dfa_size_limit: 2 * (1 << 20),
            nest_limit: 250,
        }
    }
}

/// Configuration for parallel matching.
///
/// Parallel and sequential paths produce identical results in registry
/// order; these knobs only decide when rayon is worth its overhead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Evaluate the signatures of a single query in parallel.
    pub enable_signature_parallelism: bool,
    /// Minimum number of candidate signatures before a query goes parallel.
    pub min_signatures_for_parallelism: usize,
    /// Evaluate the inputs of a batch in parallel.
    pub enable_batch_parallelism: bool,
    /// Minimum batch size before a batch goes parallel.
    pub min_batch_size_for_parallelism: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enable_signature_parallelism: false,
            min_signatures_for_parallelism: 256,
            enable_batch_parallelism: true,
            min_batch_size_for_parallelism: 16,
        }
    }
}

impl ParallelConfig {
    pub(crate) fn parallel_signatures(&self, candidates: usize) -> bool {
        self.enable_signature_parallelism && candidates >= self.min_signatures_for_parallelism
    }

    pub(crate) fn parallel_batch(&self, inputs: usize) -> bool {
        self.enable_batch_parallelism && inputs >= self.min_batch_size_for_parallelism
    }
}

/// Complete engine configuration.
///
/// # Examples
///
/// ```rust
/// use sigolyze::EngineConfig;
///
/// // Defaults: sequential per-query matching, parallel batches
/// let config = EngineConfig::default();
/// assert!(!config.parallel.enable_signature_parallelism);
///
/// // Large signature sets on multi-core hosts
/// let config = EngineConfig::high_performance();
/// assert!(config.parallel.enable_signature_parallelism);
///
/// // Builder style
/// let config = EngineConfig::new()
///     .with_parallel_matching(true)
///     .with_min_signatures_for_parallelism(64)
///     .with_regex_size_limit(1 << 20);
/// assert_eq!(config.regex.size_limit, 1 << 20);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Regex compilation limits
    pub regex: RegexConfig,
    /// Parallel matching behavior
    pub parallel: ParallelConfig,
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration tuned for large signature sets.
    pub fn high_performance() -> Self {
        Self {
            parallel: ParallelConfig {
                enable_signature_parallelism: true,
                min_signatures_for_parallelism: 64,
                enable_batch_parallelism: true,
                min_batch_size_for_parallelism: 4,
            },
            ..Default::default()
        }
    }

    /// Create a single-threaded configuration with tight regex limits.
    ///
    /// Useful when debugging signatures: everything runs on the calling
    /// thread and oversized patterns are rejected early.
    pub fn development() -> Self {
        Self {
            regex: RegexConfig {
                size_limit: 1 << 20,
                dfa_size_limit: 1 << 20,
                nest_limit: 100,
            },
            parallel: ParallelConfig {
                enable_signature_parallelism: false,
                enable_batch_parallelism: false,
                ..Default::default()
            },
        }
    }

    // Builder methods for parallel configuration

    /// Enable or disable parallel evaluation of signatures within a query.
    pub fn with_parallel_matching(mut self, enable: bool) -> Self {
        self.parallel.enable_signature_parallelism = enable;
        self
    }

    /// Set the candidate count at which a query goes parallel.
    pub fn with_min_signatures_for_parallelism(mut self, min_signatures: usize) -> Self {
        self.parallel.min_signatures_for_parallelism = min_signatures;
        self
    }

    /// Enable or disable parallel evaluation across batch inputs.
    pub fn with_batch_parallelism(mut self, enable: bool) -> Self {
        self.parallel.enable_batch_parallelism = enable;
        self
    }

    /// Set the batch size at which a batch goes parallel.
    pub fn with_min_batch_size_for_parallelism(mut self, min_size: usize) -> Self {
        self.parallel.min_batch_size_for_parallelism = min_size;
        self
    }

    // Builder methods for regex configuration

    /// Set the compiled size limit for regex patterns.
    pub fn with_regex_size_limit(mut self, bytes: usize) -> Self {
        self.regex.size_limit = bytes;
        self
    }

    /// Set the lazy DFA cache limit for regex patterns.
    pub fn with_regex_dfa_size_limit(mut self, bytes: usize) -> Self {
        self.regex.dfa_size_limit = bytes;
        self
    }

    /// Set the syntax nesting limit for regex patterns.
    pub fn with_regex_nest_limit(mut self, limit: u32) -> Self {
        self.regex.nest_limit = limit;
        self
    }
}
