use std::num::NonZeroUsize;

/// Minimum `print` count for which generation is split across workers.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 10_000;

/// How many workers the partitioner may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Workers {
    /// One worker per unit of available parallelism.
    #[default]
    Auto,
    /// Exactly this many workers.
    Fixed(NonZeroUsize),
}

impl Workers {
    /// Builds a worker setting from a command-line count, where `0` means
    /// auto-detect.
    ///
    /// # Example
    /// ```
    /// use rulegen::config::Workers;
    ///
    /// assert_eq!(Workers::from_count(0), Workers::Auto);
    /// assert_eq!(Workers::from_count(4).resolve(), 4);
    /// ```
    #[must_use]
    pub fn from_count(count: usize) -> Self {
        NonZeroUsize::new(count).map_or(Self::Auto, Self::Fixed)
    }

    /// Returns the concrete number of workers, at least one.
    #[must_use]
    pub fn resolve(self) -> usize {
        match self {
            Self::Auto => std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
            Self::Fixed(n) => n.get(),
        }
    }
}

/// Settings consumed by the generation engine.
///
/// ## Usage
///
/// ```
/// use rulegen::config::EngineConfig;
///
/// let config = EngineConfig { seed: Some(7),
///                             ..EngineConfig::default() };
///
/// assert!(config.materialize);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of workers used for large `print` statements.
    pub workers:            Workers,
    /// When `false`, values are generated but no output lines are produced.
    pub materialize:        bool,
    /// Minimum `print` count that engages the work partitioner.
    pub parallel_threshold: usize,
    /// Seed for the master random source; `None` seeds from the OS.
    pub seed:               Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { workers:            Workers::Auto,
               materialize:        true,
               parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
               seed:               None, }
    }
}
