//! Index builder configuration.

use std::path::PathBuf;
use std::time::Duration;

use super::closure::{BranchOverride, ClosureRule};

/// Configuration for building stop route indexes.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Directory for cached indexes. `None` disables the disk cache.
    pub cache_dir: Option<PathBuf>,

    /// Maximum number of line fetches issued concurrently.
    pub batch_size: usize,

    /// Time limit for a single fetch (seconds).
    pub fetch_timeout_secs: u64,

    /// Which stops are closed under the closure policy.
    pub closure_rule: ClosureRule,

    /// Manual branch topology fixes applied under the closure policy.
    pub overrides: Vec<BranchOverride>,
}

impl IndexConfig {
    /// Use `dir` for the disk cache.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Disable the disk cache.
    pub fn without_cache(mut self) -> Self {
        self.cache_dir = None;
        self
    }

    /// Set the per-fetch time limit.
    pub fn with_fetch_timeout(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    /// Returns the per-fetch time limit as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            cache_dir: Some(PathBuf::from("output")),
            batch_size: 8,
            fetch_timeout_secs: 30,
            closure_rule: ClosureRule::default(),
            overrides: BranchOverride::mbta_defaults(),
        }
    }
}
