//! Run configuration and validation

use crate::cache::CacheKind;
use crate::error::{Error, Result};

/// Default base seed for per-worker random sources
///
/// Worker `i` seeds its generator with `base_seed + i`, giving every
/// worker a distinct, reproducible stream. The base is not CLI surface;
/// tests override it through [`BenchConfig`].
pub const DEFAULT_BASE_SEED: u64 = 0x5ca1ab1e;

/// Benchmark run configuration
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Cache implementation under test
    pub cache: CacheKind,
    /// Number of worker threads
    pub threads: usize,
    /// Cache capacity in entries
    pub cache_size: usize,
    /// Number of distinct keys in the corpus
    pub demand_size: usize,
    /// Run duration in seconds; 0 selects live-reporting mode
    pub duration_secs: u64,
    /// Base seed for per-worker random sources
    pub base_seed: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            cache: CacheKind::Lru,
            threads: 4,
            cache_size: 100_000,
            demand_size: 1_000_000,
            duration_secs: 0,
            base_seed: DEFAULT_BASE_SEED,
        }
    }
}

impl BenchConfig {
    /// Validate configuration.
    ///
    /// Zero workers, a zero-capacity cache, or an empty corpus would make
    /// the run degenerate (there is nothing to draw or store), so all
    /// three are rejected before any worker starts. `duration_secs = 0`
    /// is valid and selects live mode.
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(Error::InvalidArgument {
                name: "threads",
                reason: "must be >= 1",
            });
        }
        if self.cache_size == 0 {
            return Err(Error::InvalidArgument {
                name: "cache-size",
                reason: "must be >= 1",
            });
        }
        if self.demand_size == 0 {
            return Err(Error::InvalidArgument {
                name: "demand-size",
                reason: "must be >= 1",
            });
        }
        Ok(())
    }

    /// True when the run is duration-bounded rather than live-reporting.
    pub fn is_duration_mode(&self) -> bool {
        self.duration_secs > 0
    }
}

// =============================================================================
// Tests
// =============================================================================
