//! Cache implementations under test
//!
//! The harness drives whichever implementation the command line selects
//! through the narrow [`ConcurrentCache`] contract. Two variants ship
//! in-crate, built on a shared single-threaded LRU core:
//!
//! ```text
//! ConcurrentCache<K, V>          (contract: lookup / insert / len / capacity)
//!        │
//!        ├── LruCache            one mutex around a single LruCore
//!        └── ShardedCache        SHARD_COUNT independently locked LruCores
//! ```
//!
//! The contract deliberately says nothing about eviction policy, locking,
//! or hashing; those belong to the implementation being measured.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::Error;

mod lru;
mod proptest;
mod sharded;

pub use lru::{LruCache, LruCore};
pub use sharded::ShardedCache;

// =============================================================================
// Constants
// =============================================================================

/// Number of shards in [`ShardedCache`] (power of two)
pub const SHARD_COUNT: usize = 64;

// =============================================================================
// Contract
// =============================================================================

/// Capability contract the harness requires of a cache
///
/// One instance is shared by reference across all worker threads; both
/// mutating operations take `&self` and must be safe to call concurrently
/// with each other. Operations are total: they never fail, they only
/// report hit or miss and evict as needed.
pub trait ConcurrentCache<K, V>: Send + Sync {
    /// Look up `key`, returning a copy of the stored value on hit.
    ///
    /// A hit refreshes the entry's recency.
    fn lookup(&self, key: &K) -> Option<V>;

    /// Insert or update an entry, evicting to respect the capacity bound.
    fn insert(&self, key: K, value: V);

    /// Number of resident entries.
    fn len(&self) -> usize;

    /// True when no entries are resident.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacity bound in entries.
    fn capacity(&self) -> usize;
}

// =============================================================================
// Kind selector
// =============================================================================

/// Cache implementation selector, as named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheKind {
    /// Single-lock LRU cache
    Lru,
    /// Hash-sharded LRU cache with per-shard locking
    Scalable,
}

impl CacheKind {
    /// Canonical token for this kind, as accepted by the CLI and printed
    /// in the summary row.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Lru => "lru",
            CacheKind::Scalable => "scalable",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "lru" => Ok(CacheKind::Lru),
            "scalable" => Ok(CacheKind::Scalable),
            other => Err(Error::UnknownCacheType(other.to_string())),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
