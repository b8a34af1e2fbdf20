//! Hash-sharded LRU cache
//!
//! # Design
//!
//! - Fixed power-of-two shard array; a key's shard is its hash masked
//!   with `shard_count - 1`, so selection is one hash and one AND.
//! - Each shard is an independent [`LruCore`] behind its own mutex;
//!   recency is tracked per shard, never globally. Requests to different
//!   shards never contend.
//! - The requested capacity is split as `ceil(capacity / shard_count)`
//!   per shard (minimum one entry), so the enforced bound can exceed the
//!   requested capacity by up to one entry per shard.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use parking_lot::Mutex;

use super::lru::LruCore;
use super::{ConcurrentCache, SHARD_COUNT};

/// One independently locked LRU segment
///
/// Aligned to a cache line so neighboring shard locks do not false-share.
#[repr(align(64))]
struct Shard<K, V> {
    core: Mutex<LruCore<K, V>>,
}

/// Thread-safe sharded LRU cache
///
/// The `scalable` variant on the command line.
pub struct ShardedCache<K, V> {
    shards: Vec<Shard<K, V>>,
    mask: usize,
    shard_capacity: usize,
}

impl<K, V> ShardedCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a cache of [`SHARD_COUNT`] shards bounded to roughly
    /// `capacity` entries in total.
    pub fn new(capacity: usize) -> Self {
        Self::with_shards(capacity, SHARD_COUNT)
    }

    /// Create a cache with an explicit shard count, rounded up to a power
    /// of two.
    pub fn with_shards(capacity: usize, shard_count: usize) -> Self {
        let count = shard_count.max(1).next_power_of_two();
        let shard_capacity = capacity.div_ceil(count).max(1);
        let shards = (0..count)
            .map(|_| Shard {
                core: Mutex::new(LruCore::new(shard_capacity)),
            })
            .collect();
        Self {
            shards,
            mask: count - 1,
            shard_capacity,
        }
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Capacity bound of each individual shard.
    pub fn shard_capacity(&self) -> usize {
        self.shard_capacity
    }

    /// Resident entry count per shard, in shard order.
    pub fn shard_lens(&self) -> Vec<usize> {
        self.shards
            .iter()
            .map(|shard| shard.core.lock().len())
            .collect()
    }

    #[inline]
    fn shard_index(&self, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) & self.mask
    }

    #[inline]
    fn shard(&self, key: &K) -> &Shard<K, V> {
        &self.shards[self.shard_index(key)]
    }
}

impl<K, V> ConcurrentCache<K, V> for ShardedCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn lookup(&self, key: &K) -> Option<V> {
        self.shard(key).core.lock().get(key).cloned()
    }

    fn insert(&self, key: K, value: V) {
        self.shard(&key).core.lock().insert(key, value);
    }

    fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.core.lock().len()).sum()
    }

    /// Enforced bound: `shard_count * shard_capacity`, which may exceed
    /// the requested capacity after per-shard rounding.
    fn capacity(&self) -> usize {
        self.shards.len() * self.shard_capacity
    }
}

// =============================================================================
// Tests
// =============================================================================
