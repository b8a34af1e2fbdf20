//! Property-Based Tests for the Cache Implementations
//!
//! Uses proptest to verify LRU semantics against a naive reference model
//! across arbitrary operation sequences.
//!
//! # Test Properties
//!
//! 1. **Model Equivalence**: `LruCore` agrees with a brute-force LRU on
//!    every lookup result and on final eviction order
//! 2. **Capacity Bound**: resident entries never exceed capacity
//! 3. **Recency**: a just-inserted key is always a hit
//! 4. **Shard Bound**: the sharded cache respects its per-shard bounds

#![cfg(test)]

use proptest::prelude::*;

use super::lru::LruCore;
use super::sharded::ShardedCache;
use super::ConcurrentCache;

// =============================================================================
// Reference Model
// =============================================================================

/// Brute-force LRU: a Vec ordered most to least recently used.
struct ModelLru {
    entries: Vec<(u8, u64)>,
    capacity: usize,
}

impl ModelLru {
    fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    fn get(&mut self, key: u8) -> Option<u64> {
        let pos = self.entries.iter().position(|&(k, _)| k == key)?;
        let entry = self.entries.remove(pos);
        let value = entry.1;
        self.entries.insert(0, entry);
        Some(value)
    }

    fn insert(&mut self, key: u8, value: u64) {
        if self.capacity == 0 {
            return;
        }
        if let Some(pos) = self.entries.iter().position(|&(k, _)| k == key) {
            self.entries.remove(pos);
        } else if self.entries.len() == self.capacity {
            self.entries.pop();
        }
        self.entries.insert(0, (key, value));
    }

    fn pop_lru(&mut self) -> Option<(u8, u64)> {
        self.entries.pop()
    }
}

// =============================================================================
// Property Strategies
// =============================================================================

/// One cache operation over a deliberately small key space, so sequences
/// revisit keys often enough to exercise promotion and eviction.
#[derive(Debug, Clone)]
enum Op {
    Get(u8),
    Insert(u8, u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..16).prop_map(Op::Get),
        (0u8..16, any::<u64>()).prop_map(|(k, v)| Op::Insert(k, v)),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 1..200)
}

// =============================================================================
// LRU Core Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: LruCore agrees with the brute-force model on every
    /// lookup and on the final least-to-most-recent drain order.
    #[test]
    fn prop_lru_matches_model(capacity in 1usize..8, ops in ops_strategy()) {
        let mut cache = LruCore::new(capacity);
        let mut model = ModelLru::new(capacity);

        for op in &ops {
            match *op {
                Op::Get(key) => {
                    let got = cache.get(&key).copied();
                    let expected = model.get(key);
                    prop_assert_eq!(got, expected, "lookup diverged for key={}", key);
                }
                Op::Insert(key, value) => {
                    cache.insert(key, value);
                    model.insert(key, value);
                }
            }
        }

        prop_assert_eq!(cache.len(), model.entries.len());
        loop {
            let got = cache.pop_lru();
            let expected = model.pop_lru();
            prop_assert_eq!(got, expected, "drain order diverged");
            if expected.is_none() {
                break;
            }
        }
    }

    /// Property: resident entries never exceed capacity, including the
    /// zero-capacity case.
    #[test]
    fn prop_len_bounded(capacity in 0usize..16, ops in ops_strategy()) {
        let mut cache = LruCore::new(capacity);
        for op in ops {
            match op {
                Op::Get(key) => {
                    cache.get(&key);
                }
                Op::Insert(key, value) => {
                    cache.insert(key, value);
                }
            }
            prop_assert!(cache.len() <= capacity);
        }
    }

    /// Property: the key written last is always resident.
    #[test]
    fn prop_last_insert_is_hit(
        capacity in 1usize..64,
        ops in ops_strategy(),
        key in 0u8..16,
        value in any::<u64>(),
    ) {
        let mut cache = LruCore::new(capacity);
        for op in ops {
            match op {
                Op::Get(k) => {
                    cache.get(&k);
                }
                Op::Insert(k, v) => {
                    cache.insert(k, v);
                }
            }
        }
        cache.insert(key, value);
        prop_assert_eq!(cache.get(&key), Some(&value));
    }
}

// =============================================================================
// Sharded Cache Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: total and per-shard occupancy stay within the enforced
    /// bounds for any insert sequence.
    #[test]
    fn prop_sharded_bounds(
        capacity in 1usize..128,
        shard_count in 1usize..8,
        keys in prop::collection::vec(any::<u16>(), 1..500),
    ) {
        let cache = ShardedCache::with_shards(capacity, shard_count);
        for (i, key) in keys.iter().enumerate() {
            cache.insert(*key, i as u64);
            prop_assert!(cache.len() <= cache.capacity());
        }
        for len in cache.shard_lens() {
            prop_assert!(len <= cache.shard_capacity());
        }
    }

    /// Property: shard selection is deterministic, so the same insert
    /// sequence always leaves the same occupancy.
    #[test]
    fn prop_sharded_deterministic(
        keys in prop::collection::vec(any::<u16>(), 1..300),
    ) {
        let a = ShardedCache::with_shards(32, 4);
        let b = ShardedCache::with_shards(32, 4);
        for (i, key) in keys.iter().enumerate() {
            a.insert(*key, i as u64);
            b.insert(*key, i as u64);
        }
        prop_assert_eq!(a.len(), b.len());
        prop_assert_eq!(a.shard_lens(), b.shard_lens());
    }
}
