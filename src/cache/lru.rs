//! Single-lock LRU cache
//!
//! # Design
//!
//! - `LruCore`: single-threaded strict-LRU map. A `HashMap` resolves keys
//!   to slots in an entry arena; a doubly-linked recency list is threaded
//!   through the arena by index, so the hot paths stay free of unsafe
//!   pointer juggling. Vacated slots are recycled through a free list and
//!   the arena never grows past `capacity` slots.
//! - `LruCache`: `LruCore` behind one `parking_lot::Mutex`, satisfying the
//!   concurrent contract. Every operation takes the one lock; this is the
//!   baseline the sharded variant is measured against.

use std::collections::HashMap;
use std::hash::Hash;
use std::mem;

use parking_lot::Mutex;

use super::ConcurrentCache;

/// Sentinel index for absent links
const NIL: usize = usize::MAX;

/// Arena entry: key/value plus recency-list links
#[derive(Debug)]
struct Slot<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

/// Single-threaded strict-LRU map core
///
/// `head` is the most recently used entry, `tail` the least recently
/// used. `get` and updating `insert` promote the entry to `head`;
/// inserting at capacity evicts `tail`.
#[derive(Debug)]
pub struct LruCore<K, V> {
    map: HashMap<K, usize>,
    slots: Vec<Option<Slot<K, V>>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a core bounded to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            capacity,
        }
    }

    /// Number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no entries are resident.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Capacity bound in entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when `key` is resident. Does not touch recency.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Look up `key` and promote it to most recently used.
    #[inline]
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.promote(idx);
        self.slots[idx].as_ref().map(|slot| &slot.value)
    }

    /// Look up `key` without touching recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.slots[idx].as_ref().map(|slot| &slot.value)
    }

    /// Insert or update an entry, returning the replaced value on update.
    ///
    /// Both paths leave the entry most recently used. Inserting a new key
    /// at capacity first evicts the least recently used entry. A
    /// zero-capacity core ignores inserts.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(&idx) = self.map.get(&key) {
            let old = self.slots[idx]
                .as_mut()
                .map(|slot| mem::replace(&mut slot.value, value));
            self.promote(idx);
            return old;
        }

        if self.map.len() == self.capacity {
            self.pop_lru();
        }

        let slot = Some(Slot {
            key: key.clone(),
            value,
            prev: NIL,
            next: NIL,
        });
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };
        self.attach_front(idx);
        self.map.insert(key, idx);
        None
    }

    /// Remove and return the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let idx = self.tail;
        if idx == NIL {
            return None;
        }
        self.detach(idx);
        let slot = self.slots[idx].take()?;
        self.map.remove(&slot.key);
        self.free.push(idx);
        Some((slot.key, slot.value))
    }

    /// Drop all entries, keeping the capacity bound.
    pub fn clear(&mut self) {
        self.map.clear();
        self.slots.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    fn links(&self, idx: usize) -> (usize, usize) {
        match &self.slots[idx] {
            Some(slot) => (slot.prev, slot.next),
            None => (NIL, NIL),
        }
    }

    fn set_prev(&mut self, idx: usize, prev: usize) {
        if let Some(slot) = self.slots[idx].as_mut() {
            slot.prev = prev;
        }
    }

    fn set_next(&mut self, idx: usize, next: usize) {
        if let Some(slot) = self.slots[idx].as_mut() {
            slot.next = next;
        }
    }

    /// Unlink `idx` from the recency list.
    fn detach(&mut self, idx: usize) {
        let (prev, next) = self.links(idx);
        if prev == NIL {
            self.head = next;
        } else {
            self.set_next(prev, next);
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.set_prev(next, prev);
        }
    }

    /// Link `idx` in as the most recently used entry.
    fn attach_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(slot) = self.slots[idx].as_mut() {
            slot.prev = NIL;
            slot.next = old_head;
        }
        if old_head == NIL {
            self.tail = idx;
        } else {
            self.set_prev(old_head, idx);
        }
        self.head = idx;
    }

    #[inline]
    fn promote(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.detach(idx);
        self.attach_front(idx);
    }
}

/// Thread-safe LRU cache: one mutex around a [`LruCore`]
///
/// The `lru` variant on the command line.
#[derive(Debug)]
pub struct LruCache<K, V> {
    inner: Mutex<LruCore<K, V>>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a cache bounded to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LruCore::new(capacity)),
            capacity,
        }
    }
}

impl<K, V> ConcurrentCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn lookup(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    fn insert(&self, key: K, value: V) {
        self.inner.lock().insert(key, value);
    }

    fn len(&self) -> usize {
        self.inner.lock().len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

// =============================================================================
// Tests
// =============================================================================
