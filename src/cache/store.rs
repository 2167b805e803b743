//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Store State ==
/// Everything guarded by the store lock.
///
/// Invariant: every key in `entries` appears exactly once in `lru` and vice versa.
struct StoreState<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    lru: LruTracker<K>,
    stats: CacheStats,
}

// == Cache Store ==
/// Bounded in-memory cache with LRU eviction and a fixed per-entry TTL.
///
/// All operations take one lock, including `get` (it reorders recency), and
/// never hold it across an await point. Expiry is lazy: an expired entry is
/// only dropped when it is read or when it falls off the LRU tail.
///
/// Values are handed out by `Clone`; store `Arc`-backed values to avoid
/// copying large payloads.
pub struct CacheStore<K, V> {
    state: Mutex<StoreState<K, V>>,
    capacity: usize,
    ttl: Duration,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and TTL.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold
    /// * `ttl` - Age after which an entry is treated as absent
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            state: Mutex::new(StoreState {
                entries: HashMap::with_capacity(capacity),
                lru: LruTracker::with_capacity(capacity),
                stats: CacheStats::new(),
            }),
            capacity,
            ttl,
        }
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// An expired entry is removed on the spot and reported as a miss.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let Some(entry) = state.entries.get(key) else {
            state.stats.record_miss();
            return None;
        };

        let node = entry.node;
        if entry.is_expired(self.ttl) {
            state.entries.remove(key);
            state.lru.remove(node);
            state.stats.record_expiration();
            state.stats.set_total_entries(state.entries.len());
            return None;
        }

        let value = entry.value.clone();
        state.lru.touch(node);
        state.stats.record_hit();
        Some(value)
    }

    // == Set ==
    /// Stores a value under `key`.
    ///
    /// Overwriting an existing key replaces its value, resets its age and
    /// promotes it without consuming a slot. Inserting a new key into a full
    /// cache evicts the least recently used entry first. A zero-capacity
    /// cache stores nothing.
    pub fn set(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }

        let mut guard = self.state.lock();
        let state = &mut *guard;

        if let Some(entry) = state.entries.get_mut(&key) {
            entry.refresh(value);
            state.lru.touch(entry.node);
            return;
        }

        if state.entries.len() >= self.capacity {
            if let Some(evicted_key) = state.lru.evict_oldest() {
                state.entries.remove(&evicted_key);
                state.stats.record_eviction();
            }
        }

        let node = state.lru.push_front(key.clone());
        state.entries.insert(key, CacheEntry::new(value, node));
        state.stats.set_total_entries(state.entries.len());
    }

    // == Clear ==
    /// Drops every entry and all recency state in one critical section.
    pub fn clear(&self) {
        let mut guard = self.state.lock();
        guard.entries.clear();
        guard.lru.clear();
        guard.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let guard = self.state.lock();
        let mut stats = guard.stats.clone();
        stats.set_total_entries(guard.entries.len());
        stats
    }

    // == Length ==
    /// Returns the number of stored entries, expired-but-unread ones included.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Keys ordered from most to least recently used.
    #[cfg(test)]
    pub(crate) fn recency(&self) -> Vec<K> {
        self.state.lock().lru.iter().cloned().collect()
    }
}

impl<K, V> fmt::Debug for CacheStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("len", &self.state.lock().entries.len())
            .finish()
    }
}
