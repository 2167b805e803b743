//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A single cached value plus the bookkeeping the cache needs for it.
///
/// Entries never leave the cache; callers only ever see clones of `value`.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the value was inserted or last overwritten
    pub inserted_at: Instant,
    /// Slot of this key in the recency list
    pub(crate) node: usize,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub(crate) fn new(value: V, node: usize) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            node,
        }
    }

    // == Refresh ==
    /// Replaces the value and resets the age to zero.
    pub(crate) fn refresh(&mut self, value: V) {
        self.value = value;
        self.inserted_at = Instant::now();
    }

    // == Age ==
    /// Time elapsed since the entry was inserted or refreshed.
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.inserted_at)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry whose age is exactly `ttl` is still live;
    /// it expires only once the age is strictly greater.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }

    // == Time To Live ==
    /// Returns how long the entry has left before it expires.
    ///
    /// Returns `Duration::ZERO` once the entry is past its TTL.
    pub fn ttl_remaining(&self, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.age())
    }
}
