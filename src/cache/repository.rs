//! Cache Repository Module
//!
//! Named-operation facade the query services depend on instead of a concrete cache.

use std::hash::Hash;
use std::sync::Arc;

use crate::cache::CacheStore;

/// Capability the query services use for cache-aside lookups.
///
/// Implementations never fail; a miss is simply `None`.
pub trait CacheRepository<K, V>: Send + Sync {
    fn get_cached(&self, key: &K) -> Option<V>;
    fn set_cached(&self, key: K, value: V);
    fn clear_cache(&self);
}

// == Store Cache Repository ==
/// Pass-through [`CacheRepository`] over a shared [`CacheStore`].
#[derive(Debug)]
pub struct StoreCacheRepository<K, V> {
    store: Arc<CacheStore<K, V>>,
}

impl<K, V> StoreCacheRepository<K, V> {
    pub fn new(store: Arc<CacheStore<K, V>>) -> Self {
        Self { store }
    }
}

impl<K, V> CacheRepository<K, V> for StoreCacheRepository<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get_cached(&self, key: &K) -> Option<V> {
        self.store.get(key)
    }

    fn set_cached(&self, key: K, value: V) {
        self.store.set(key, value);
    }

    fn clear_cache(&self) {
        self.store.clear();
    }
}
