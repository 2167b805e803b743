//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod repository;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use repository::{CacheRepository, StoreCacheRepository};
pub use stats::CacheStats;
pub use store::CacheStore;
