//! Bikes Compass - motorcycle catalog search API
//!
//! Serves paged search and single-listing lookups over a document store,
//! attaches presigned photo links, and caches responses with LRU eviction
//! and TTL expiration.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod presign;
pub mod services;
pub mod store;
pub mod telemetry;

pub use api::{create_router, AppState};
pub use config::Config;
