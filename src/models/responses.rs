//! Response DTOs for the catalog API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::error::ErrorKind;
use crate::models::{Bike, BikeSummary};

/// Envelope for every successful data response.
///
/// # Fields
/// - `success`: Always `true`
/// - `data`: The payload
/// - `total`: Number of items in `data` (1 for single lookups)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseSuccess<T> {
    pub success: bool,
    pub data: T,
    pub total: i64,
}

impl<T> ResponseSuccess<T> {
    pub fn new(data: T, total: i64) -> Self {
        Self {
            success: true,
            data,
            total,
        }
    }
}

pub type SearchResponse = ResponseSuccess<Vec<BikeSummary>>;
pub type BikeResponse = ResponseSuccess<Bike>;
pub type NamesResponse = ResponseSuccess<Vec<String>>;

/// Response body for the stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    pub capacity: usize,
    pub ttl_secs: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a statistics snapshot
    pub fn new(stats: &CacheStats, capacity: usize, ttl_secs: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            capacity,
            ttl_secs,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
}

impl ClearResponse {
    pub fn cleared(removed: usize) -> Self {
        Self {
            success: true,
            message: format!("Cache cleared, {} entries removed", removed),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// HTTP status code
    pub code: u16,
    pub kind: ErrorKind,
    /// Machine-readable error code
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(
        code: u16,
        kind: ErrorKind,
        error: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            code,
            kind,
            error: error.into(),
            message: message.into(),
        }
    }
}
