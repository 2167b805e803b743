//! Prometheus metrics
//!
//! Request counts are recorded by a router middleware as they happen. Cache
//! counters are copied from the store's own statistics on every scrape.

use std::sync::OnceLock;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use telemetry_metrics::{counter, describe_counter, describe_gauge, gauge};

use crate::cache::CacheStats;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

pub const HTTP_REQUESTS_TOTAL: &str = "bikes_compass_http_requests_total";
pub const CACHE_HITS_TOTAL: &str = "bikes_compass_cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "bikes_compass_cache_misses_total";
pub const CACHE_EVICTIONS_TOTAL: &str = "bikes_compass_cache_evictions_total";
pub const CACHE_EXPIRATIONS_TOTAL: &str = "bikes_compass_cache_expirations_total";
pub const CACHE_ENTRIES: &str = "bikes_compass_cache_entries";
pub const CACHE_CAPACITY: &str = "bikes_compass_cache_capacity";

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the process-wide Prometheus recorder on first use and returns a
/// handle to it. Later calls share the same recorder.
pub fn install() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if telemetry_metrics::set_global_recorder(recorder).is_err() {
                tracing::warn!("Metrics recorder already installed elsewhere");
            }
            describe();
            handle
        })
        .clone()
}

fn describe() {
    describe_counter!(HTTP_REQUESTS_TOTAL, "HTTP requests served");
    describe_counter!(CACHE_HITS_TOTAL, "Response cache hits");
    describe_counter!(CACHE_MISSES_TOTAL, "Response cache misses");
    describe_counter!(CACHE_EVICTIONS_TOTAL, "Entries evicted to stay within capacity");
    describe_counter!(CACHE_EXPIRATIONS_TOTAL, "Entries dropped on read past their TTL");
    describe_gauge!(CACHE_ENTRIES, "Entries currently held by the response cache");
    describe_gauge!(CACHE_CAPACITY, "Maximum entries the response cache holds");
}

/// Copies a cache statistics snapshot into the recorder.
pub fn record_cache(stats: &CacheStats, capacity: usize) {
    counter!(CACHE_HITS_TOTAL).absolute(stats.hits);
    counter!(CACHE_MISSES_TOTAL).absolute(stats.misses);
    counter!(CACHE_EVICTIONS_TOTAL).absolute(stats.evictions);
    counter!(CACHE_EXPIRATIONS_TOTAL).absolute(stats.expirations);
    gauge!(CACHE_ENTRIES).set(stats.total_entries as f64);
    gauge!(CACHE_CAPACITY).set(capacity as f64);
}

/// Middleware counting every response by method, route template and status.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method,
        "route" => route,
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);

    response
}
