//! API Routes
//!
//! Configures the Axum router with all catalog endpoints.

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_cache_handler, get_bike_handler, health_handler, metrics_handler, search_handler,
    stats_handler, suggest_names_handler, AppState,
};
use crate::telemetry;

pub const API_PREFIX: &str = "/api/v1/bikes";

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/v1/bikes/search` - Paged search by name and brand
/// - `GET /api/v1/bikes/byke/:hash_byke` - Single listing
/// - `GET /api/v1/bikes/placeholder` - Name suggestions
/// - `GET /api/v1/bikes/health` - Health check endpoint
/// - `GET /api/v1/bikes/cache/stats` - Cache statistics
/// - `DELETE /api/v1/bikes/cache` - Drop every cached response
/// - `GET /api/v1/bikes/metrics` - Prometheus metrics
///
/// # Middleware
/// - Request counter: Feeds `bikes_compass_http_requests_total`
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let bikes = Router::new()
        .route("/search", get(search_handler))
        .route("/byke/:hash_byke", get(get_bike_handler))
        .route("/placeholder", get(suggest_names_handler))
        .route("/health", get(health_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .nest(API_PREFIX, bikes)
        .layer(middleware::from_fn(telemetry::track_requests))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
