//! API Module
//!
//! HTTP handlers and routing for the catalog REST API.
//!
//! # Endpoints
//! All under `/api/v1/bikes`:
//! - `GET /search` - Paged search, cached
//! - `GET /byke/:hash_byke` - Single listing, cached
//! - `GET /placeholder` - Up to five name suggestions
//! - `GET /health` - Health check endpoint
//! - `GET /cache/stats` - Cache statistics
//! - `DELETE /cache` - Clear the response cache
//! - `GET /metrics` - Prometheus metrics

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, API_PREFIX};
