//! API Handlers
//!
//! HTTP request handlers for each catalog endpoint.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::{header, Uri},
    response::IntoResponse,
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::cache::{CacheStore, StoreCacheRepository};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    validate_hash_byke, BikeResponse, ClearResponse, HealthResponse, NamesResponse,
    SearchBikesQuery, SearchResponse, StatsResponse, SuggestNamesQuery,
};
use crate::presign::{PresignedUrlRepository, Presigner};
use crate::services::{Application, CachedPayload, PhotoEnricher};
use crate::store::BikeRepository;
use crate::telemetry;

/// Application state shared across all handlers.
///
/// The cache store is the single shared instance the services write through;
/// the state keeps a handle to it for the stats and metrics endpoints.
#[derive(Clone)]
pub struct AppState {
    pub application: Arc<Application>,
    pub cache: Arc<CacheStore<String, CachedPayload>>,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(
        application: Application,
        cache: Arc<CacheStore<String, CachedPayload>>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            application: Arc::new(application),
            cache,
            metrics,
        }
    }

    /// Wires the cache, enricher and services from configuration.
    ///
    /// # Arguments
    /// * `config` - Cache and presign settings
    /// * `store` - Catalog backend
    /// * `presigner` - Photo link issuer
    pub fn from_config(
        config: &Config,
        store: Arc<dyn BikeRepository>,
        presigner: Arc<dyn Presigner>,
    ) -> Self {
        let cache = Arc::new(CacheStore::new(config.cache_capacity, config.cache_ttl()));
        let urls = PresignedUrlRepository::new(
            presigner,
            config.presign_namespace.clone(),
            config.presign_lifetime(),
        );
        let enricher = PhotoEnricher::new(
            urls,
            config.presign_concurrency,
            config.presign_timeout(),
        );
        let application = Application::new(
            store,
            enricher,
            Arc::new(StoreCacheRepository::new(Arc::clone(&cache))),
        );

        Self::new(application, cache, telemetry::install())
    }
}

// Cache key for a request: path plus raw query string.
fn cache_key(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Handler for GET /search
pub async fn search_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: std::result::Result<Query<SearchBikesQuery>, QueryRejection>,
) -> Result<Json<Arc<SearchResponse>>> {
    let Query(query) = query.map_err(|e| ApiError::InvalidQueryParams(e.body_text()))?;
    let request = query.validate()?;

    let response = state
        .application
        .search_bikes
        .execute(&request, &cache_key(&uri))
        .await?;

    Ok(Json(response))
}

/// Handler for GET /byke/:hash_byke
pub async fn get_bike_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<Arc<BikeResponse>>> {
    let Path(hash_byke) = path.map_err(|_| ApiError::InvalidPathParam)?;
    let hash_byke = validate_hash_byke(&hash_byke)?;

    let response = state
        .application
        .get_bike
        .execute(hash_byke, &cache_key(&uri))
        .await?;

    Ok(Json(response))
}

/// Handler for GET /placeholder
pub async fn suggest_names_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<SuggestNamesQuery>, QueryRejection>,
) -> Result<Json<NamesResponse>> {
    let Query(query) = query.map_err(|e| ApiError::InvalidQueryParams(e.body_text()))?;
    let name = query.validate()?;

    let response = state.application.suggest_names.execute(&name).await?;

    Ok(Json(response))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();

    Json(StatsResponse::new(
        &stats,
        state.cache.capacity(),
        state.cache.ttl().as_secs(),
    ))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.cache.len();
    state.application.clear_cache();
    tracing::info!(removed, "Response cache cleared");

    Json(ClearResponse::cleared(removed))
}

/// Handler for GET /metrics
///
/// Prometheus text exposition of request and cache counters.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    telemetry::record_cache(&state.cache.stats(), state.cache.capacity());

    ([(header::CONTENT_TYPE, telemetry::CONTENT_TYPE)], state.metrics.render())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
