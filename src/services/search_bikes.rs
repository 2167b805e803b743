//! Search use case
//!
//! Active, reviewed listings filtered by name and brand, one page at a time.
//! Responses are cached under the request URI.

use std::sync::Arc;

use super::{store_failure, CachedPayload, FailurePolicy, GroupScope, PhotoEnricher, ResponseCache};
use crate::error::{ApiError, Result};
use crate::models::{BikeSummary, SearchBikesRequest, SearchResponse};
use crate::store::{BikeRepository, Filter, SUMMARY_FIELDS};

#[derive(Clone)]
pub struct SearchBikes {
    store: Arc<dyn BikeRepository>,
    enricher: Arc<PhotoEnricher>,
    cache: Arc<ResponseCache>,
}

impl SearchBikes {
    pub fn new(
        store: Arc<dyn BikeRepository>,
        enricher: Arc<PhotoEnricher>,
        cache: Arc<ResponseCache>,
    ) -> Self {
        Self {
            store,
            enricher,
            cache,
        }
    }

    /// # Arguments
    /// * `request` - Validated search parameters
    /// * `cache_key` - Full request URI
    pub async fn execute(
        &self,
        request: &SearchBikesRequest,
        cache_key: &str,
    ) -> Result<Arc<SearchResponse>> {
        let key = cache_key.to_string();
        if let Some(CachedPayload::Search(hit)) = self.cache.get_cached(&key) {
            tracing::debug!(key = %key, "Search served from cache");
            return Ok(hit);
        }
        tracing::debug!(key = %key, "Search cache miss");

        let bikes = self
            .store
            .find_many(
                &search_filter(request),
                SUMMARY_FIELDS,
                request.skip(),
                request.limit(),
            )
            .await
            .map_err(|e| store_failure(e, ApiError::BikesNotFound))?;

        if bikes.is_empty() {
            return Err(ApiError::BikesNotFound);
        }

        let summaries: Vec<BikeSummary> = bikes.into_iter().map(BikeSummary::from).collect();
        let data = self
            .enricher
            .enrich(summaries, GroupScope::First, FailurePolicy::DropListing)
            .await;

        let total = data.len() as i64;
        let response = Arc::new(SearchResponse::new(data, total));
        self.cache
            .set_cached(key, CachedPayload::Search(Arc::clone(&response)));

        Ok(response)
    }
}

fn search_filter(request: &SearchBikesRequest) -> Filter {
    let mut filter = Filter::new().eq("active", true).eq("reviewed", true);
    if !request.name.is_empty() {
        filter = filter.contains("full_name", &request.name);
    }
    if !request.brand.is_empty() {
        filter = filter.contains("brand", &request.brand);
    }
    filter
}
