//! Single listing lookup by `hash_byke`, cached under the request URI.

use std::sync::Arc;

use super::{store_failure, CachedPayload, FailurePolicy, GroupScope, PhotoEnricher, ResponseCache};
use crate::error::{ApiError, Result};
use crate::models::BikeResponse;
use crate::store::{BikeRepository, Filter, DETAIL_FIELDS};

#[derive(Clone)]
pub struct GetBike {
    store: Arc<dyn BikeRepository>,
    enricher: Arc<PhotoEnricher>,
    cache: Arc<ResponseCache>,
}

impl GetBike {
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

    pub async fn execute(&self, hash_byke: &str, cache_key: &str) -> Result<Arc<BikeResponse>> {
        let key = cache_key.to_string();
        if let Some(CachedPayload::Bike(hit)) = self.cache.get_cached(&key) {
            tracing::debug!(key = %key, "Byke served from cache");
            return Ok(hit);
        }
        tracing::debug!(key = %key, "Byke cache miss");

        let filter = Filter::new().eq("hash_byke", hash_byke);
        let bike = self
            .store
            .find_one(&filter, DETAIL_FIELDS)
            .await
            .map_err(|e| store_failure(e, ApiError::BikeNotFound(hash_byke.to_string())))?;

        // Failed photos keep an empty url; the listing is always returned.
        let bike = self
            .enricher
            .enrich(vec![bike], GroupScope::All, FailurePolicy::EmptyUrl)
            .await
            .pop()
            .ok_or_else(|| {
                ApiError::Unexpected(format!("byke {} lost during enrichment", hash_byke))
            })?;

        let response = Arc::new(BikeResponse::new(bike, 1));
        self.cache
            .set_cached(key, CachedPayload::Bike(Arc::clone(&response)));

        Ok(response)
    }
}
