//! Services Module
//!
//! Query use cases: cache-aside search and lookup with photo enrichment, and
//! name suggestions.

mod enrichment;
mod get_bike;
mod search_bikes;
mod suggest_names;

#[cfg(test)]
pub(crate) mod testing;

pub use enrichment::{FailurePolicy, GroupScope, PhotoEnricher};
pub use get_bike::GetBike;
pub use search_bikes::SearchBikes;
pub use suggest_names::SuggestNames;

use std::sync::Arc;

use crate::cache::CacheRepository;
use crate::error::ApiError;
use crate::models::{BikeResponse, SearchResponse};
use crate::store::{BikeRepository, StoreError};

/// Value type of the shared response cache. One cache serves both shapes;
/// a lookup that finds the other shape is a miss.
#[derive(Debug, Clone)]
pub enum CachedPayload {
    Search(Arc<SearchResponse>),
    Bike(Arc<BikeResponse>),
}

pub type ResponseCache = dyn CacheRepository<String, CachedPayload>;

/// All query services, wired to the same store, enricher and cache.
#[derive(Clone)]
pub struct Application {
    pub search_bikes: SearchBikes,
    pub get_bike: GetBike,
    pub suggest_names: SuggestNames,
    cache: Arc<ResponseCache>,
}

impl Application {
    pub fn new(
        store: Arc<dyn BikeRepository>,
        enricher: PhotoEnricher,
        cache: Arc<ResponseCache>,
    ) -> Self {
        let enricher = Arc::new(enricher);
        Self {
            search_bikes: SearchBikes::new(
                Arc::clone(&store),
                Arc::clone(&enricher),
                Arc::clone(&cache),
            ),
            get_bike: GetBike::new(Arc::clone(&store), enricher, Arc::clone(&cache)),
            suggest_names: SuggestNames::new(store),
            cache,
        }
    }

    /// Drops every cached response.
    pub fn clear_cache(&self) {
        self.cache.clear_cache();
    }
}

/// Maps a store failure to its API error; `not_found` is used for [`StoreError::NotFound`].
fn store_failure(err: StoreError, not_found: ApiError) -> ApiError {
    match err {
        StoreError::NotFound => not_found,
        StoreError::Decode(msg) => {
            tracing::error!(error = %msg, "Stored document could not be decoded");
            ApiError::Decode(msg)
        }
        StoreError::Query(msg) | StoreError::Connection(msg) => {
            tracing::error!(error = %msg, "Store query failed");
            ApiError::StoreQuery(msg)
        }
    }
}
