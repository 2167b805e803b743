//! Test doubles shared by the service tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::cache::{CacheStore, StoreCacheRepository};
use crate::models::{Bike, Photo};
use crate::presign::{PresignError, PresignedUrlRepository, Presigner};
use crate::services::{CachedPayload, PhotoEnricher};
use crate::store::{BikeRepository, Filter, MemoryBikeStore, StoreError};

pub const NAMESPACE: &str = "n8n_bikes";

// == Presigner ==
#[derive(Default)]
pub struct StubPresigner {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
}

impl StubPresigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every call whose stored key is `key`.
    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(format!("{}/{}", NAMESPACE, key));
        self
    }

    pub fn delayed(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(format!("{}/{}", NAMESPACE, key), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn url_for(key: &str) -> String {
        format!("https://photos.test/{}/{}", NAMESPACE, key)
    }
}

#[async_trait]
impl Presigner for StubPresigner {
    async fn presign(&self, object_key: &str, _lifetime: Duration) -> Result<String, PresignError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .delays
            .get(object_key)
            .copied()
            .unwrap_or(Duration::from_millis(10));
        tokio::time::sleep(delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(object_key) {
            return Err(PresignError::Signer(format!("refused {}", object_key)));
        }
        Ok(format!("https://photos.test/{}", object_key))
    }
}

// == Store ==
pub struct CountingStore {
    inner: MemoryBikeStore,
    queries: AtomicUsize,
    failure: Option<StoreError>,
    last_query: Mutex<Option<(Filter, Vec<String>, u64, u64)>>,
}

impl CountingStore {
    pub fn new(documents: Vec<Value>) -> Self {
        Self {
            inner: MemoryBikeStore::from_documents(documents).unwrap(),
            queries: AtomicUsize::new(0),
            failure: None,
            last_query: Mutex::new(None),
        }
    }

    pub fn failing(error: StoreError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new(Vec::new())
        }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Filter, projection, skip and limit of the most recent query.
    pub fn last_query(&self) -> Option<(Filter, Vec<String>, u64, u64)> {
        self.last_query.lock().clone()
    }

    fn record(&self, filter: &Filter, projection: &[&str], skip: u64, limit: u64) {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let projection = projection.iter().map(|f| f.to_string()).collect();
        *self.last_query.lock() = Some((filter.clone(), projection, skip, limit));
    }
}

#[async_trait]
impl BikeRepository for CountingStore {
    async fn find_many(
        &self,
        filter: &Filter,
        projection: &[&str],
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Bike>, StoreError> {
        self.record(filter, projection, skip, limit);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.inner.find_many(filter, projection, skip, limit).await
    }

    async fn find_one(&self, filter: &Filter, projection: &[&str]) -> Result<Bike, StoreError> {
        self.record(filter, projection, 0, 1);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.inner.find_one(filter, projection).await
    }
}

// == Fixtures ==
pub fn bike_document(hash: &str, name: &str, photo_groups: &[&[&str]]) -> Value {
    let photos: Vec<Vec<Value>> = photo_groups
        .iter()
        .map(|group| {
            group
                .iter()
                .map(|key| json!({"url": "", "key": key, "width": 800, "height": 600}))
                .collect()
        })
        .collect();

    json!({
        "ref": format!("REF-{}", hash),
        "hash_byke": hash,
        "full_name": name,
        "brand": name.split_whitespace().next().unwrap_or_default(),
        "year_model": 2022,
        "km": 1000,
        "price": 20_000_000,
        "location": "Bogota",
        "date_publish": 1_700_000_000,
        "torque": "37 Nm",
        "active": true,
        "reviewed": true,
        "photos": photos,
    })
}

pub fn bike_with_keys(groups: &[&[&str]]) -> Bike {
    Bike {
        photos: groups
            .iter()
            .map(|g| g.iter().map(|k| Photo::new(*k, 800, 600)).collect())
            .collect(),
        ..Default::default()
    }
}

pub fn enricher(
    presigner: Arc<StubPresigner>,
    concurrency: usize,
    timeout: Duration,
) -> PhotoEnricher {
    let urls = PresignedUrlRepository::new(presigner, NAMESPACE, Duration::from_secs(900));
    PhotoEnricher::new(urls, concurrency, timeout)
}

pub fn cache(capacity: usize) -> (
    Arc<CacheStore<String, CachedPayload>>,
    Arc<StoreCacheRepository<String, CachedPayload>>,
) {
    let store = Arc::new(CacheStore::new(capacity, Duration::from_secs(5400)));
    let repo = Arc::new(StoreCacheRepository::new(Arc::clone(&store)));
    (store, repo)
}
