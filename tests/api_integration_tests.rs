//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle against the bundled catalog.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bikes_compass::{
    api::create_router,
    models::Bike,
    presign::{PresignError, Presigner},
    store::{BikeRepository, Filter, MemoryBikeStore, StoreError},
    AppState, Config,
};
use serde_json::Value;
use tower::ServiceExt;

const CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalog.json");

// == Test Doubles ==

struct CountingStore {
    inner: MemoryBikeStore,
    queries: AtomicUsize,
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
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find_many(filter, projection, skip, limit).await
    }

    async fn find_one(&self, filter: &Filter, projection: &[&str]) -> Result<Bike, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find_one(filter, projection).await
    }
}

#[derive(Default)]
struct CountingPresigner {
    calls: AtomicUsize,
    failing: HashSet<String>,
}

#[async_trait]
impl Presigner for CountingPresigner {
    async fn presign(&self, object_key: &str, lifetime: Duration) -> Result<String, PresignError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(object_key) {
            return Err(PresignError::Signer("bucket unavailable".to_string()));
        }
        Ok(format!(
            "https://photos.test/{}?ttl={}",
            object_key,
            lifetime.as_secs()
        ))
    }
}

// == Helper Functions ==

struct TestApp {
    router: Router,
    store: Arc<CountingStore>,
    presigner: Arc<CountingPresigner>,
}

impl TestApp {
    fn new() -> Self {
        Self::with(Config::default(), &[])
    }

    /// `failing` lists stored photo keys whose presign call fails.
    fn with(config: Config, failing: &[&str]) -> Self {
        let documents: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(CATALOG).unwrap()).unwrap();
        let store = Arc::new(CountingStore {
            inner: MemoryBikeStore::from_documents(documents).unwrap(),
            queries: AtomicUsize::new(0),
        });
        let presigner = Arc::new(CountingPresigner {
            calls: AtomicUsize::new(0),
            failing: failing
                .iter()
                .map(|key| format!("{}/{}", config.presign_namespace, key))
                .collect(),
        });

        let state = AppState::from_config(&config, store.clone(), presigner.clone());
        Self {
            router: create_router(state),
            store,
            presigner,
        }
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri).await
    }

    async fn send(&self, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        (status, body_to_json(response.into_body()).await)
    }

    fn queries(&self) -> usize {
        self.store.queries.load(Ordering::SeqCst)
    }

    fn presign_calls(&self) -> usize {
        self.presigner.calls.load(Ordering::SeqCst)
    }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn hashes(json: &Value) -> Vec<&str> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["hash_byke"].as_str().unwrap())
        .collect()
}

// == Search Endpoint Tests ==

#[tokio::test]
async fn test_search_cache_aside_round_trip() {
    let app = TestApp::new();

    let (status, first) = app.get("/api/v1/bikes/search?name=ktm").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["total"], 2);
    assert_eq!(app.queries(), 1);
    // Two listings, two photos in each first group.
    assert_eq!(app.presign_calls(), 4);

    let (status, second) = app.get("/api/v1/bikes/search?name=ktm").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.queries(), 1);
    assert_eq!(app.presign_calls(), 4);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_search_serves_summary_with_links() {
    let app = TestApp::new();

    let (_, json) = app.get("/api/v1/bikes/search?name=adventure").await;

    let bike = &json["data"][0];
    assert_eq!(bike["hash_byke"], "e5ab3310");
    assert_eq!(bike["ref"], "BC-1005");
    assert_eq!(bike["km"], 8900);
    assert!(bike.get("torque").is_none());
    assert_eq!(bike["photos"].as_array().unwrap().len(), 1);
    assert_eq!(
        bike["photos"][0][0]["url"],
        "https://photos.test/n8n_bikes/e5ab3310/1_1.jpg?ttl=900"
    );
}

#[tokio::test]
async fn test_distinct_query_strings_are_distinct_entries() {
    let app = TestApp::new();

    app.get("/api/v1/bikes/search?name=ktm").await;
    app.get("/api/v1/bikes/search?name=ktm&page=1").await;

    assert_eq!(app.queries(), 2);
}

#[tokio::test]
async fn test_search_only_active_and_reviewed() {
    let app = TestApp::new();

    let (status, json) = app.get("/api/v1/bikes/search").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 5);
    assert!(!hashes(&json).contains(&"f1c7d2a9"));

    let (status, json) = app.get("/api/v1/bikes/search?name=dominar").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "error_bikes_not_found");
}

#[tokio::test]
async fn test_search_brand_and_pagination() {
    let app = TestApp::new();

    let (_, json) = app.get("/api/v1/bikes/search?brand=YAMAHA").await;
    assert_eq!(hashes(&json), vec!["b81d44e0"]);

    let (_, json) = app.get("/api/v1/bikes/search?page=3&cant=2").await;
    assert_eq!(json["total"], 1);
    assert_eq!(hashes(&json), vec!["e5ab3310"]);
}

#[tokio::test]
async fn test_search_drops_listing_with_failed_photo() {
    let app = TestApp::with(Config::default(), &["7f3a9c21/1_2.jpg"]);

    let (status, json) = app.get("/api/v1/bikes/search?name=ktm").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 1);
    assert_eq!(hashes(&json), vec!["e5ab3310"]);
}

#[tokio::test]
async fn test_search_validation_never_reaches_store() {
    let app = TestApp::new();

    let cases = [
        ("/api/v1/bikes/search?page=-1", "error_invalid_page"),
        ("/api/v1/bikes/search?page=9223372036854775807", "error_invalid_page"),
        ("/api/v1/bikes/search?cant=31", "error_invalid_cant"),
        ("/api/v1/bikes/search?cant=-2", "error_invalid_cant"),
        ("/api/v1/bikes/search?name=ktm1", "error_invalid_string_bike"),
        ("/api/v1/bikes/search?page=first", "error_query_params_invalids"),
    ];

    for (uri, code) in cases {
        let (status, json) = app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], 400);
        assert_eq!(json["kind"], "validation");
        assert_eq!(json["error"], code, "{}", uri);
    }
    assert_eq!(app.queries(), 0);
}

// == Byke Endpoint Tests ==

#[tokio::test]
async fn test_get_bike_round_trip() {
    let app = TestApp::new();

    let (status, first) = app.get("/api/v1/bikes/byke/e5ab3310").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["total"], 1);
    assert_eq!(first["data"]["torque"], "37 Nm");
    assert_eq!(first["data"]["extras"][1], "Maletero");
    // Every group is enriched: three groups of two.
    assert_eq!(app.presign_calls(), 6);

    let (_, second) = app.get("/api/v1/bikes/byke/e5ab3310").await;
    assert_eq!(app.queries(), 1);
    assert_eq!(app.presign_calls(), 6);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_get_bike_keeps_item_with_failed_photo() {
    let app = TestApp::with(Config::default(), &["7f3a9c21/1_2.jpg"]);

    let (status, json) = app.get("/api/v1/bikes/byke/7f3a9c21").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["photos"][0][1]["url"], "");
    assert_ne!(json["data"]["photos"][0][0]["url"], "");
    assert_ne!(json["data"]["photos"][1][1]["url"], "");
}

#[tokio::test]
async fn test_get_bike_errors() {
    let app = TestApp::new();

    let (status, json) = app.get("/api/v1/bikes/byke/00000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "error_byke_not_found");
    assert_eq!(json["message"], "Byke 00000000 not found");

    let (status, json) = app.get("/api/v1/bikes/byke/7f3a-9c21").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "error_path_param_invalid");
    assert_eq!(app.queries(), 1);
}

// == Placeholder Endpoint Tests ==

#[tokio::test]
async fn test_placeholder_names() {
    let app = TestApp::new();

    let (status, json) = app.get("/api/v1/bikes/placeholder?name=ktm").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 2);
    assert_eq!(json["data"][0], "KTM Duke 390");
    assert_eq!(json["data"][1], "KTM Adventure 390");

    app.get("/api/v1/bikes/placeholder?name=ktm").await;
    assert_eq!(app.queries(), 2);
    assert_eq!(app.presign_calls(), 0);
}

#[tokio::test]
async fn test_placeholder_no_match_is_empty() {
    let app = TestApp::new();

    let (status, json) = app.get("/api/v1/bikes/placeholder?name=vespa").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 0);
    assert_eq!(json["data"], Value::Array(vec![]));
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_clear_then_miss() {
    let app = TestApp::new();
    app.get("/api/v1/bikes/search?name=ktm").await;
    app.get("/api/v1/bikes/byke/7f3a9c21").await;

    let (status, json) = app.send("DELETE", "/api/v1/bikes/cache").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    app.get("/api/v1/bikes/search?name=ktm").await;
    app.get("/api/v1/bikes/byke/7f3a9c21").await;
    assert_eq!(app.queries(), 4);
}

#[tokio::test]
async fn test_stats_endpoint() {
    let app = TestApp::new();
    app.get("/api/v1/bikes/search?name=ktm").await;
    app.get("/api/v1/bikes/search?name=ktm").await;

    let (status, json) = app.get("/api/v1/bikes/cache/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["capacity"], 1000);
    assert_eq!(json["ttl_secs"], 5400);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = TestApp::new();
    app.get("/api/v1/bikes/byke/7f3a9c21").await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/bikes/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    let counted = text.lines().any(|l| {
        l.starts_with("bikes_compass_http_requests_total")
            && l.contains("route=\"/api/v1/bikes/byke/:hash_byke\"")
    });
    assert!(counted, "{}", text);
    for name in [
        "bikes_compass_cache_hits_total",
        "bikes_compass_cache_misses_total",
        "bikes_compass_cache_evictions_total",
        "bikes_compass_cache_entries",
    ] {
        assert!(text.contains(name), "{} missing", name);
    }
}

#[tokio::test]
async fn test_capacity_evicts_least_recent_response() {
    let config = Config {
        cache_capacity: 2,
        ..Config::default()
    };
    let app = TestApp::with(config, &[]);

    app.get("/api/v1/bikes/search?name=ktm").await;
    app.get("/api/v1/bikes/search?name=honda").await;
    app.get("/api/v1/bikes/search?name=ktm").await;
    app.get("/api/v1/bikes/search?name=suzuki").await;
    assert_eq!(app.queries(), 3);

    // honda was least recently used
    app.get("/api/v1/bikes/search?name=honda").await;
    assert_eq!(app.queries(), 4);

    let (_, json) = app.get("/api/v1/bikes/cache/stats").await;
    assert_eq!(json["evictions"], 2);
}

#[tokio::test(start_paused = true)]
async fn test_responses_expire_after_ttl() {
    let config = Config {
        cache_ttl: 60,
        ..Config::default()
    };
    let app = TestApp::with(config, &[]);

    app.get("/api/v1/bikes/byke/c09e12fa").await;
    tokio::time::advance(Duration::from_secs(59)).await;
    app.get("/api/v1/bikes/byke/c09e12fa").await;
    assert_eq!(app.queries(), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    app.get("/api/v1/bikes/byke/c09e12fa").await;
    assert_eq!(app.queries(), 2);

    let (_, json) = app.get("/api/v1/bikes/cache/stats").await;
    assert_eq!(json["expirations"], 1);
}

// == Misc ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new();

    let (status, json) = app.get("/api/v1/bikes/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_bundled_catalog_loads() {
    let store = MemoryBikeStore::load(CATALOG).await.unwrap();
    assert_eq!(store.len(), 6);

    let bike = store
        .find_one(&Filter::new().eq("hash_byke", "b81d44e0"), &[])
        .await
        .unwrap();
    assert_eq!(bike.full_name, "Yamaha MT 03");
}
