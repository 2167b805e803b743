//! Store Module
//!
//! The document-store port the query services read listings through, and its
//! in-memory adapter.

mod memory;

pub use memory::MemoryBikeStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::Bike;

// == Projections ==
/// Fields served by list views.
pub const SUMMARY_FIELDS: &[&str] = &[
    "ref",
    "hash_byke",
    "full_name",
    "year_model",
    "km",
    "price",
    "location",
    "date_publish",
    "photos",
];

/// Fields served by the single-item lookup.
pub const DETAIL_FIELDS: &[&str] = &[
    "ref",
    "hash_byke",
    "full_name",
    "brand",
    "model",
    "cylinder",
    "engine",
    "horse_power",
    "weight",
    "city_register",
    "extras",
    "date_found",
    "date_soat",
    "date_tecnico",
    "page_instagram",
    "url_post",
    "year_model",
    "km",
    "price",
    "location",
    "date_publish",
    "photos",
    "torque",
];

pub const NAME_FIELDS: &[&str] = &["full_name"];

// == Filter ==
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Field must equal the value exactly
    Equals(Value),
    /// Field must be a string matching this case-insensitive regex
    Pattern(String),
}

/// Conjunction of per-field conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, FilterValue)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions
            .push((field.into(), FilterValue::Equals(value.into())));
        self
    }

    /// Adds a case-insensitive pattern. The pattern is used as a regex verbatim.
    pub fn pattern(mut self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.conditions
            .push((field.into(), FilterValue::Pattern(pattern.into())));
        self
    }

    /// Adds a case-insensitive substring match on literal text.
    pub fn contains(self, field: impl Into<String>, text: &str) -> Self {
        self.pattern(field, regex::escape(text))
    }

    pub fn conditions(&self) -> &[(String, FilterValue)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

// == Store Error ==
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("no document matched the query")]
    NotFound,

    #[error("query failed: {0}")]
    Query(String),

    #[error("document could not be decoded: {0}")]
    Decode(String),

    #[error("store unavailable: {0}")]
    Connection(String),
}

// == Repository Port ==
/// Read access to the listing collection.
///
/// An empty `projection` returns every field.
#[async_trait]
pub trait BikeRepository: Send + Sync {
    async fn find_many(
        &self,
        filter: &Filter,
        projection: &[&str],
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Bike>, StoreError>;

    /// Returns the first matching document or [`StoreError::NotFound`].
    async fn find_one(&self, filter: &Filter, projection: &[&str]) -> Result<Bike, StoreError>;
}
