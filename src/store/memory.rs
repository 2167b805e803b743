//! In-memory document store
//!
//! Holds the catalog as raw JSON documents and evaluates filters the way the
//! document database does: field equality, case-insensitive regex,
//! skip/limit and projection, then decoding into [`Bike`].

use std::path::Path;

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};

use super::{BikeRepository, Filter, FilterValue, StoreError};
use crate::models::Bike;

type Document = Map<String, Value>;

#[derive(Debug, Clone, Default)]
pub struct MemoryBikeStore {
    documents: Vec<Document>,
}

enum Condition<'a> {
    Equals(&'a str, &'a Value),
    Pattern(&'a str, Regex),
}

impl MemoryBikeStore {
    /// Builds a store from already-parsed documents. Every document must be a JSON object.
    pub fn from_documents(documents: Vec<Value>) -> Result<Self, StoreError> {
        let documents = documents
            .into_iter()
            .enumerate()
            .map(|(i, doc)| match doc {
                Value::Object(map) => Ok(map),
                other => Err(StoreError::Decode(format!(
                    "document {} is not an object: {}",
                    i, other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { documents })
    }

    /// Loads a JSON array of documents from disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| StoreError::Connection(format!("{}: {}", path.display(), e)))?;
        let documents: Vec<Value> = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Decode(format!("{}: {}", path.display(), e)))?;

        let store = Self::from_documents(documents)?;
        tracing::info!(path = %path.display(), documents = store.len(), "Catalog loaded");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn compile(filter: &Filter) -> Result<Vec<Condition<'_>>, StoreError> {
        filter
            .conditions()
            .iter()
            .map(|(field, value)| match value {
                FilterValue::Equals(v) => Ok(Condition::Equals(field, v)),
                FilterValue::Pattern(p) => RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map(|re| Condition::Pattern(field, re))
                    .map_err(|e| StoreError::Query(format!("invalid pattern on {}: {}", field, e))),
            })
            .collect()
    }

    fn matching<'a>(
        &'a self,
        conditions: &'a [Condition<'a>],
    ) -> impl Iterator<Item = &'a Document> + 'a {
        self.documents
            .iter()
            .filter(move |doc| conditions.iter().all(|c| c.matches(doc)))
    }
}

impl Condition<'_> {
    fn matches(&self, doc: &Document) -> bool {
        match self {
            Condition::Equals(field, expected) => doc.get(*field) == Some(*expected),
            Condition::Pattern(field, re) => doc
                .get(*field)
                .and_then(Value::as_str)
                .is_some_and(|s| re.is_match(s)),
        }
    }
}

fn decode(doc: &Document, projection: &[&str]) -> Result<Bike, StoreError> {
    let projected: Document = if projection.is_empty() {
        doc.clone()
    } else {
        projection
            .iter()
            .filter_map(|field| doc.get(*field).map(|v| (field.to_string(), v.clone())))
            .collect()
    };

    serde_json::from_value(Value::Object(projected)).map_err(|e| {
        let hash = doc.get("hash_byke").and_then(Value::as_str).unwrap_or("?");
        StoreError::Decode(format!("byke {}: {}", hash, e))
    })
}

#[async_trait]
impl BikeRepository for MemoryBikeStore {
    async fn find_many(
        &self,
        filter: &Filter,
        projection: &[&str],
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Bike>, StoreError> {
        let conditions = Self::compile(filter)?;

        self.matching(&conditions)
            .skip(skip as usize)
            .take(limit as usize)
            .map(|doc| decode(doc, projection))
            .collect()
    }

    async fn find_one(&self, filter: &Filter, projection: &[&str]) -> Result<Bike, StoreError> {
        let conditions = Self::compile(filter)?;

        let doc = self
            .matching(&conditions)
            .next()
            .ok_or(StoreError::NotFound)?;
        decode(doc, projection)
    }
}
