//! Name suggestions for the search box. Not cached, no photos.

use std::sync::Arc;

use super::store_failure;
use crate::error::{ApiError, Result};
use crate::models::NamesResponse;
use crate::store::{BikeRepository, Filter, NAME_FIELDS};

pub const MAX_SUGGESTIONS: u64 = 5;

#[derive(Clone)]
pub struct SuggestNames {
    store: Arc<dyn BikeRepository>,
}

impl SuggestNames {
    pub fn new(store: Arc<dyn BikeRepository>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, name: &str) -> Result<NamesResponse> {
        let filter = Filter::new().contains("full_name", name);
        let bikes = self
            .store
            .find_many(&filter, NAME_FIELDS, 0, MAX_SUGGESTIONS)
            .await
            .map_err(|e| store_failure(e, ApiError::BikesNotFound))?;

        let names: Vec<String> = bikes.into_iter().map(|b| b.full_name).collect();
        let total = names.len() as i64;
        Ok(NamesResponse::new(names, total))
    }
}
