//! Request DTOs for the catalog API
//!
//! Raw query/path shapes as bound by axum, and the validated forms the
//! services consume.

use serde::Deserialize;

use crate::error::{ApiError, Result};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_CANT: u64 = 10;
pub const MAX_CANT: u64 = 30;

/// Query string of `GET /search`
///
/// # Fields
/// - `name`: Optional case-insensitive fragment of the listing name
/// - `brand`: Optional case-insensitive fragment of the brand
/// - `page`: 1-based page, defaults to 1 when absent or 0
/// - `cant`: Page size, defaults to 10 when absent or 0
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchBikesQuery {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub cant: Option<i64>,
}

/// Validated search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBikesRequest {
    pub name: String,
    pub brand: String,
    pub page: u64,
    pub cant: u64,
}

impl SearchBikesRequest {
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.cant)
    }

    pub fn limit(&self) -> u64 {
        self.cant
    }
}

impl SearchBikesQuery {
    /// Applies defaults and checks every parameter.
    pub fn validate(self) -> Result<SearchBikesRequest> {
        let page = match self.page {
            None | Some(0) => DEFAULT_PAGE,
            Some(p) if p < 1 => return Err(ApiError::InvalidPage),
            Some(p) => p as u64,
        };

        let cant = match self.cant {
            None | Some(0) => DEFAULT_CANT,
            Some(c) if c < 0 || c as u64 > MAX_CANT => {
                return Err(ApiError::InvalidCant { max: MAX_CANT })
            }
            Some(c) => c as u64,
        };

        // The store offset must stay representable.
        if (page - 1).checked_mul(cant).is_none() {
            return Err(ApiError::InvalidPage);
        }

        let name = self.name.unwrap_or_default().trim().to_string();
        if !name.is_empty() && !is_valid_bike_name(&name) {
            return Err(ApiError::InvalidBikeName);
        }

        let brand = self.brand.unwrap_or_default().trim().to_string();

        Ok(SearchBikesRequest {
            name,
            brand,
            page,
            cant,
        })
    }
}

/// Query string of `GET /placeholder`
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestNamesQuery {
    pub name: String,
}

impl SuggestNamesQuery {
    /// Returns the trimmed name fragment.
    pub fn validate(self) -> Result<String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::InvalidQueryParams(
                "Query param name is required".to_string(),
            ));
        }
        if !is_valid_bike_name(&name) {
            return Err(ApiError::InvalidBikeName);
        }
        Ok(name)
    }
}

/// Path parameter of `GET /byke/:hash_byke`
pub fn validate_hash_byke(hash_byke: &str) -> Result<&str> {
    if hash_byke.is_empty() || !hash_byke.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::InvalidPathParam);
    }
    Ok(hash_byke)
}

// Letters and whitespace only, same as `^[A-Za-z\s]+$`
fn is_valid_bike_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
}
