//! Error types for the catalog API
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::ErrorResponse;

// == Error Kind ==
/// Coarse classification of every failure the API can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed request, rejected before touching cache or store
    Validation,
    /// Store query failed or matched nothing
    StoreQuery,
    /// Store returned data that does not fit the expected shape
    Decode,
    /// Photo link could not be issued; absorbed during enrichment
    Presign,
    /// Anything that could not be classified
    Unexpected,
}

// == Api Error Enum ==
/// Unified error type for the catalog API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Query string could not be bound to the request type
    #[error("{0}")]
    InvalidQueryParams(String),

    #[error("Page must be greater than or equal to 1")]
    InvalidPage,

    #[error("Cant must be between 1 and {max}")]
    InvalidCant { max: u64 },

    #[error("Byke name can only contain letters")]
    InvalidBikeName,

    #[error("Path Param is not valid, only letters and numbers")]
    InvalidPathParam,

    #[error("Bikes not found")]
    BikesNotFound,

    #[error("Byke {0} not found")]
    BikeNotFound(String),

    #[error("Store query failed: {0}")]
    StoreQuery(String),

    #[error("Could not decode stored byke: {0}")]
    Decode(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidQueryParams(_)
            | ApiError::InvalidPage
            | ApiError::InvalidCant { .. }
            | ApiError::InvalidBikeName
            | ApiError::InvalidPathParam => ErrorKind::Validation,
            ApiError::BikesNotFound | ApiError::BikeNotFound(_) | ApiError::StoreQuery(_) => {
                ErrorKind::StoreQuery
            }
            ApiError::Decode(_) => ErrorKind::Decode,
            ApiError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Stable machine-readable code carried in the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidQueryParams(_) => "error_query_params_invalids",
            ApiError::InvalidPage => "error_invalid_page",
            ApiError::InvalidCant { .. } => "error_invalid_cant",
            ApiError::InvalidBikeName => "error_invalid_string_bike",
            ApiError::InvalidPathParam => "error_path_param_invalid",
            ApiError::BikesNotFound => "error_bikes_not_found",
            ApiError::BikeNotFound(_) => "error_byke_not_found",
            ApiError::StoreQuery(_) => "error_store_query",
            ApiError::Decode(_) => "error_decode_byke",
            ApiError::Unexpected(_) => "error_unexpected",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::StoreQuery => match self {
                ApiError::BikesNotFound | ApiError::BikeNotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ErrorKind::Decode | ErrorKind::Presign | ErrorKind::Unexpected => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to callers. Server-side failures keep their details in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::StoreQuery(_) => "Could not query the catalog".to_string(),
            ApiError::Decode(_) => "Could not read catalog data".to_string(),
            ApiError::Unexpected(_) => "Unexpected error".to_string(),
            other => other.to_string(),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "request failed");
        }

        let body = Json(ErrorResponse::new(
            status.as_u16(),
            self.kind(),
            self.code(),
            self.public_message(),
        ));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the catalog API.
pub type Result<T> = std::result::Result<T, ApiError>;
