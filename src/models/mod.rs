//! Domain records and request/response models for the catalog API
//!
//! This module defines the listing records decoded from the store and the
//! DTOs used for serializing/deserializing HTTP traffic.

pub mod bike;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use bike::{Bike, BikeSummary, HasPhotos, Photo};
pub use requests::{validate_hash_byke, SearchBikesQuery, SearchBikesRequest, SuggestNamesQuery};
pub use responses::{
    BikeResponse, ClearResponse, ErrorResponse, HealthResponse, NamesResponse, ResponseSuccess,
    SearchResponse, StatsResponse,
};
