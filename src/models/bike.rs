//! Catalog domain records
//!
//! Shapes decoded from the document store and served back to callers.

use serde::{Deserialize, Serialize};

/// An image attached to a listing.
///
/// `url` is empty as stored and filled in with a presigned link before serving.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Photo {
    pub url: String,
    pub height: i32,
    pub width: i32,
    /// Object key in the photo bucket, without the namespace prefix
    pub key: String,
}

impl Photo {
    pub fn new(key: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            url: String::new(),
            height,
            width,
            key: key.into(),
        }
    }
}

/// Full listing as served by the single-item lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bike {
    #[serde(rename = "ref")]
    pub reference: String,
    pub hash_byke: String,
    pub full_name: String,
    pub brand: String,
    pub model: String,
    pub cylinder: String,
    pub engine: String,
    pub horse_power: String,
    pub weight: String,
    pub city_register: String,
    pub extras: Vec<String>,
    pub date_found: i64,
    pub date_soat: String,
    pub date_tecnico: String,
    pub page_instagram: String,
    pub url_post: String,
    pub year_model: i32,
    #[serde(rename = "km")]
    pub kilometers: i64,
    pub price: i64,
    pub location: String,
    pub date_publish: i64,
    pub photos: Vec<Vec<Photo>>,
    pub torque: String,
}

/// Listing as served by search results: summary fields and the first photo group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BikeSummary {
    #[serde(rename = "ref")]
    pub reference: String,
    pub hash_byke: String,
    pub full_name: String,
    pub year_model: i32,
    #[serde(rename = "km")]
    pub kilometers: i64,
    pub price: i64,
    pub location: String,
    pub date_publish: i64,
    pub photos: Vec<Vec<Photo>>,
}

impl From<Bike> for BikeSummary {
    fn from(bike: Bike) -> Self {
        let mut photos = bike.photos;
        photos.truncate(1);

        Self {
            reference: bike.reference,
            hash_byke: bike.hash_byke,
            full_name: bike.full_name,
            year_model: bike.year_model,
            kilometers: bike.kilometers,
            price: bike.price,
            location: bike.location,
            date_publish: bike.date_publish,
            photos,
        }
    }
}

/// Anything carrying ordered groups of photos that can be enriched in place.
pub trait HasPhotos {
    fn photo_groups(&self) -> &[Vec<Photo>];
    fn photo_groups_mut(&mut self) -> &mut [Vec<Photo>];
}

impl HasPhotos for Bike {
    fn photo_groups(&self) -> &[Vec<Photo>] {
        &self.photos
    }

    fn photo_groups_mut(&mut self) -> &mut [Vec<Photo>] {
        &mut self.photos
    }
}

impl HasPhotos for BikeSummary {
    fn photo_groups(&self) -> &[Vec<Photo>] {
        &self.photos
    }

    fn photo_groups_mut(&mut self) -> &mut [Vec<Photo>] {
        &mut self.photos
    }
}
