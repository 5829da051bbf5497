//! Listing records and the payloads used to create and update them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::{Geometry, Provenance};

/// Image reference assigned by the external storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub filename: String,
}

impl ImageRef {
    /// Returns a 200px-high preview URL for hosts that accept an
    /// `/upload/<transform>` path segment. URLs without an `/upload`
    /// segment are returned unchanged.
    #[must_use]
    pub fn thumbnail_url(&self) -> String {
        self.url.replacen("/upload", "/upload/h_200", 1)
    }
}

/// User-submitted listing fields, before geocoding.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub country: String,
}

/// A fully-populated record ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub id: Uuid,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub location: String,
    pub country: String,
    pub image: Option<ImageRef>,
    pub geometry: Geometry,
    pub geocode_provenance: Provenance,
}

/// A persisted listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: Uuid,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub location: String,
    pub country: String,
    pub image: Option<ImageRef>,
    pub geometry: Geometry,
    pub geocode_provenance: Provenance,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update submitted by a user. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub location: Option<String>,
    pub country: Option<String>,
}

/// Everything the persistence layer needs to apply an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub image: Option<ImageRef>,
    pub geometry: Option<Geometry>,
    pub geocode_provenance: Option<Provenance>,
}

impl From<ListingPatch> for ListingUpdate {
    fn from(patch: ListingPatch) -> Self {
        Self {
            title: patch.title,
            description: patch.description,
            price: patch.price,
            location: patch.location,
            country: patch.country,
            ..Self::default()
        }
    }
}
