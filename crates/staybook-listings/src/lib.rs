//! Listing creation and update with geocoded geometry.
//!
//! [`ListingService`] checks collaborator configuration, validates the
//! submitted fields, resolves the location through a
//! [`staybook_geocode::GeocodePipeline`] and hands the finished record to a
//! [`ListingStore`]. Geocoding never blocks a write.

mod error;
mod service;
mod store;

pub use error::ListingError;
pub use service::{ListingService, MAX_PRICE, MAX_TITLE_LEN};
pub use store::ListingStore;
