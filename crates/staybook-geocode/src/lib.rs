//! Geocoding for Staybook listings.
//!
//! Provider clients ([`NominatimClient`], [`OpenCageClient`]) normalize each
//! service's response into a [`staybook_core::Coordinate`] or "no match".
//! [`GeocodePipeline`] tries them in order and falls back to a configured
//! default coordinate, so callers always receive a [`GeocodeResult`].

pub mod client;
pub mod error;
pub mod nominatim;
pub mod opencage;
pub mod pipeline;

mod types;

pub use client::{GeocodeProvider, ProviderSettings};
pub use error::{GeocodeError, ProviderError};
pub use nominatim::NominatimClient;
pub use opencage::OpenCageClient;
pub use pipeline::{GeocodePipeline, GeocodeResult, Provenance};
