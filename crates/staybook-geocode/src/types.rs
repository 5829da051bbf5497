//! Provider response schemas.
//!
//! Each struct models only the fields the mapping functions read. Unknown
//! fields are ignored; a missing or mistyped required field fails
//! deserialization and surfaces as [`crate::ProviderError::Parse`].

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Nominatim: GET /search?format=json
// ---------------------------------------------------------------------------

/// One candidate from Nominatim's JSON array response.
///
/// Nominatim serializes coordinates as decimal strings, e.g. `"48.8566"`.
#[derive(Debug, Deserialize)]
pub(crate) struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

// ---------------------------------------------------------------------------
// OpenCage: GET /json
// ---------------------------------------------------------------------------

/// Top-level OpenCage forward-geocoding response.
#[derive(Debug, Deserialize)]
pub(crate) struct OpenCageResponse {
    pub results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenCageResult {
    pub geometry: OpenCageGeometry,
    #[serde(default)]
    pub formatted: Option<String>,
}

/// OpenCage serializes coordinates as JSON numbers.
#[derive(Debug, Deserialize)]
pub(crate) struct OpenCageGeometry {
    pub lat: f64,
    pub lng: f64,
}
