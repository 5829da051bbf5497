use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A validated WGS84 point.
///
/// Both components are finite and in range; there is no way to build a
/// `Coordinate` from unchecked values, so a value of this type never carries
/// NaN or a half-parsed provider answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Builds a coordinate after range-checking both components.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLatitude`] or [`CoreError::InvalidLongitude`]
    /// for non-finite or out-of-range input.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// GeoJSON `Point` geometry as embedded in a listing.
///
/// `coordinates` is `[longitude, latitude]`, the GeoJSON axis order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl Geometry {
    #[must_use]
    pub fn point(coordinate: Coordinate) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [coordinate.longitude(), coordinate.latitude()],
        }
    }

    /// Reads the point back into a validated [`Coordinate`].
    ///
    /// # Errors
    ///
    /// Returns a [`CoreError`] if the stored values are out of range.
    pub fn coordinate(&self) -> Result<Coordinate, CoreError> {
        let [longitude, latitude] = self.coordinates;
        Coordinate::new(latitude, longitude)
    }
}

/// Which stage of the geocoding pipeline produced a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// The first provider in the chain.
    Primary,
    /// Any later provider in the chain.
    Fallback,
    /// No provider resolved the query; the configured default was used.
    Default,
}

impl Provenance {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
            Self::Default => "default",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provenance {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Self::Primary),
            "fallback" => Ok(Self::Fallback),
            "default" => Ok(Self::Default),
            other => Err(CoreError::UnknownProvenance(other.to_string())),
        }
    }
}

impl TryFrom<String> for Provenance {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
