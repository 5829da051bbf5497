//! Shared domain types and configuration for Staybook.

pub mod app_config;
pub mod config;
pub mod geo;
pub mod listings;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, GeocodeConfig, ImageStorageConfig};
pub use config::{load_app_config, load_app_config_from_env, parse_api_keys};
pub use geo::{Coordinate, Geometry, Provenance};
pub use listings::{ImageRef, Listing, ListingDraft, ListingPatch, ListingUpdate, NewListing};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("latitude {0} is not a finite value in [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} is not a finite value in [-180, 180]")]
    InvalidLongitude(f64),

    #[error("unknown geocode provenance '{0}'")]
    UnknownProvenance(String),
}
