//! Client for Nominatim's `/search` endpoint (OpenStreetMap).

use reqwest::{Client, Url};
use staybook_core::Coordinate;

use crate::client::{build_http_client, checked_coordinate, get_json, parse_base_url};
use crate::error::{GeocodeError, ProviderError};
use crate::types::NominatimPlace;
use crate::ProviderSettings;

pub(crate) const PROVIDER: &str = "nominatim";

/// Forward geocoder backed by a Nominatim-compatible search API.
///
/// Nominatim's usage policy requires an identifying `User-Agent`, taken from
/// [`ProviderSettings::user_agent`]. An API key is only sent when configured,
/// for hosted services that speak the Nominatim protocol.
#[derive(Debug)]
pub struct NominatimClient {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    result_limit: u32,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`GeocodeError::Client`] if the HTTP client cannot be built, or
    /// [`GeocodeError::InvalidBaseUrl`] if `settings.base_url` does not parse.
    pub fn new(settings: &ProviderSettings) -> Result<Self, GeocodeError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let endpoint = base_url
            .join("search")
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                url: settings.base_url.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client: build_http_client(settings)?,
            endpoint,
            api_key: settings.api_key.clone(),
            result_limit: settings.result_limit,
        })
    }

    /// # Errors
    ///
    /// See [`crate::GeocodeProvider::resolve`].
    pub async fn resolve(&self, query: &str) -> Result<Option<Coordinate>, ProviderError> {
        let url = self.search_url(query);
        let places: Vec<NominatimPlace> = get_json(&self.client, url, PROVIDER).await?;
        map_places(&places)
    }

    fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "json");
            pairs.append_pair("q", query);
            pairs.append_pair("limit", &self.result_limit.to_string());
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
        }
        url
    }
}

/// Maps the first candidate to a coordinate. Only the first candidate is
/// consulted; a malformed first candidate is a parse failure even when later
/// ones would parse.
fn map_places(places: &[NominatimPlace]) -> Result<Option<Coordinate>, ProviderError> {
    let Some(place) = places.first() else {
        return Ok(None);
    };

    let latitude = parse_decimal("lat", &place.lat)?;
    let longitude = parse_decimal("lon", &place.lon)?;
    let coordinate = checked_coordinate(PROVIDER, latitude, longitude)?;

    tracing::debug!(
        provider = PROVIDER,
        display_name = place.display_name.as_deref().unwrap_or(""),
        "candidate selected"
    );
    Ok(Some(coordinate))
}

fn parse_decimal(field: &str, raw: &str) -> Result<f64, ProviderError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| ProviderError::Parse {
            provider: PROVIDER,
            reason: format!("{field} {raw:?} is not a number: {e}"),
        })
}
