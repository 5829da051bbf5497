//! Client for the OpenCage forward-geocoding API.

use reqwest::{Client, Url};
use staybook_core::Coordinate;

use crate::client::{build_http_client, checked_coordinate, get_json, parse_base_url};
use crate::error::{GeocodeError, ProviderError};
use crate::types::OpenCageResponse;
use crate::ProviderSettings;

pub(crate) const PROVIDER: &str = "opencage";

#[derive(Debug)]
pub struct OpenCageClient {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    result_limit: u32,
}

impl OpenCageClient {
    /// # Errors
    ///
    /// Returns [`GeocodeError::Client`] if the HTTP client cannot be built, or
    /// [`GeocodeError::InvalidBaseUrl`] if `settings.base_url` does not parse.
    pub fn new(settings: &ProviderSettings) -> Result<Self, GeocodeError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let endpoint = base_url
            .join("json")
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
        let response: OpenCageResponse = get_json(&self.client, url, PROVIDER).await?;
        map_response(&response)
    }

    fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
            pairs.append_pair("limit", &self.result_limit.to_string());
            pairs.append_pair("no_annotations", "1");
        }
        url
    }
}

fn map_response(response: &OpenCageResponse) -> Result<Option<Coordinate>, ProviderError> {
    let Some(result) = response.results.first() else {
        return Ok(None);
    };

    let coordinate = checked_coordinate(PROVIDER, result.geometry.lat, result.geometry.lng)?;
    tracing::debug!(
        provider = PROVIDER,
        formatted = result.formatted.as_deref().unwrap_or(""),
        "candidate selected"
    );
    Ok(Some(coordinate))
}
